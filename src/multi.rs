use crate::compiled::CompiledGrok;
use crate::error::GrokResult;
use crate::value::Fields;

/// Ordered alternatives; the first expression that yields any field wins.
#[derive(Debug, Clone, Default)]
pub struct ExpressionSet {
    expressions: Vec<CompiledGrok>,
}

impl ExpressionSet {
    pub fn new(expressions: Vec<CompiledGrok>) -> Self {
        Self { expressions }
    }

    /// Try each expression in order. Returns the index of the winner with
    /// its fields, or `None` when nothing produced a field.
    ///
    /// A match only counts when it yields at least one field: an expression
    /// without named fields (`^%{INT}$`) never wins, even on input it
    /// matches, and neither does a match whose fields were all dropped as
    /// empty.
    ///
    /// An error from any expression ends the call; later expressions are
    /// not tried.
    pub fn extract(&self, data: &[u8]) -> GrokResult<Option<(usize, Fields)>> {
        for (index, expression) in self.expressions.iter().enumerate() {
            let fields = expression.extract(data)?;
            if !fields.is_empty() {
                return Ok(Some((index, fields)));
            }
        }
        Ok(None)
    }

    pub fn expressions(&self) -> &[CompiledGrok] {
        &self.expressions
    }

    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}
