use std::fmt;

use crate::error::GrokError;
use crate::value::Fields;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Input file, or `-` for stdin
    pub source: String,
    /// 1-indexed line number
    pub line: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `expression` is the index of the winning expression.
    Matched { expression: usize, fields: Fields },
    Unmatched,
    Failed(GrokError),
}

/// The result of running the expression set over one input line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub location: Location,
    pub outcome: Outcome,
}

impl LineRecord {
    pub fn is_match(&self) -> bool {
        matches!(self.outcome, Outcome::Matched { .. })
    }
}

/// 0 when every line matched, 1 when any line didn't, 2 when any line
/// failed extraction.
pub fn exit_code(records: &[LineRecord]) -> i32 {
    let mut code = 0;
    for record in records {
        match record.outcome {
            Outcome::Failed(_) => return 2,
            Outcome::Unmatched => code = 1,
            Outcome::Matched { .. } => {}
        }
    }
    code
}
