use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::CompiledRegex;
use crate::error::GrokResult;
use crate::resolve::ResolvedPattern;
use crate::value::{Fields, TypeHints};

/// A compiled grok expression. Build with [`crate::Grok::compile`].
///
/// Immutable: every `extract` call gets its own match result from the
/// backend, so one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct CompiledGrok {
    regex: Arc<dyn CompiledRegex>,
    resolved: Arc<ResolvedPattern>,
    remove_empty: bool,
}

impl CompiledGrok {
    pub(crate) fn new(
        regex: Arc<dyn CompiledRegex>,
        resolved: ResolvedPattern,
        remove_empty: bool,
    ) -> Self {
        Self {
            regex,
            resolved: Arc::new(resolved),
            remove_empty,
        }
    }

    /// Match `data` and return every named field converted to its declared
    /// type (string when undeclared).
    ///
    /// No match yields an empty map. A value that fails its type conversion
    /// fails the whole call; nothing partial is returned.
    pub fn extract(&self, data: &[u8]) -> GrokResult<Fields> {
        let mut fields = HashMap::new();

        let Some(captures) = self.regex.captures(data)? else {
            return Ok(fields);
        };

        for (group, span) in captures.iter() {
            let raw = span.unwrap_or_default();
            if self.omit_field(group, raw) {
                continue;
            }
            let field = self.resolved.field_for_group(group);
            let text = String::from_utf8_lossy(raw);
            let value = self.resolved.type_hints.coerce(field, &text)?;
            fields.insert(field.to_string(), value);
        }

        Ok(fields)
    }

    /// Unnamed groups are never reported; empty captures only when the
    /// remove-empty policy is on.
    fn omit_field(&self, group: &str, raw: &[u8]) -> bool {
        group.is_empty() || (self.remove_empty && raw.is_empty())
    }

    /// The flat expression handed to the backend.
    pub fn expression(&self) -> &str {
        &self.resolved.expression
    }

    /// Named fields in the order their groups appear, duplicates included.
    pub fn fields(&self) -> &[String] {
        &self.resolved.fields
    }

    pub fn type_hints(&self) -> &TypeHints {
        &self.resolved.type_hints
    }

    pub fn removes_empty_values(&self) -> bool {
        self.remove_empty
    }
}
