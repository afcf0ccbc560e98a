//! Error types for pattern resolution, compilation and extraction.

use thiserror::Error;

use crate::value::TypeHint;

/// Result type for grok operations.
pub type GrokResult<T> = Result<T, GrokError>;

/// Everything that can go wrong between a pattern template and a typed record.
///
/// None of these are fatal to the process: compile-time variants invalidate
/// one `compile` call, extraction-time variants invalidate one `extract` call
/// and leave the compiled matcher usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrokError {
    /// The resolved expression was rejected by the regex backend.
    #[error("invalid regular expression: {message}")]
    PatternSyntax { message: String },

    /// A reference token names a pattern the registry doesn't have.
    #[error("undefined pattern: %{{{name}}}")]
    UndefinedPattern { name: String },

    /// Expansion revisited a pattern that is already being expanded.
    #[error("cyclic pattern reference: {}", chain.join(" -> "))]
    CyclicPattern { chain: Vec<String> },

    /// A captured value could not be parsed as its declared type.
    #[error("field `{field}`: cannot convert {raw_value:?} to {target_type}")]
    TypeCoercion {
        field: String,
        raw_value: String,
        target_type: TypeHint,
    },

    /// A field declared a type tag outside `int`, `float`, `string`.
    #[error("field `{field}`: unknown type hint `{tag}`, must be int, float, string or empty")]
    InvalidTypeHint { field: String, tag: String },

    /// A registry entry has a name that reference tokens can't address.
    #[error("invalid pattern name {name:?}")]
    InvalidPatternName { name: String },

    /// The backend gave up while matching (backtracking budget exhausted).
    #[error("match aborted: {message}")]
    MatchAborted { message: String },
}

impl GrokError {
    /// True for errors raised while building a registry or compiling a
    /// template, false for errors raised by a single extraction.
    pub fn is_compile_error(&self) -> bool {
        !matches!(
            self,
            GrokError::TypeCoercion { .. }
                | GrokError::InvalidTypeHint { .. }
                | GrokError::MatchAborted { .. }
        )
    }
}
