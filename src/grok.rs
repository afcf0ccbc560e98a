use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::backend::{self, BackendKind, BackendOptions};
use crate::compiled::CompiledGrok;
use crate::error::GrokResult;
use crate::multi::ExpressionSet;
use crate::patterns;
use crate::registry::PatternRegistry;
use crate::resolve::resolve;
use crate::value::Fields;

/// Settings for [`Grok::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Start from an empty registry instead of the bundled grok library.
    pub skip_default_patterns: bool,
    /// Drop fields whose capture is empty (or didn't participate).
    pub remove_empty_values: bool,
    /// Extra definitions; these replace bundled ones with the same name.
    pub patterns: HashMap<String, String>,
    pub backend: BackendKind,
    /// Backtracking budget for the fancy backend.
    pub backtrack_limit: Option<usize>,
    /// Reject unknown type tags at compile time rather than at the first
    /// extraction that produces the field.
    pub strict_type_hints: bool,
}

/// Holds the pattern registry and builds compiled expressions from it.
///
/// All definitions are fixed at construction. Independent `Grok` values
/// don't affect each other, and one `Grok` can be shared freely.
#[derive(Debug, Clone)]
pub struct Grok {
    registry: Arc<PatternRegistry>,
    remove_empty: bool,
    backend: BackendKind,
    options: BackendOptions,
    strict_type_hints: bool,
}

impl Grok {
    pub fn new(config: Config) -> GrokResult<Self> {
        let seed = if config.skip_default_patterns {
            HashMap::new()
        } else {
            patterns::default_patterns()
        };
        let registry = PatternRegistry::new(seed, config.patterns)?;

        tracing::debug!(
            patterns = registry.len(),
            backend = %config.backend,
            remove_empty = config.remove_empty_values,
            "built pattern registry"
        );

        Ok(Self {
            registry: Arc::new(registry),
            remove_empty: config.remove_empty_values,
            backend: config.backend,
            options: BackendOptions {
                backtrack_limit: config.backtrack_limit,
            },
            strict_type_hints: config.strict_type_hints,
        })
    }

    /// Resolve and compile `pattern`. Use this when the pattern is applied
    /// more than once.
    pub fn compile(&self, pattern: &str) -> GrokResult<CompiledGrok> {
        let resolved = resolve(pattern, &self.registry)?;
        if self.strict_type_hints {
            resolved.type_hints.validate()?;
        }
        let regex = backend::compile(self.backend, &resolved.expression, self.options)?;

        tracing::debug!(
            pattern,
            fields = resolved.fields.len(),
            expression_len = resolved.expression.len(),
            "compiled grok expression"
        );
        tracing::trace!(expression = %resolved.expression);

        Ok(CompiledGrok::new(regex, resolved, self.remove_empty))
    }

    /// Compile several patterns, tried in order by [`ExpressionSet::extract`].
    pub fn compile_all<I, S>(&self, patterns: I) -> GrokResult<ExpressionSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiled = patterns
            .into_iter()
            .map(|p| self.compile(p.as_ref()))
            .collect::<GrokResult<Vec<_>>>()?;
        Ok(ExpressionSet::new(compiled))
    }

    /// Compile `pattern` and extract typed fields from `data` in one go.
    ///
    /// The pattern is compiled on every call; prefer [`Grok::compile`] plus
    /// [`CompiledGrok::extract`] for anything but one-off use.
    pub fn extract_typed(&self, pattern: &str, data: &[u8]) -> GrokResult<Fields> {
        self.compile(pattern)?.extract(data)
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }
}
