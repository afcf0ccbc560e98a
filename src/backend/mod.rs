//! Regex backends behind a narrow compile/match capability.
//!
//! The resolver produces a flat expression and never names a concrete engine.
//! A backend compiles that expression once and then answers `captures` calls
//! with a freshly allocated [`Captures`] each time, so compiled regexes carry
//! no per-match state and can be shared across threads.

pub mod fancy;
pub mod standard;

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::GrokResult;

/// Which engine compiles resolved expressions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// `regex` crate: linear time, no lookaround or backreferences.
    #[default]
    Standard,
    /// `fancy-regex`: backtracking, adds lookaround and backreferences.
    Fancy,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Standard => "standard",
            BackendKind::Fancy => "fancy",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(BackendKind::Standard),
            "fancy" => Ok(BackendKind::Fancy),
            other => Err(format!("unknown regex backend `{other}` (expected standard or fancy)")),
        }
    }
}

/// Engine-specific knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendOptions {
    /// Backtracking budget for the fancy engine. Ignored by `Standard`.
    pub backtrack_limit: Option<usize>,
}

/// A compiled expression.
///
/// Implementations must be Send + Sync: a compiled matcher is shared across
/// rayon worker threads by the CLI.
pub trait CompiledRegex: Send + Sync + fmt::Debug {
    /// Capture group names in declaration order, group 0 excluded.
    /// Unnamed groups appear as `""`.
    fn group_names(&self) -> &[String];

    /// Match against `haystack`. `Ok(None)` when there is no match.
    fn captures<'r, 'h>(&'r self, haystack: &'h [u8]) -> GrokResult<Option<Captures<'r, 'h>>>;
}

/// One match: group names and spans, index-aligned.
#[derive(Debug)]
pub struct Captures<'r, 'h> {
    haystack: Cow<'h, [u8]>,
    names: &'r [String],
    spans: Vec<Option<Range<usize>>>,
}

impl<'r, 'h> Captures<'r, 'h> {
    pub(crate) fn new(
        haystack: Cow<'h, [u8]>,
        names: &'r [String],
        spans: Vec<Option<Range<usize>>>,
    ) -> Self {
        debug_assert_eq!(names.len(), spans.len());
        Self {
            haystack,
            names,
            spans,
        }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Group names, index-aligned with [`Captures::spans`].
    pub fn names(&self) -> &[String] {
        self.names
    }

    /// Byte ranges into the matched text; `None` for groups that didn't
    /// participate.
    pub fn spans(&self) -> &[Option<Range<usize>>] {
        &self.spans
    }

    /// The text the spans index into.
    pub fn haystack(&self) -> &[u8] {
        &self.haystack
    }

    /// `(name, bytes)` per group. Non-participating groups yield `None`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&[u8]>)> {
        self.names
            .iter()
            .zip(&self.spans)
            .map(|(name, span)| (name.as_str(), span.clone().map(|r| &self.haystack[r])))
    }
}

/// Compile `expression` with the selected engine.
pub fn compile(
    kind: BackendKind,
    expression: &str,
    options: BackendOptions,
) -> GrokResult<Arc<dyn CompiledRegex>> {
    Ok(match kind {
        BackendKind::Standard => Arc::new(standard::StandardRegex::new(expression)?),
        BackendKind::Fancy => {
            Arc::new(fancy::FancyRegex::new(expression, options.backtrack_limit)?)
        }
    })
}

/// Normalize an engine's capture-name listing: drop group 0, map unnamed
/// groups to the empty string.
pub(crate) fn collect_group_names<'a>(names: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    names
        .skip(1)
        .map(|n| n.unwrap_or_default().to_string())
        .collect()
}
