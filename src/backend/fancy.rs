//! `fancy-regex` backend: lookaround and backreferences at the cost of
//! backtracking.
//!
//! fancy-regex matches `&str`, so input is decoded as UTF-8 first. Valid
//! UTF-8 is borrowed as is; invalid sequences are replaced with U+FFFD and the
//! spans then index into the replaced copy.

use std::borrow::Cow;

use crate::backend::{Captures, CompiledRegex, collect_group_names};
use crate::error::{GrokError, GrokResult};

#[derive(Debug)]
pub struct FancyRegex {
    regex: fancy_regex::Regex,
    names: Vec<String>,
}

impl FancyRegex {
    pub fn new(expression: &str, backtrack_limit: Option<usize>) -> GrokResult<Self> {
        let mut builder = fancy_regex::RegexBuilder::new(expression);
        if let Some(limit) = backtrack_limit {
            builder.backtrack_limit(limit);
        }
        let regex = builder.build().map_err(|e| GrokError::PatternSyntax {
            message: e.to_string(),
        })?;
        let names = collect_group_names(regex.capture_names());
        Ok(Self { regex, names })
    }
}

impl CompiledRegex for FancyRegex {
    fn group_names(&self) -> &[String] {
        &self.names
    }

    fn captures<'r, 'h>(&'r self, haystack: &'h [u8]) -> GrokResult<Option<Captures<'r, 'h>>> {
        let text = String::from_utf8_lossy(haystack);
        let spans = {
            let caps = self
                .regex
                .captures(&text)
                .map_err(|e| GrokError::MatchAborted {
                    message: e.to_string(),
                })?;
            let Some(caps) = caps else {
                return Ok(None);
            };
            (1..=self.names.len())
                .map(|i| caps.get(i).map(|m| m.start()..m.end()))
                .collect()
        };
        let bytes = match text {
            Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
            Cow::Owned(s) => Cow::Owned(s.into_bytes()),
        };
        Ok(Some(Captures::new(bytes, &self.names, spans)))
    }
}
