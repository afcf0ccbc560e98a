//! `regex::bytes` backend.

use std::borrow::Cow;

use crate::backend::{Captures, CompiledRegex, collect_group_names};
use crate::error::{GrokError, GrokResult};

#[derive(Debug)]
pub struct StandardRegex {
    regex: regex::bytes::Regex,
    names: Vec<String>,
}

impl StandardRegex {
    pub fn new(expression: &str) -> GrokResult<Self> {
        let regex = regex::bytes::Regex::new(expression).map_err(|e| GrokError::PatternSyntax {
            message: e.to_string(),
        })?;
        let names = collect_group_names(regex.capture_names());
        Ok(Self { regex, names })
    }
}

impl CompiledRegex for StandardRegex {
    fn group_names(&self) -> &[String] {
        &self.names
    }

    fn captures<'r, 'h>(&'r self, haystack: &'h [u8]) -> GrokResult<Option<Captures<'r, 'h>>> {
        let Some(caps) = self.regex.captures(haystack) else {
            return Ok(None);
        };
        let spans = (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.range()))
            .collect();
        Ok(Some(Captures::new(Cow::Borrowed(haystack), &self.names, spans)))
    }
}
