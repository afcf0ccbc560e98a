//! Bundled pattern libraries.
//!
//! `grok` is the default seed for every registry unless the configuration
//! skips it. Other libraries are opt-in and may reference `grok` patterns.

pub mod aws;
pub mod grok;

use std::collections::HashMap;

/// A named, static set of pattern definitions.
pub struct Library {
    pub name: &'static str,
    pub patterns: &'static [(&'static str, &'static str)],
}

pub const LIBRARIES: &[Library] = &[
    Library {
        name: "grok",
        patterns: grok::PATTERNS,
    },
    Library {
        name: "aws",
        patterns: aws::PATTERNS,
    },
];

/// Look up a bundled library by name.
pub fn library(name: &str) -> Option<&'static Library> {
    LIBRARIES.iter().find(|lib| lib.name == name)
}

/// Names of all bundled libraries.
pub fn library_names() -> Vec<&'static str> {
    LIBRARIES.iter().map(|lib| lib.name).collect()
}

/// The default seed: the base grok library.
pub fn default_patterns() -> HashMap<String, String> {
    to_map(grok::PATTERNS)
}

pub(crate) fn to_map(patterns: &[(&str, &str)]) -> HashMap<String, String> {
    patterns
        .iter()
        .map(|(name, expr)| (name.to_string(), expr.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::backend::{BackendKind, BackendOptions, compile};
    use crate::registry::PatternRegistry;
    use crate::resolve::resolve;

    fn all_names_unique(patterns: &[(&str, &str)]) -> bool {
        let unique: HashSet<&str> = patterns.iter().map(|(n, _)| *n).collect();
        unique.len() == patterns.len()
    }

    #[test]
    fn libraries_have_no_duplicate_names() {
        for lib in LIBRARIES {
            assert!(all_names_unique(lib.patterns), "duplicate names in {}", lib.name);
        }
    }

    #[test]
    fn library_lookup() {
        assert_eq!(library("aws").map(|l| l.name), Some("aws"));
        assert!(library("nope").is_none());
        assert_eq!(library_names(), ["grok", "aws"]);
    }

    #[test]
    fn default_patterns_contain_core_tokens() {
        let defaults = default_patterns();
        for name in ["WORD", "NUMBER", "INT", "IPV4", "IPV6", "IP", "HOSTNAME", "COMMONAPACHELOG"] {
            assert!(defaults.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn every_bundled_pattern_compiles_on_both_backends() {
        let registry =
            PatternRegistry::new(grok::PATTERNS.iter().copied(), aws::PATTERNS.iter().copied())
                .unwrap();
        for name in registry.names() {
            let resolved = resolve(&format!("%{{{name}}}"), &registry)
                .unwrap_or_else(|e| panic!("{name}: {e}"));
            for kind in [BackendKind::Standard, BackendKind::Fancy] {
                compile(kind, &resolved.expression, BackendOptions::default())
                    .unwrap_or_else(|e| panic!("{name} on {kind}: {e}"));
            }
        }
    }
}
