use std::collections::HashMap;

use crate::error::{GrokError, GrokResult};
use crate::resolve::lexer::is_pattern_name;

/// Pattern name to raw template. Frozen once built.
///
/// `new` merges a seed library and a caller overlay; overlay entries replace
/// seed entries with the same name. Nothing mutates a registry afterwards, so
/// it can be shared behind an `Arc` by any number of resolvers.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: HashMap<String, String>,
}

impl PatternRegistry {
    pub fn new<S, O, K1, V1, K2, V2>(seed: S, overlay: O) -> GrokResult<Self>
    where
        S: IntoIterator<Item = (K1, V1)>,
        O: IntoIterator<Item = (K2, V2)>,
        K1: Into<String>,
        V1: Into<String>,
        K2: Into<String>,
        V2: Into<String>,
    {
        let mut patterns = HashMap::new();
        add_all(&mut patterns, seed.into_iter().map(|(k, v)| (k.into(), v.into())))?;
        add_all(&mut patterns, overlay.into_iter().map(|(k, v)| (k.into(), v.into())))?;
        Ok(Self { patterns })
    }

    /// An empty registry; only templates without references resolve against it.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.patterns.get(name).map(String::as_str)
    }

    /// Registry-owned name and template.
    pub(crate) fn entry(&self, name: &str) -> Option<(&str, &str)> {
        self.patterns
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Like `get`, but a missing name is an `UndefinedPattern` error.
    pub fn lookup(&self, name: &str) -> GrokResult<&str> {
        self.get(name).ok_or_else(|| GrokError::UndefinedPattern {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    /// All pattern names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.patterns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn add_all(
    patterns: &mut HashMap<String, String>,
    entries: impl Iterator<Item = (String, String)>,
) -> GrokResult<()> {
    for (name, template) in entries {
        if !is_pattern_name(&name) {
            return Err(GrokError::InvalidPatternName { name });
        }
        patterns.insert(name, template);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [(&str, &str); 0] = [];

    #[test]
    fn overlay_overrides_seed() {
        let reg = PatternRegistry::new(
            [("WORD", r"\b\w+\b"), ("NUM", r"\d+")],
            [("NUM", r"[0-9]+"), ("EXTRA", "x")],
        )
        .unwrap();
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.get("NUM"), Some("[0-9]+"));
        assert_eq!(reg.get("WORD"), Some(r"\b\w+\b"));
        assert_eq!(reg.names(), ["EXTRA", "NUM", "WORD"]);
    }

    #[test]
    fn names_are_case_sensitive() {
        let reg = PatternRegistry::new([("word", "a")], NONE).unwrap();
        assert!(reg.contains("word"));
        assert!(!reg.contains("WORD"));
    }

    #[test]
    fn lookup_missing_is_undefined_pattern() {
        let reg = PatternRegistry::empty();
        assert!(reg.is_empty());
        assert_eq!(
            reg.lookup("NOPE").unwrap_err(),
            GrokError::UndefinedPattern { name: "NOPE".into() }
        );
    }

    #[test]
    fn rejects_names_tokens_cannot_reference() {
        for bad in ["", "HAS SPACE", "BRACE}", "COLON:X"] {
            let err = PatternRegistry::new(NONE, [(bad, "x")]).unwrap_err();
            assert_eq!(err, GrokError::InvalidPatternName { name: bad.into() });
        }
    }

    #[test]
    fn accepts_dotted_and_dashed_names() {
        let reg =
            PatternRegistry::new([("NGINX.ACCESS", "a"), ("my-pattern_2", "b")], NONE).unwrap();
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn accepts_owned_maps() {
        let overlay: HashMap<String, String> =
            HashMap::from([("A".to_string(), "a".to_string())]);
        let reg = PatternRegistry::new(NONE, overlay).unwrap();
        assert_eq!(reg.lookup("A").unwrap(), "a");
    }
}
