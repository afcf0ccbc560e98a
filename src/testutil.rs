use std::collections::HashMap;

use crate::registry::PatternRegistry;
use crate::value::{Fields, Value};

/// Build a registry from inline definitions only, without the bundled library.
pub fn registry(defs: &[(&str, &str)]) -> PatternRegistry {
    PatternRegistry::new(HashMap::<String, String>::new(), defs.iter().copied())
        .expect("test pattern names must be valid")
}

/// Build an expected field map.
pub fn fields(pairs: &[(&str, Value)]) -> Fields {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_only_given_definitions() {
        let r = registry(&[("A", "a"), ("B", "%{A}")]);
        assert_eq!(r.names(), ["A", "B"]);
        assert_eq!(r.get("B"), Some("%{A}"));
    }

    #[test]
    fn fields_builds_map() {
        let f = fields(&[("n", Value::Int(1)), ("s", Value::from("x"))]);
        assert_eq!(f.len(), 2);
        assert_eq!(f["n"], Value::Int(1));
    }
}
