//! Typed field values and the coercion rules behind `%{NAME:field:type}`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{GrokError, GrokResult};

/// Extraction result: field name to typed value.
pub type Fields = HashMap<String, Value>;

/// A single extracted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// Declared target type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeHint {
    Int,
    Float,
    String,
}

impl TypeHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeHint::Int => "int",
            TypeHint::Float => "float",
            TypeHint::String => "string",
        }
    }

    /// Convert captured text. `field` only feeds the error.
    pub fn coerce(self, field: &str, raw: &str) -> GrokResult<Value> {
        let failed = || GrokError::TypeCoercion {
            field: field.to_string(),
            raw_value: raw.to_string(),
            target_type: self,
        };
        match self {
            TypeHint::Int => raw.parse::<i64>().map(Value::Int).map_err(|_| failed()),
            TypeHint::Float => raw.parse::<f64>().map(Value::Float).map_err(|_| failed()),
            TypeHint::String => Ok(Value::String(raw.to_string())),
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeHint {
    type Err = ();

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "int" => Ok(TypeHint::Int),
            "float" => Ok(TypeHint::Float),
            "string" => Ok(TypeHint::String),
            _ => Err(()),
        }
    }
}

/// Field name to the raw type tag written in the template.
///
/// Tags stay unparsed until a value is coerced, so an unknown tag compiles
/// fine and only fails once a match actually produces that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeHints {
    tags: HashMap<String, String>,
}

impl TypeHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn declare(&mut self, field: &str, tag: &str) {
        self.tags.insert(field.to_string(), tag.to_string());
    }

    pub fn tag(&self, field: &str) -> Option<&str> {
        self.tags.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse the tag declared for `field`. `Ok(None)` means no hint.
    pub fn hint(&self, field: &str) -> GrokResult<Option<TypeHint>> {
        match self.tags.get(field) {
            None => Ok(None),
            Some(tag) => tag
                .parse::<TypeHint>()
                .map(Some)
                .map_err(|()| GrokError::InvalidTypeHint {
                    field: field.to_string(),
                    tag: tag.clone(),
                }),
        }
    }

    /// Check every declared tag up front.
    pub fn validate(&self) -> GrokResult<()> {
        let mut fields: Vec<&String> = self.tags.keys().collect();
        fields.sort();
        for field in fields {
            self.hint(field)?;
        }
        Ok(())
    }

    /// Coerce `raw` according to the hint for `field`; no hint means string.
    pub fn coerce(&self, field: &str, raw: &str) -> GrokResult<Value> {
        match self.hint(field)? {
            Some(hint) => hint.coerce(field, raw),
            None => Ok(Value::String(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_accepts_signs() {
        assert_eq!(TypeHint::Int.coerce("n", "200").unwrap(), Value::Int(200));
        assert_eq!(TypeHint::Int.coerce("n", "-17").unwrap(), Value::Int(-17));
        assert_eq!(TypeHint::Int.coerce("n", "+3").unwrap(), Value::Int(3));
    }

    #[test]
    fn int_rejects_fractions_and_empty() {
        let err = TypeHint::Int.coerce("status", "5.75").unwrap_err();
        assert_eq!(
            err,
            GrokError::TypeCoercion {
                field: "status".into(),
                raw_value: "5.75".into(),
                target_type: TypeHint::Int,
            }
        );
        assert!(TypeHint::Int.coerce("status", "").is_err());
    }

    #[test]
    fn float_parses_plain_and_exponent() {
        assert_eq!(TypeHint::Float.coerce("d", "0.8").unwrap(), Value::Float(0.8));
        assert_eq!(TypeHint::Float.coerce("d", "1e3").unwrap(), Value::Float(1000.0));
        assert_eq!(TypeHint::Float.coerce("d", "7").unwrap(), Value::Float(7.0));
        assert!(TypeHint::Float.coerce("d", "fast").is_err());
    }

    #[test]
    fn string_never_fails() {
        assert_eq!(
            TypeHint::String.coerce("s", "").unwrap(),
            Value::String(String::new())
        );
    }

    #[test]
    fn missing_hint_is_passthrough() {
        let hints = TypeHints::new();
        assert_eq!(hints.coerce("x", "42").unwrap(), Value::from("42"));
    }

    #[test]
    fn unknown_tag_fails_only_on_coercion() {
        let mut hints = TypeHints::new();
        hints.declare("word", "unknown");
        assert_eq!(hints.tag("word"), Some("unknown"));
        assert_eq!(
            hints.coerce("word", "hello").unwrap_err(),
            GrokError::InvalidTypeHint {
                field: "word".into(),
                tag: "unknown".into(),
            }
        );
        assert!(hints.validate().is_err());
    }

    #[test]
    fn later_declaration_replaces_earlier() {
        let mut hints = TypeHints::new();
        hints.declare("bytes", "int");
        hints.declare("bytes", "string");
        assert_eq!(hints.len(), 1);
        assert_eq!(hints.coerce("bytes", "12").unwrap(), Value::from("12"));
    }

    #[test]
    fn values_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            Value::from("a"),
            Value::Int(2),
            Value::Float(0.5),
        ])
        .unwrap();
        assert_eq!(json, r#"["a",2,0.5]"#);
    }
}
