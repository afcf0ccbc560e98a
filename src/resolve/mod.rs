//! Pattern resolution: expand `%{...}` references into one flat expression.
//!
//! Expansion is a single recursive pass over the template. Referenced
//! templates are spliced in place, so the backend sees one regex and the
//! usual adjacency, alternation and anchoring rules hold across pattern
//! boundaries.
//!
//! - `%{NAME}` becomes `(?:<expanded NAME>)`
//! - `%{NAME:field}` becomes `(?P<field>...)` and registers the field
//! - `%{NAME:field:type}` additionally records `field -> type`
//!
//! A field that can't be used verbatim as a capture-group name (it repeats,
//! clashes with a `(?P<name>...)` group written literally, or contains `.`,
//! `-`, `@`, `[`, `]`) is emitted under a generated alias; the alias table
//! maps it back at extraction time.

pub mod lexer;

use std::collections::{HashMap, HashSet};

use crate::error::{GrokError, GrokResult};
use crate::registry::PatternRegistry;
use crate::value::TypeHints;

use lexer::{Lexer, Reference, Segment};

const ALIAS_PREFIX: &str = "__grok";

/// Longest expanded expression, in bytes, before resolution gives up.
pub const MAX_EXPRESSION_LEN: usize = 1 << 20;

/// Output of [`resolve`]: a backend-ready expression plus field metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPattern {
    pub expression: String,
    pub type_hints: TypeHints,
    /// Fields in the order their groups open, duplicates included.
    pub fields: Vec<String>,
    /// Generated group name to field name.
    pub aliases: HashMap<String, String>,
}

impl ResolvedPattern {
    /// Field name for a capture group name.
    pub fn field_for_group<'a>(&'a self, group: &'a str) -> &'a str {
        self.aliases.get(group).map_or(group, String::as_str)
    }
}

/// Expand `template` against `registry`.
pub fn resolve(template: &str, registry: &PatternRegistry) -> GrokResult<ResolvedPattern> {
    let first = Resolver::new(registry, HashSet::new()).run(template)?;
    if !first.literal_clash {
        return Ok(first.out);
    }
    // A literal group came after a field that took its name: expand again
    // with every literal group name reserved up front.
    let second = Resolver::new(registry, first.literal_groups).run(template)?;
    Ok(second.out)
}

struct Resolver<'r> {
    registry: &'r PatternRegistry,
    /// Names currently being expanded, outermost first.
    chain: Vec<&'r str>,
    group_names: HashSet<String>,
    /// Names of groups written literally in templates or bodies.
    literal_groups: HashSet<String>,
    literal_clash: bool,
    out: ResolvedPattern,
}

impl<'r> Resolver<'r> {
    fn new(registry: &'r PatternRegistry, reserved: HashSet<String>) -> Self {
        Self {
            registry,
            chain: Vec::new(),
            group_names: reserved,
            literal_groups: HashSet::new(),
            literal_clash: false,
            out: ResolvedPattern::default(),
        }
    }

    fn run(mut self, template: &str) -> GrokResult<Self> {
        let mut expression = String::with_capacity(template.len());
        self.expand(template, &mut expression)?;
        self.out.expression = expression;
        Ok(self)
    }

    fn expand(&mut self, template: &str, expression: &mut String) -> GrokResult<()> {
        for segment in Lexer::new(template) {
            match segment {
                Segment::Literal(text) => {
                    self.reserve_literal_groups(text);
                    expression.push_str(text);
                }
                Segment::Reference(reference) => self.expand_reference(&reference, expression)?,
            }
            if expression.len() > MAX_EXPRESSION_LEN {
                return Err(GrokError::PatternSyntax {
                    message: format!("expanded expression exceeds {MAX_EXPRESSION_LEN} bytes"),
                });
            }
        }
        Ok(())
    }

    fn expand_reference(
        &mut self,
        reference: &Reference<'_>,
        expression: &mut String,
    ) -> GrokResult<()> {
        let registry = self.registry;
        let (name, body) = match registry.entry(reference.pattern) {
            Some(entry) => entry,
            None => {
                return Err(GrokError::UndefinedPattern {
                    name: reference.pattern.to_string(),
                });
            }
        };

        if self.chain.contains(&name) {
            let mut chain: Vec<String> = self.chain.iter().map(|n| n.to_string()).collect();
            chain.push(name.to_string());
            return Err(GrokError::CyclicPattern { chain });
        }

        match reference.field {
            Some(field) => {
                let group = self.group_name(field);
                expression.push_str("(?P<");
                expression.push_str(&group);
                expression.push('>');
                self.out.fields.push(field.to_string());
                if let Some(tag) = reference.type_tag {
                    self.out.type_hints.declare(field, tag);
                }
            }
            None => expression.push_str("(?:"),
        }

        self.chain.push(name);
        self.expand(body, expression)?;
        self.chain.pop();
        expression.push(')');
        Ok(())
    }

    /// Record the names of `(?P<name>` and `(?<name>` groups in `text` so
    /// later fields don't reuse them.
    fn reserve_literal_groups(&mut self, text: &str) {
        for name in literal_group_names(text) {
            if !self.group_names.insert(name.to_string()) && !self.literal_groups.contains(name) {
                self.literal_clash = true;
            }
            self.literal_groups.insert(name.to_string());
        }
    }

    /// Pick the capture-group name for `field`, aliasing when it can't be
    /// used as is.
    fn group_name(&mut self, field: &str) -> String {
        if is_group_name(field)
            && !field.starts_with(ALIAS_PREFIX)
            && self.group_names.insert(field.to_string())
        {
            return field.to_string();
        }
        let mut n = self.out.aliases.len();
        let alias = loop {
            let candidate = format!("{ALIAS_PREFIX}{n}");
            if !self.group_names.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        self.group_names.insert(alias.clone());
        self.out.aliases.insert(alias.clone(), field.to_string());
        alias
    }
}

/// Names of the named groups opened in a literal regex fragment. Escaped
/// parentheses and lookbehinds are skipped.
fn literal_group_names(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut names = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'(' => {
                let rest = &text[i + 1..];
                let name = rest
                    .strip_prefix("?P<")
                    .or_else(|| rest.strip_prefix("?<"))
                    .and_then(|after| after.split_once('>'))
                    .map(|(name, _)| name)
                    .filter(|name| is_group_name(name));
                names.extend(name);
                i += 1;
            }
            _ => i += 1,
        }
    }
    names
}

/// Group names both backends accept.
fn is_group_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::registry;

    #[test]
    fn template_without_tokens_is_unchanged() {
        let reg = registry(&[("WORD", r"\w+")]);
        let resolved = resolve(r"^(a|b)+\s\d{2,3}$", &reg).unwrap();
        assert_eq!(resolved.expression, r"^(a|b)+\s\d{2,3}$");
        assert!(resolved.type_hints.is_empty());
        assert!(resolved.fields.is_empty());
    }

    #[test]
    fn unnamed_reference_is_non_capturing() {
        let reg = registry(&[("WORD", r"\w+")]);
        let resolved = resolve("%{WORD} x", &reg).unwrap();
        assert_eq!(resolved.expression, r"(?:\w+) x");
        assert!(resolved.fields.is_empty());
    }

    #[test]
    fn named_reference_is_named_group_with_hint() {
        let reg = registry(&[("NUMBER", r"\d+")]);
        let resolved = resolve("%{NUMBER:status:int} %{NUMBER:size}", &reg).unwrap();
        assert_eq!(resolved.expression, r"(?P<status>\d+) (?P<size>\d+)");
        assert_eq!(resolved.fields, ["status", "size"]);
        assert_eq!(resolved.type_hints.tag("status"), Some("int"));
        assert_eq!(resolved.type_hints.tag("size"), None);
    }

    #[test]
    fn nested_references_expand_recursively() {
        let reg = registry(&[
            ("OCTET", "[0-9]{1,3}"),
            ("IP", r"%{OCTET}(?:\.%{OCTET}){3}"),
            ("HOSTPORT", "%{IP:host}:%{OCTET:port:int}"),
        ]);
        let resolved = resolve("%{HOSTPORT}", &reg).unwrap();
        assert_eq!(
            resolved.expression,
            r"(?:(?P<host>(?:[0-9]{1,3})(?:\.(?:[0-9]{1,3})){3}):(?P<port>[0-9]{1,3}))"
        );
        assert_eq!(resolved.fields, ["host", "port"]);
    }

    #[test]
    fn undefined_reference_names_the_reference() {
        let reg = registry(&[("A", "%{B}")]);
        assert_eq!(
            resolve("%{UNKNOWNPATTERN}", &reg).unwrap_err(),
            GrokError::UndefinedPattern {
                name: "UNKNOWNPATTERN".into()
            }
        );
        assert_eq!(
            resolve("%{A}", &reg).unwrap_err(),
            GrokError::UndefinedPattern { name: "B".into() }
        );
    }

    #[test]
    fn direct_self_reference_is_cyclic() {
        let reg = registry(&[("LOOP", "a%{LOOP}")]);
        assert_eq!(
            resolve("%{LOOP}", &reg).unwrap_err(),
            GrokError::CyclicPattern {
                chain: vec!["LOOP".into(), "LOOP".into()]
            }
        );
    }

    #[test]
    fn transitive_cycle_reports_chain() {
        let reg = registry(&[("A", "%{B:b}"), ("B", "x|%{C}"), ("C", "%{A}")]);
        assert_eq!(
            resolve("start %{A}", &reg).unwrap_err(),
            GrokError::CyclicPattern {
                chain: vec!["A".into(), "B".into(), "C".into(), "A".into()]
            }
        );
    }

    #[test]
    fn diamond_reuse_is_not_a_cycle() {
        let reg = registry(&[("D", "d"), ("B", "%{D}"), ("C", "%{D}"), ("A", "%{B}%{C}")]);
        let resolved = resolve("%{A}", &reg).unwrap();
        assert_eq!(resolved.expression, "(?:(?:(?:d))(?:(?:d)))");
    }

    #[test]
    fn repeated_field_gets_alias() {
        let reg = registry(&[("N", r"\d")]);
        let resolved = resolve("%{N:x} %{N:x:int}", &reg).unwrap();
        assert_eq!(resolved.expression, r"(?P<x>\d) (?P<__grok0>\d)");
        assert_eq!(resolved.fields, ["x", "x"]);
        assert_eq!(resolved.field_for_group("__grok0"), "x");
        assert_eq!(resolved.field_for_group("x"), "x");
        assert_eq!(resolved.type_hints.tag("x"), Some("int"));
    }

    #[test]
    fn punctuated_field_gets_alias() {
        let reg = registry(&[("W", r"\w+")]);
        let resolved = resolve("%{W:[http][verb]} %{W:user-agent}", &reg).unwrap();
        assert_eq!(resolved.expression, r"(?P<__grok0>\w+) (?P<__grok1>\w+)");
        assert_eq!(resolved.field_for_group("__grok0"), "[http][verb]");
        assert_eq!(resolved.field_for_group("__grok1"), "user-agent");
    }

    #[test]
    fn field_named_like_an_alias_is_aliased_too() {
        let reg = registry(&[("W", r"\w+")]);
        let resolved = resolve("%{W:a.b} %{W:__grok0}", &reg).unwrap();
        assert_eq!(resolved.expression, r"(?P<__grok0>\w+) (?P<__grok1>\w+)");
        assert_eq!(resolved.field_for_group("__grok1"), "__grok0");
    }

    #[test]
    fn literal_group_before_field_reserves_its_name() {
        let reg = registry(&[("W", r"\w+")]);
        let resolved = resolve(r"(?P<ts>\d+) %{W:ts}", &reg).unwrap();
        assert_eq!(resolved.expression, r"(?P<ts>\d+) (?P<__grok0>\w+)");
        assert_eq!(resolved.field_for_group("__grok0"), "ts");
        assert_eq!(resolved.fields, ["ts"]);
    }

    #[test]
    fn literal_group_after_field_moves_the_field_aside() {
        let reg = registry(&[("W", r"\w+")]);
        let resolved = resolve(r"%{W:ts} (?<ts>\d+) %{W:other}", &reg).unwrap();
        assert_eq!(resolved.expression, r"(?P<__grok0>\w+) (?<ts>\d+) (?P<other>\w+)");
        assert_eq!(resolved.field_for_group("__grok0"), "ts");
        assert_eq!(resolved.field_for_group("other"), "other");
    }

    #[test]
    fn literal_group_inside_a_pattern_body_is_reserved() {
        let reg = registry(&[
            ("STAMP", r"(?P<timestamp>\d+)"),
            ("LINE", "%{STAMP} %{W:msg}"),
            ("W", r"\w+"),
        ]);
        let resolved = resolve("%{LINE} %{W:timestamp}", &reg).unwrap();
        assert_eq!(
            resolved.expression,
            r"(?:(?:(?P<timestamp>\d+)) (?P<msg>\w+)) (?P<__grok0>\w+)"
        );
        assert_eq!(resolved.field_for_group("__grok0"), "timestamp");
    }

    #[test]
    fn literal_alias_lookalike_is_skipped_by_generated_aliases() {
        let reg = registry(&[("W", r"\w+")]);
        let resolved = resolve(r"%{W:a.b} (?P<__grok0>x)", &reg).unwrap();
        assert_eq!(resolved.expression, r"(?P<__grok1>\w+) (?P<__grok0>x)");
        assert_eq!(resolved.field_for_group("__grok1"), "a.b");
    }

    #[test]
    fn literal_group_scan_ignores_escapes_and_lookarounds() {
        assert_eq!(
            literal_group_names(r"\(?P<x>y\) (?<=a) (?<!b) (?P<ok>c) (?<also>d) (?:e)"),
            ["ok", "also"]
        );
    }

    #[test]
    fn runaway_expansion_is_cut_off() {
        let mut defs = vec![("L0".to_string(), "abcd".to_string())];
        for k in 1..=24 {
            defs.push((format!("L{k}"), format!("%{{L{p}}}%{{L{p}}}", p = k - 1)));
        }
        let reg = PatternRegistry::new(defs, std::iter::empty::<(String, String)>()).unwrap();
        let err = resolve("%{L24}", &reg).unwrap_err();
        assert!(
            matches!(err, GrokError::PatternSyntax { ref message } if message.contains("exceeds")),
            "{err:?}"
        );
        // Smaller trees still expand.
        assert!(resolve("%{L10}", &reg).is_ok());
    }

    #[test]
    fn type_hints_scoped_per_template() {
        let reg = registry(&[("NUMBER", r"\d+")]);
        let a = resolve("%{NUMBER:bytes:int}", &reg).unwrap();
        let b = resolve("%{NUMBER:bytes:string}", &reg).unwrap();
        assert_eq!(a.type_hints.tag("bytes"), Some("int"));
        assert_eq!(b.type_hints.tag("bytes"), Some("string"));
    }

    #[test]
    fn unknown_type_tag_is_recorded_not_rejected() {
        let reg = registry(&[("WORD", r"\w+")]);
        let resolved = resolve("%{WORD:word:unknown}", &reg).unwrap();
        assert_eq!(resolved.type_hints.tag("word"), Some("unknown"));
    }

    #[test]
    fn group_name_rules() {
        assert!(is_group_name("status"));
        assert!(is_group_name("_x1"));
        assert!(!is_group_name("1x"));
        assert!(!is_group_name("a.b"));
        assert!(!is_group_name(""));
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        const NONE: std::iter::Empty<(String, String)> = std::iter::empty();

        proptest! {
            #[test]
            fn token_free_templates_resolve_to_themselves(template in "[^%]{0,40}") {
                let reg = registry(&[("WORD", r"\w+")]);
                let resolved = resolve(&template, &reg).unwrap();
                prop_assert_eq!(resolved.expression, template);
                prop_assert!(resolved.type_hints.is_empty());
            }

            #[test]
            fn every_named_reference_becomes_one_field(
                fields in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 1..6),
            ) {
                let reg = registry(&[("WORD", r"\w+")]);
                let template = fields
                    .iter()
                    .map(|f| format!("%{{WORD:{f}}}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                let resolved = resolve(&template, &reg).unwrap();
                prop_assert_eq!(&resolved.fields, &fields);
                prop_assert!(!resolved.expression.contains("%{"), "resolved expression still contains %{{");
                prop_assert_eq!(resolved.expression.matches("(?P<").count(), fields.len());
            }

            #[test]
            fn chains_of_any_length_resolve_without_cycles(depth in 1usize..40) {
                let mut defs: Vec<(String, String)> = (0..depth)
                    .map(|i| (format!("P{i}"), format!("%{{P{}}}", i + 1)))
                    .collect();
                defs.push((format!("P{depth}"), "leaf".to_string()));
                let reg = PatternRegistry::new(defs, NONE).unwrap();
                let resolved = resolve("%{P0:out}", &reg).unwrap();
                prop_assert!(resolved.expression.contains("leaf"));
            }

            #[test]
            fn rings_of_any_length_are_cyclic(len in 1usize..20) {
                let defs: Vec<(String, String)> = (0..len)
                    .map(|i| (format!("R{i}"), format!("%{{R{}}}", (i + 1) % len)))
                    .collect();
                let reg = PatternRegistry::new(defs, NONE).unwrap();
                let err = resolve("%{R0}", &reg).unwrap_err();
                let is_cyclic = matches!(
                    err,
                    GrokError::CyclicPattern { ref chain } if chain.len() == len + 1
                );
                prop_assert!(is_cyclic);
            }
        }
    }
}
