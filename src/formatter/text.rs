use std::io::{self, Write};

use crate::formatter::Formatter;
use crate::record::{LineRecord, Outcome};
use crate::value::Value;

/// `source:line: key=value ...` with keys sorted. String values that
/// contain whitespace, quotes or `=` are quoted.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_to(&self, records: &[LineRecord], out: &mut dyn Write) -> io::Result<()> {
        for record in records {
            match &record.outcome {
                Outcome::Matched { fields, .. } => {
                    let mut pairs: Vec<_> = fields.iter().collect();
                    pairs.sort_by(|a, b| a.0.cmp(b.0));
                    write!(out, "{}:", record.location)?;
                    for (key, value) in pairs {
                        write!(out, " {key}={}", render_value(value))?;
                    }
                    writeln!(out)?;
                }
                Outcome::Unmatched => writeln!(out, "{}: no match", record.location)?,
                Outcome::Failed(_) => {}
            }
        }
        Ok(())
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) if needs_quotes(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '"' || c == '=')
}
