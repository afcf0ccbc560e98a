use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;

use crate::formatter::Formatter;
use crate::record::{LineRecord, Outcome};
use crate::value::Value;

/// One JSON object per line.
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonLine<'a> {
    source: &'a str,
    line: usize,
    matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    expression: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<&'a str, &'a Value>>,
}

impl Formatter for JsonFormatter {
    fn format_to(&self, records: &[LineRecord], out: &mut dyn Write) -> io::Result<()> {
        for record in records {
            let (expression, fields) = match &record.outcome {
                Outcome::Matched { expression, fields } => (
                    Some(*expression),
                    Some(fields.iter().map(|(k, v)| (k.as_str(), v)).collect()),
                ),
                Outcome::Unmatched => (None, None),
                Outcome::Failed(_) => continue,
            };
            let line = JsonLine {
                source: &record.location.source,
                line: record.location.line,
                matched: expression.is_some(),
                expression,
                fields,
            };
            serde_json::to_writer(&mut *out, &line)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Location;
    use crate::testutil::fields;

    fn render(records: &[LineRecord]) -> String {
        let mut buf = Vec::new();
        JsonFormatter.format_to(records, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn at(line: usize, outcome: Outcome) -> LineRecord {
        LineRecord {
            location: Location {
                source: "-".to_string(),
                line,
            },
            outcome,
        }
    }

    #[test]
    fn matched_line_has_typed_fields_in_key_order() {
        let out = render(&[at(
            4,
            Outcome::Matched {
                expression: 1,
                fields: fields(&[
                    ("status", Value::Int(200)),
                    ("duration", Value::Float(0.8)),
                    ("ip", Value::from("127.0.0.1")),
                ]),
            },
        )]);
        assert_eq!(
            out,
            "{\"source\":\"-\",\"line\":4,\"matched\":true,\"expression\":1,\"fields\":{\"duration\":0.8,\"ip\":\"127.0.0.1\",\"status\":200}}\n"
        );
    }

    #[test]
    fn unmatched_line_has_no_fields() {
        let out = render(&[at(2, Outcome::Unmatched)]);
        assert_eq!(out, "{\"source\":\"-\",\"line\":2,\"matched\":false}\n");
    }

    #[test]
    fn strings_are_escaped() {
        let out = render(&[at(
            1,
            Outcome::Matched {
                expression: 0,
                fields: fields(&[("msg", Value::from("say \"hi\"\t"))]),
            },
        )]);
        let parsed: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(parsed["fields"]["msg"], "say \"hi\"\t");
    }
}
