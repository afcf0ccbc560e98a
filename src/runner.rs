use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::multi::ExpressionSet;
use crate::record::{LineRecord, Location, Outcome};

/// One input's name and contents.
pub struct Input {
    pub source: String,
    pub bytes: Vec<u8>,
}

/// Read every file in `paths`, or stdin (named `-`) when there are none.
pub fn read_inputs(paths: &[PathBuf]) -> Result<Vec<Input>> {
    if paths.is_empty() {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("failed to read stdin")?;
        return Ok(vec![Input {
            source: "-".to_string(),
            bytes,
        }]);
    }

    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Input {
                source: path.display().to_string(),
                bytes,
            })
        })
        .collect()
}

/// Split into lines on `\n`, dropping a trailing `\r`. A final newline does
/// not start an extra empty line.
pub fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    let mut lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
        .into_iter()
        .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
        .collect()
}

/// Run `set` over every line of every input in parallel. Records come back
/// in input order.
pub fn run_lines(set: &ExpressionSet, inputs: &[Input]) -> Vec<LineRecord> {
    let start = Instant::now();

    let lines: Vec<(Location, &[u8])> = inputs
        .iter()
        .flat_map(|input| {
            split_lines(&input.bytes)
                .into_iter()
                .enumerate()
                .map(move |(idx, line)| {
                    let location = Location {
                        source: input.source.clone(),
                        line: idx + 1,
                    };
                    (location, line)
                })
        })
        .collect();

    let records: Vec<LineRecord> = lines
        .into_par_iter()
        .map(|(location, line)| {
            let outcome = match set.extract(line) {
                Ok(Some((expression, fields))) => Outcome::Matched { expression, fields },
                Ok(None) => Outcome::Unmatched,
                Err(e) => Outcome::Failed(e),
            };
            LineRecord { location, outcome }
        })
        .collect();

    tracing::debug!(
        lines = records.len(),
        matched = records.iter().filter(|r| r.is_match()).count(),
        elapsed = ?start.elapsed(),
        "processed input"
    );

    records
}
