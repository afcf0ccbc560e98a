use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::fs::discover_pattern_files;

/// Parse logstash-style pattern definitions: `NAME EXPRESSION` per line.
///
/// The name ends at the first whitespace; the rest of the line, trimmed, is
/// the expression. Blank lines and `#` comments are skipped.
pub fn parse_pattern_file(source: &str, origin: &Path) -> Result<Vec<(String, String)>> {
    let mut defs = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, expression) = line
            .split_once(char::is_whitespace)
            .map(|(n, e)| (n, e.trim()))
            .unwrap_or((line, ""));
        if expression.is_empty() {
            bail!(
                "{}:{}: pattern `{name}` has no expression",
                origin.display(),
                idx + 1
            );
        }
        defs.push((name.to_string(), expression.to_string()));
    }

    Ok(defs)
}

/// Load every definition under `paths`, in order. A name defined twice keeps
/// its last definition once collected into a map.
pub fn load_pattern_paths(paths: &[PathBuf]) -> Result<Vec<(String, String)>> {
    let mut defs = Vec::new();

    for file in discover_pattern_files(paths)? {
        let source = std::fs::read_to_string(&file)
            .with_context(|| format!("failed to read pattern file {}", file.display()))?;
        let parsed = parse_pattern_file(&source, &file)?;
        tracing::debug!(file = %file.display(), patterns = parsed.len(), "loaded pattern file");
        defs.extend(parsed);
    }

    Ok(defs)
}
