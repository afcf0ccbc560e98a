use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

/// Expand pattern paths into the list of files to load.
///
/// Paths keep their command-line order so that later ones override earlier
/// ones. A directory contributes every non-hidden file beneath it, sorted.
pub fn discover_pattern_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            files.extend(walk_directory(path)?);
        } else {
            anyhow::bail!("pattern path does not exist: {}", path.display());
        }
    }

    Ok(files)
}

fn walk_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut builder = WalkBuilder::new(dir);
    builder.hidden(true).git_ignore(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry.with_context(|| format!("error walking {}", dir.display()))?;
        if entry.file_type().is_some_and(|t| t.is_file()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
