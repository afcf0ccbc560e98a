pub mod pattern_files;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::grok::Config;
use crate::patterns;
use pattern_files::load_pattern_paths;

/// A YAML run file: expressions to try plus where their patterns come from.
///
/// ```yaml
/// expressions:
///   - '%{COMMONAPACHELOG}'
/// libraries: [aws]
/// pattern_paths: [./patterns]
/// patterns:
///   SERVICE: '[a-z-]+'
/// remove_empty_values: true
/// backend: fancy
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub expressions: Vec<String>,
    /// Bundled libraries layered on top of the default seed.
    pub libraries: Vec<String>,
    /// Pattern files or directories.
    pub pattern_paths: Vec<PathBuf>,
    #[serde(flatten)]
    pub grok: Config,
}

/// Load a run file. Relative `pattern_paths` are taken relative to the file.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let mut config: RunConfig = serde_yml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    if let Some(base) = path.parent() {
        for p in &mut config.pattern_paths {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    Ok(config)
}

impl RunConfig {
    /// Flatten libraries and pattern files into the engine configuration.
    ///
    /// Precedence, lowest first: libraries, pattern files, inline `patterns`.
    pub fn grok_config(&self) -> Result<Config> {
        let mut merged: HashMap<String, String> = HashMap::new();

        for name in &self.libraries {
            let Some(library) = patterns::library(name) else {
                anyhow::bail!(
                    "unknown pattern library `{name}` (available: {})",
                    patterns::library_names().join(", ")
                );
            };
            merged.extend(patterns::to_map(library.patterns));
        }

        merged.extend(load_pattern_paths(&self.pattern_paths)?);
        merged.extend(self.grok.patterns.clone());

        Ok(Config {
            patterns: merged,
            ..self.grok.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendKind;
    use std::fs;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("turbogrok.yml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(tmp.path(), "{}\n");
        let config = load_config(&path).unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn flattened_engine_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(
            tmp.path(),
            "expressions:\n  - '%{WORD:w}'\nskip_default_patterns: true\nremove_empty_values: true\nbackend: fancy\nbacktrack_limit: 5000\nstrict_type_hints: true\npatterns:\n  W: '\\w+'\n",
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.expressions, ["%{WORD:w}"]);
        assert!(config.grok.skip_default_patterns);
        assert!(config.grok.remove_empty_values);
        assert!(config.grok.strict_type_hints);
        assert_eq!(config.grok.backend, BackendKind::Fancy);
        assert_eq!(config.grok.backtrack_limit, Some(5000));
        assert_eq!(config.grok.patterns["W"], r"\w+");
    }

    #[test]
    fn unknown_backend_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(tmp.path(), "backend: pcre\n");
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_config(Path::new("/nonexistent/turbogrok.yml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn relative_pattern_paths_follow_the_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_config(tmp.path(), "pattern_paths: [patterns, /abs/dir]\n");
        let config = load_config(&path).unwrap();
        assert_eq!(
            config.pattern_paths,
            [tmp.path().join("patterns"), PathBuf::from("/abs/dir")]
        );
    }

    #[test]
    fn overlay_precedence() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("patterns");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("local"), "ELB_URI from-file\nFILE_ONLY x\nINLINE from-file\n").unwrap();

        let mut config = RunConfig {
            libraries: vec!["aws".into()],
            pattern_paths: vec![dir],
            ..RunConfig::default()
        };
        config.grok.patterns.insert("INLINE".into(), "inline".into());

        let merged = config.grok_config().unwrap();
        assert_eq!(merged.patterns["ELB_URI"], "from-file");
        assert_eq!(merged.patterns["FILE_ONLY"], "x");
        assert_eq!(merged.patterns["INLINE"], "inline");
        assert!(merged.patterns.contains_key("S3_ACCESS_LOG"));
    }

    #[test]
    fn unknown_library_is_an_error() {
        let config = RunConfig {
            libraries: vec!["nginx".into()],
            ..RunConfig::default()
        };
        let err = config.grok_config().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown pattern library `nginx` (available: grok, aws)"
        );
    }
}
