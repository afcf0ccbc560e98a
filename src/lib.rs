pub mod backend;
pub mod cli;
pub mod compiled;
pub mod config;
pub mod error;
pub mod formatter;
pub mod fs;
pub mod grok;
pub mod multi;
pub mod patterns;
pub mod record;
pub mod registry;
pub mod resolve;
pub mod runner;
pub mod value;

#[cfg(test)]
pub mod testutil;

pub use backend::BackendKind;
pub use compiled::CompiledGrok;
pub use error::{GrokError, GrokResult};
pub use grok::{Config, Grok};
pub use multi::ExpressionSet;
pub use registry::PatternRegistry;
pub use value::{Fields, TypeHint, Value};

use anyhow::{Context, Result};

use cli::Args;
use config::{RunConfig, load_config};
use formatter::create_formatter;
use record::{Outcome, exit_code};
use runner::{read_inputs, run_lines};

/// Run the command line. Returns the exit code: 0 = every line matched,
/// 1 = some line didn't match, 2 = some line failed extraction.
pub fn run(args: Args) -> Result<i32> {
    let run_config = build_run_config(&args)?;
    let grok = Grok::new(run_config.grok_config()?).context("invalid pattern configuration")?;

    if args.list_patterns {
        for name in grok.registry().names() {
            println!("{name}");
        }
        return Ok(0);
    }

    if run_config.expressions.is_empty() {
        anyhow::bail!(
            "no expressions given; pass -e/--expression or set `expressions` in a config file"
        );
    }

    let mut compiled = Vec::with_capacity(run_config.expressions.len());
    for expression in &run_config.expressions {
        compiled.push(
            grok.compile(expression)
                .with_context(|| format!("failed to compile `{expression}`"))?,
        );
    }
    let set = ExpressionSet::new(compiled);

    if args.print_expression {
        for compiled in set.expressions() {
            println!("{}", compiled.expression());
        }
        return Ok(0);
    }

    let inputs = read_inputs(&args.files)?;
    let records = run_lines(&set, &inputs);

    for record in &records {
        if let Outcome::Failed(e) = &record.outcome {
            eprintln!("{}: {e}", record.location);
        }
    }

    let formatter = create_formatter(&args.format);
    if args.only_matching {
        let matched: Vec<_> = records.iter().filter(|r| r.is_match()).cloned().collect();
        formatter.print(&matched)?;
    } else {
        formatter.print(&records)?;
    }

    Ok(exit_code(&records))
}

/// Layer command-line options over the config file, if any.
///
/// Expressions given on the command line replace the file's; libraries,
/// pattern paths and definitions are appended so they take precedence.
pub fn build_run_config(args: &Args) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RunConfig::default(),
    };

    if !args.expressions.is_empty() {
        config.expressions = args.expressions.clone();
    }
    config.libraries.extend(args.libraries.iter().cloned());
    config.pattern_paths.extend(args.pattern_paths.iter().cloned());
    config.grok.patterns.extend(args.defines.iter().cloned());

    if args.no_default_patterns {
        config.grok.skip_default_patterns = true;
    }
    if args.remove_empty {
        config.grok.remove_empty_values = true;
    }
    if args.strict_types {
        config.grok.strict_type_hints = true;
    }
    if let Some(backend) = &args.backend {
        config.grok.backend = backend.parse().map_err(anyhow::Error::msg)?;
    }
    if args.backtrack_limit.is_some() {
        config.grok.backtrack_limit = args.backtrack_limit;
    }

    tracing::debug!(
        expressions = config.expressions.len(),
        libraries = ?config.libraries,
        pattern_paths = ?config.pattern_paths,
        "run configuration"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("turbogrok").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn command_line_overrides_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.yml");
        std::fs::write(
            &path,
            "expressions: ['%{INT:n}']\nlibraries: [aws]\nbackend: fancy\npatterns:\n  A: a\n",
        )
        .unwrap();

        let config = build_run_config(&args(&[
            "-c",
            path.to_str().unwrap(),
            "-e",
            "%{WORD:w}",
            "-D",
            "A=b",
            "-P",
            "extra",
            "--backend",
            "standard",
            "--remove-empty",
        ]))
        .unwrap();

        assert_eq!(config.expressions, ["%{WORD:w}"]);
        assert_eq!(config.libraries, ["aws"]);
        assert_eq!(config.pattern_paths, [PathBuf::from("extra")]);
        assert_eq!(config.grok.patterns["A"], "b");
        assert_eq!(config.grok.backend, BackendKind::Standard);
        assert!(config.grok.remove_empty_values);
    }

    #[test]
    fn config_expressions_kept_without_command_line_ones() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.yml");
        std::fs::write(&path, "expressions: ['%{INT:n}', '%{WORD:w}']\n").unwrap();
        let config = build_run_config(&args(&["-c", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.expressions, ["%{INT:n}", "%{WORD:w}"]);
    }

    #[test]
    fn missing_expression_is_fatal() {
        let err = run(args(&["--print-expression"])).unwrap_err();
        assert!(err.to_string().contains("no expressions given"));
    }

    #[test]
    fn compile_error_names_the_expression() {
        let err = run(args(&["-e", "%{NOPE:x}", "--print-expression"])).unwrap_err();
        assert_eq!(err.to_string(), "failed to compile `%{NOPE:x}`");
        assert_eq!(format!("{err:#}"), "failed to compile `%{NOPE:x}`: undefined pattern: %{NOPE}");
    }

    #[test]
    fn bad_define_name_is_fatal() {
        let err = run(args(&["-D", "BAD NAME=x", "--list-patterns"])).unwrap_err();
        assert!(format!("{err:#}").contains("invalid pattern configuration"));
    }
}
