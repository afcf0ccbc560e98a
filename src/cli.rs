use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "turbogrok",
    version,
    about = "Extract typed fields from log lines with grok patterns",
    after_help = "A line counts as matched only when an expression yields at least one named \
                  field; an expression without %{NAME:field} references never matches."
)]
pub struct Args {
    /// Files to read; stdin when none are given
    pub files: Vec<PathBuf>,

    /// Grok expression to apply; repeat to try several in order. The first
    /// one that yields a named field wins
    #[arg(short, long = "expression", value_name = "GROK")]
    pub expressions: Vec<String>,

    /// Path to a YAML run configuration
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pattern file or directory to load (repeatable)
    #[arg(short = 'P', long = "patterns", value_name = "PATH")]
    pub pattern_paths: Vec<PathBuf>,

    /// Define a pattern inline as NAME=EXPR (repeatable)
    #[arg(short = 'D', long = "define", value_name = "NAME=EXPR", value_parser = parse_define)]
    pub defines: Vec<(String, String)>,

    /// Add a bundled pattern library (repeatable)
    #[arg(long = "library", value_name = "NAME", value_parser = ["grok", "aws"])]
    pub libraries: Vec<String>,

    /// Start from an empty registry instead of the bundled grok patterns
    #[arg(long)]
    pub no_default_patterns: bool,

    /// Drop fields whose capture is empty
    #[arg(long)]
    pub remove_empty: bool,

    /// Regex engine
    #[arg(long, value_name = "ENGINE", value_parser = ["standard", "fancy"])]
    pub backend: Option<String>,

    /// Backtracking budget for the fancy engine
    #[arg(long, value_name = "STEPS")]
    pub backtrack_limit: Option<usize>,

    /// Reject unknown type hints when compiling instead of when extracting
    #[arg(long)]
    pub strict_types: bool,

    /// Output format
    #[arg(short, long, default_value = "json", value_parser = ["json", "text"])]
    pub format: String,

    /// Only print lines that matched
    #[arg(long)]
    pub only_matching: bool,

    /// Print the resolved regex of each expression, then exit
    #[arg(long)]
    pub print_expression: bool,

    /// List all pattern names in the registry, then exit
    #[arg(long)]
    pub list_patterns: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

fn parse_define(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, expr)) if !name.is_empty() && !expr.is_empty() => {
            Ok((name.to_string(), expr.to_string()))
        }
        _ => Err(format!("expected NAME=EXPR, got `{s}`")),
    }
}
