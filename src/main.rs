use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use turbogrok::cli::Args;

fn main() {
    let args = Args::parse();
    init_logging(args.debug);
    match turbogrok::run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(3);
        }
    }
}

/// `RUST_LOG` wins when set; otherwise warnings only, or debug with `--debug`.
fn init_logging(debug: bool) {
    let fallback = if debug { "turbogrok=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
