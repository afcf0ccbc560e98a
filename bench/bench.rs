//! Benchmark grok compilation and extraction throughput.
//!
//! Usage:
//!   cargo run --release --bin bench_turbogrok                 # compile + extract, both backends
//!   cargo run --release --bin bench_turbogrok -- compile      # compile every bundled pattern
//!   cargo run --release --bin bench_turbogrok -- extract --lines 500000

use std::fmt::Write;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use rayon::prelude::*;

use turbogrok::patterns::{self, LIBRARIES};
use turbogrok::{BackendKind, Config, Grok};

// --- CLI ---

#[derive(Parser)]
#[command(about = "Benchmark turbogrok compile and extract throughput.")]
struct Args {
    /// Mode: compile, extract, or omit for all
    #[arg(default_value = "all")]
    mode: String,

    /// Synthetic input lines per extraction run
    #[arg(long, default_value_t = 200_000)]
    lines: usize,

    /// Timed repetitions per measurement (best is reported)
    #[arg(long, default_value_t = 3)]
    runs: u32,

    /// Write a markdown report here as well as printing it
    #[arg(long)]
    output: Option<PathBuf>,
}

// --- Workloads ---

struct Workload {
    name: &'static str,
    template: &'static str,
    line: fn(usize) -> String,
}

static WORKLOADS: &[Workload] = &[
    Workload {
        name: "apache-common",
        template: "%{COMMONAPACHELOG}",
        line: |i| {
            format!(
                r#"10.0.{}.{} - user{} [10/Oct/2000:13:55:{:02} -0700] "GET /static/{}.png HTTP/1.1" 200 {}"#,
                i % 256,
                (i / 256) % 256,
                i % 97,
                i % 60,
                i,
                1000 + i % 5000
            )
        },
    },
    Workload {
        name: "typed-kv",
        template: "%{IPV4:ip:string} %{NUMBER:status:int} %{NUMBER:duration:float}",
        line: |i| format!("192.168.1.{} {} {}.{}", i % 256, 200 + i % 300, i % 10, i % 1000),
    },
    Workload {
        name: "syslog",
        template: "%{SYSLOGBASE} %{GREEDYDATA:message}",
        line: |i| {
            format!(
                "Mar {:>2} 04:02:{:02} web-{} sshd[{}]: Accepted publickey for user{}",
                1 + i % 28,
                i % 60,
                i % 9,
                1000 + i,
                i % 50
            )
        },
    },
];

struct Measurement {
    label: String,
    elapsed: Duration,
    units: usize,
    unit: &'static str,
}

impl Measurement {
    fn rate(&self) -> f64 {
        self.units as f64 / self.elapsed.as_secs_f64()
    }
}

fn best_of<F: FnMut() -> usize>(runs: u32, mut f: F) -> (Duration, usize) {
    let mut best = Duration::MAX;
    let mut units = 0;
    for _ in 0..runs.max(1) {
        let start = Instant::now();
        units = f();
        best = best.min(start.elapsed());
    }
    (best, units)
}

// --- Phases ---

fn bench_compile(args: &Args) -> Vec<Measurement> {
    let mut results = Vec::new();
    for backend in [BackendKind::Standard, BackendKind::Fancy] {
        let grok = Grok::new(Config {
            backend,
            patterns: LIBRARIES
                .iter()
                .flat_map(|lib| lib.patterns.iter())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Config::default()
        })
        .expect("bundled libraries load");
        let names: Vec<String> = grok.registry().names().iter().map(|n| n.to_string()).collect();

        let (elapsed, units) = best_of(args.runs, || {
            for name in &names {
                grok.compile(&format!("%{{{name}}}"))
                    .unwrap_or_else(|e| panic!("{name}: {e}"));
            }
            names.len()
        });
        results.push(Measurement {
            label: format!("compile all bundled ({backend})"),
            elapsed,
            units,
            unit: "patterns",
        });
    }
    results
}

fn bench_extract(args: &Args) -> Vec<Measurement> {
    let mut results = Vec::new();
    for workload in WORKLOADS {
        let input: Vec<String> = (0..args.lines).map(workload.line).collect();

        for backend in [BackendKind::Standard, BackendKind::Fancy] {
            let grok = Grok::new(Config {
                backend,
                ..Config::default()
            })
            .expect("default config loads");
            let compiled = grok.compile(workload.template).expect("workload compiles");

            // Sanity check before timing.
            let sample = compiled.extract(input[0].as_bytes()).expect("sample extracts");
            assert!(!sample.is_empty(), "{} did not match its own input", workload.name);

            let (elapsed, units) = best_of(args.runs, || {
                input
                    .iter()
                    .filter(|l| compiled.extract(l.as_bytes()).is_ok_and(|f| !f.is_empty()))
                    .count()
            });
            results.push(Measurement {
                label: format!("{} ({backend}, 1 thread)", workload.name),
                elapsed,
                units,
                unit: "lines",
            });

            let (elapsed, units) = best_of(args.runs, || {
                input
                    .par_iter()
                    .filter(|l| compiled.extract(l.as_bytes()).is_ok_and(|f| !f.is_empty()))
                    .count()
            });
            results.push(Measurement {
                label: format!("{} ({backend}, rayon)", workload.name),
                elapsed,
                units,
                unit: "lines",
            });
        }
    }
    results
}

// --- Report ---

fn render(results: &[Measurement]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# turbogrok benchmark\n");
    let _ = writeln!(
        out,
        "{} bundled patterns, {} rayon threads\n",
        patterns::default_patterns().len(),
        rayon::current_num_threads()
    );
    let _ = writeln!(out, "| Measurement | Time | Units | Rate |");
    let _ = writeln!(out, "|---|---:|---:|---:|");
    for m in results {
        let _ = writeln!(
            out,
            "| {} | {:.1?} | {} {} | {:.0}/s |",
            m.label,
            m.elapsed,
            m.units,
            m.unit,
            m.rate()
        );
    }
    out
}

fn main() {
    let args = Args::parse();

    let mut results = Vec::new();
    match args.mode.as_str() {
        "compile" => results.extend(bench_compile(&args)),
        "extract" => results.extend(bench_extract(&args)),
        "all" => {
            results.extend(bench_compile(&args));
            results.extend(bench_extract(&args));
        }
        other => {
            eprintln!("unknown mode `{other}` (expected compile, extract or all)");
            std::process::exit(2);
        }
    }

    let report = render(&results);
    print!("{report}");
    if let Some(path) = &args.output {
        fs::write(path, &report)
            .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    }
}
