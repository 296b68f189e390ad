//! Collection bench CLI.
//!
//! Runs the collection lookup and predicate filter suites and prints a
//! `Benchmark Mode Cnt Score Error Units` table or a JSON report.

use clap::Parser;
use collection_bench::config::{LogFormat, LoggingConfig, OutputFormat, RunOptions};
use collection_bench::perf::list_benchmarks;
use collection_bench::suites::all_suites;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "collection-bench")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Collection lookup and predicate filter microbenchmarks", long_about = None)]
struct Cli {
    /// List benchmarks and their parameters, then exit
    #[arg(short, long)]
    list: bool,

    #[command(flatten)]
    options: RunOptions,

    #[command(flatten)]
    logging: LoggingConfig,
}

fn init_logging(config: &LoggingConfig) {
    let filter = match &config.level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.logging);

    let suites = all_suites();
    if cli.list {
        print!("{}", list_benchmarks(&suites));
        return ExitCode::SUCCESS;
    }

    debug!(options = ?cli.options, "Parsed run options");
    let runner = match cli.options.build_runner() {
        Ok(runner) => runner,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            return ExitCode::from(2);
        },
    };

    let report = match runner.run_all(&suites) {
        Ok(report) => report,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            return ExitCode::from(2);
        },
    };

    match cli.options.format {
        OutputFormat::Table => print!("{}", report.render_table()),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize report: {e}");
                return ExitCode::FAILURE;
            },
        },
    }

    info!(
        completed = report.results().count(),
        failed = report.failures().count(),
        "Run finished"
    );
    if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
