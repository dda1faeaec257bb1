mod errors;
mod parser;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use datarecon_core::{Orchestrator, RunOptions, DEFAULT_CHUNK_SIZE};
use datarecon_reports::utils::memory;
use datarecon_reports::{JsonFormatter, Notification, Reporter, StdOutFormatter};

/// Output format for reconciliation results
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Print results to standard output (human-readable)
    Stdout,
    /// Output results in JSON format
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "datarecon",
    version,
    author = "DataRecon Contributors",
    about = "DataRecon CLI - Source/target CSV snapshot reconciliation",
    long_about = "DataRecon compares source and target CSV snapshots table by table: \
                  row counts, duplicate keys, rows missing from the target, and \
                  cell-level mismatches over sorted chunks. Results land in per-table \
                  report files and a consolidated execution log.\n\n\
                  Example usage:\n  \
                  datarecon --config config.csv --mapping column_mapping.csv"
)]
struct Args {
    /// Path to the pair configuration CSV (which tables to reconcile)
    #[arg(short, long, value_name = "FILE", default_value = "config.csv")]
    config: PathBuf,

    /// Path to the column mapping CSV (source-to-target column pairs)
    #[arg(short, long, value_name = "FILE", default_value = "column_mapping.csv")]
    mapping: PathBuf,

    /// Directory holding the source snapshot files
    #[arg(long, value_name = "DIR", default_value = "source_files")]
    source_dir: PathBuf,

    /// Directory holding the target snapshot files
    #[arg(long, value_name = "DIR", default_value = "target_files")]
    target_dir: PathBuf,

    /// Directory the report files are written to
    #[arg(long, value_name = "DIR", default_value = "mismatch")]
    output_dir: PathBuf,

    /// Path of the consolidated execution log
    #[arg(long, value_name = "FILE", default_value = "test_execution_result.csv")]
    log_file: PathBuf,

    /// Rows per chunk in the sorted mismatch scan (at least 1)
    #[arg(
        long,
        value_name = "ROWS",
        default_value_t = DEFAULT_CHUNK_SIZE,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    chunk_size: usize,

    /// Output format for reconciliation results
    #[arg(short, long, value_enum, default_value = "stdout")]
    output: OutputFormat,

    /// Enable debug mode with verbose logging and error backtraces
    #[arg(short, long)]
    debug: bool,
}

fn run(args: Args) -> Result<()> {
    let pairs = parser::load_pairs(&args.config)
        .with_context(|| format!("Failed to load pair configuration: {}", args.config.display()))?;
    let mappings = parser::load_mappings(&args.mapping)
        .with_context(|| format!("Failed to load column mapping: {}", args.mapping.display()))?;

    let options = RunOptions::new(
        args.source_dir,
        args.target_dir,
        args.output_dir.clone(),
        args.log_file,
    )
    .with_chunk_size(args.chunk_size);
    let orchestrator = Orchestrator::new(options, mappings);

    let version = env!("CARGO_PKG_VERSION").to_string();
    let started = Instant::now();
    let start_memory = memory::resident_mb();

    let summary = orchestrator.run(&pairs).context("Reconciliation failed")?;

    let elapsed = started.elapsed().as_secs_f64();
    let memory_used = memory::delta_mb(start_memory);

    match args.output {
        OutputFormat::Stdout => {
            let mut reporter = StdOutFormatter::new(version);
            reporter.on_start();
            reporter.on_dispatch(pairs.len());
            for record in &summary.records {
                reporter.on_record(record);
            }
            reporter.on_complete(&summary, elapsed, memory_used);
        }
        OutputFormat::Json => {
            let mut reporter = JsonFormatter::new(version);
            for record in &summary.records {
                reporter.on_record(record);
            }
            reporter.on_complete(&summary, elapsed, memory_used);
            println!(
                "{}",
                reporter.to_json().context("Failed to serialize results")?
            );
        }
    }

    let notice = Notification::completion(&args.output_dir, elapsed, memory_used);
    println!("\n{}", notice);

    Ok(())
}

fn main() {
    let args = Args::parse();

    // Enable backtraces in debug mode
    if args.debug {
        std::env::set_var("RUST_BACKTRACE", "1");
    }
    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(err) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialize logging: {}", err);
    }

    if let Err(err) = run(args) {
        if std::env::var("RUST_BACKTRACE").is_ok() {
            eprintln!("Error: {:?}", err);
        } else {
            eprintln!("Error: {:#}", err);
            eprintln!("\nHint: Run with --debug flag for detailed stack traces");
        }
        std::process::exit(1);
    }
}
