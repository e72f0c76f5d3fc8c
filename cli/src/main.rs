use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::info;
use varde::constants::{DEFAULT_CHUNK_BYTES, DEFAULT_QUEUE_CAP};
use varde::report::write_report;
use varde::{run, PipelineConfig};

#[derive(Parser, Debug)]
struct Args {
    /// Input file of key;value records, one per line
    #[arg(long)]
    input: PathBuf,
    /// Number of scan workers (defaults to available cores)
    #[arg(long)]
    workers: Option<usize>,
    /// Target chunk size in bytes
    #[arg(long, default_value_t = DEFAULT_CHUNK_BYTES)]
    chunk_bytes: usize,
    /// Capacity of the bounded chunk queue
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAP)]
    queue_cap: usize,
    /// Optional path to dump run timing stats as JSON
    #[arg(long)]
    stats_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let config = PipelineConfig {
        workers: args.workers.unwrap_or_else(num_workers_default),
        chunk_bytes: args.chunk_bytes,
        queue_cap: args.queue_cap,
    };
    let (table, stats) = run(&args.input, &config)?;

    let stdout = io::stdout().lock();
    write_report(&table, BufWriter::new(stdout))?;

    info!(total_ms = stats.total_ms, records = stats.scan.records, "Run complete");
    if let Some(path) = args.stats_json {
        let json = serde_json::to_vec_pretty(&stats)?;
        fs::write(&path, json).with_context(|| format!("write stats to {}", path.display()))?;
    }
    Ok(())
}

fn num_workers_default() -> usize {
    PipelineConfig::default().workers
}
