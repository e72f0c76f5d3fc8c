use crate::chunk::ChunkSource;
use crate::constants::{DEFAULT_CHUNK_BYTES, DEFAULT_QUEUE_CAP};
use crate::decimal::parse_tenths;
use crate::stats::{MergeStats, RunStats, ScanStats};
use crate::summary::SummaryTable;
use anyhow::{anyhow, Context, Result};
use crossbeam_channel as channel;
use memchr::memchr;
use std::fs::File;
use std::path::Path;
use std::thread;
use std::time::Instant;
use tracing::info;

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Degree of parallelism for the scan phase.
    pub workers: usize,
    /// Target chunk size; actual chunks run past this to the next newline.
    pub chunk_bytes: usize,
    /// Capacity of the bounded chunk hand-off queue.
    pub queue_cap: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            chunk_bytes: DEFAULT_CHUNK_BYTES,
            queue_cap: DEFAULT_QUEUE_CAP,
        }
    }
}

#[derive(Default, Clone, Debug)]
struct WorkerStats {
    chunks: u64,
    bytes: u64,
    records: u64,
    wall_ms: u64,
}

/// Runs the whole pipeline over `path`: one sequential chunk producer,
/// `config.workers` scanning workers with private tables, then a merge into
/// the global table once every worker has finished. Any malformed record or
/// I/O failure aborts the run.
pub fn run(path: &Path, config: &PipelineConfig) -> Result<(SummaryTable, RunStats)> {
    let total_start = Instant::now();
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let workers = config.workers.max(1);
    let chunk_bytes = config.chunk_bytes;
    let (tx, rx) = channel::bounded::<Vec<u8>>(config.queue_cap.max(1));

    let scan_start = Instant::now();
    let (tables, per_worker, worker_err, producer_res) = thread::scope(|s| {
        let producer = s.spawn(move || -> Result<(u64, u64)> {
            let mut source = ChunkSource::new(file, chunk_bytes);
            let mut chunks = 0u64;
            let mut bytes = 0u64;
            while let Some(chunk) = source.next_chunk().context("read input")? {
                chunks += 1;
                bytes += chunk.len() as u64;
                // A closed channel means every worker is gone; the worker
                // error surfaces at join.
                if tx.send(chunk).is_err() {
                    break;
                }
            }
            Ok((chunks, bytes))
        });

        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let rx = rx.clone();
                s.spawn(move || -> Result<(SummaryTable, WorkerStats)> {
                    let start = Instant::now();
                    let mut table = SummaryTable::new();
                    let mut stats = WorkerStats::default();
                    while let Ok(chunk) = rx.recv() {
                        stats.records += scan_chunk(&chunk, &mut table)?;
                        stats.chunks += 1;
                        stats.bytes += chunk.len() as u64;
                    }
                    stats.wall_ms = start.elapsed().as_millis() as u64;
                    Ok((table, stats))
                })
            })
            .collect();
        drop(rx);

        // Joining every worker is the completion barrier gating the merge.
        let mut tables = Vec::with_capacity(workers);
        let mut per_worker = Vec::with_capacity(workers);
        let mut worker_err = None;
        for handle in handles {
            match handle.join().map_err(|_| anyhow!("worker thread panicked")) {
                Ok(Ok((table, stats))) => {
                    tables.push(table);
                    per_worker.push(stats);
                }
                Ok(Err(e)) | Err(e) => {
                    if worker_err.is_none() {
                        worker_err = Some(e);
                    }
                }
            }
        }
        let producer_res = producer
            .join()
            .map_err(|_| anyhow!("chunk producer panicked"))
            .and_then(|r| r);
        (tables, per_worker, worker_err, producer_res)
    });

    if let Some(e) = worker_err {
        return Err(e);
    }
    let (chunks, bytes) = producer_res?;
    let scan_wall_ms = scan_start.elapsed().as_millis() as u64;

    let records: u64 = per_worker.iter().map(|w| w.records).sum();
    let min_worker_ms = per_worker.iter().map(|w| w.wall_ms).min().unwrap_or(0);
    let max_worker_ms = per_worker.iter().map(|w| w.wall_ms).max().unwrap_or(0);
    info!(
        phase = "scan",
        workers,
        chunks,
        bytes,
        records,
        min_worker_ms,
        max_worker_ms,
        wall_ms = scan_wall_ms,
        "Scan phase complete"
    );

    let merge_start = Instant::now();
    let table_count = tables.len();
    let mut tables = tables.into_iter();
    let mut global = tables.next().unwrap_or_default();
    for table in tables {
        global.merge(table);
    }
    let merge_wall_ms = merge_start.elapsed().as_millis() as u64;
    info!(
        phase = "merge",
        tables = table_count,
        distinct_keys = global.len(),
        wall_ms = merge_wall_ms,
        "Merge phase complete"
    );

    let stats = RunStats {
        scan: ScanStats {
            workers,
            chunks,
            bytes,
            records,
            min_worker_ms,
            max_worker_ms,
            wall_ms: scan_wall_ms,
        },
        merge: MergeStats {
            tables: table_count,
            distinct_keys: global.len(),
            wall_ms: merge_wall_ms,
        },
        total_ms: total_start.elapsed().as_millis() as u64,
    };
    Ok((global, stats))
}

/// Scans one line-aligned chunk into `table`, returning the record count.
/// Every non-empty line must be `key;value`; anything else is fatal.
fn scan_chunk(chunk: &[u8], table: &mut SummaryTable) -> Result<u64> {
    let mut records = 0u64;
    for line in chunk.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        let sep = memchr(b';', line).ok_or_else(|| {
            anyhow!(
                "malformed record {:?} (expected key;value)",
                String::from_utf8_lossy(line)
            )
        })?;
        let tenths = parse_tenths(&line[sep + 1..])
            .with_context(|| format!("malformed record {:?}", String::from_utf8_lossy(line)))?;
        table.record(&line[..sep], tenths);
        records += 1;
    }
    Ok(records)
}
