use serde::Serialize;

#[derive(Default, Clone, Debug, Serialize)]
pub struct ScanStats {
    pub workers: usize,
    pub chunks: u64,
    pub bytes: u64,
    pub records: u64,
    pub min_worker_ms: u64,
    pub max_worker_ms: u64,
    pub wall_ms: u64,
}

#[derive(Default, Clone, Debug, Serialize)]
pub struct MergeStats {
    pub tables: usize,
    pub distinct_keys: usize,
    pub wall_ms: u64,
}

/// Timing and volume diagnostics for one pipeline run. Purely observational;
/// never feeds back into the computed result.
#[derive(Default, Clone, Debug, Serialize)]
pub struct RunStats {
    pub scan: ScanStats,
    pub merge: MergeStats,
    pub total_ms: u64,
}
