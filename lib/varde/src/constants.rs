//! Centralized default values for pipeline tuning.

// Target chunk size. Large enough to amortize channel hand-off, small enough
// that queue_cap in-flight chunks stay cheap on memory.
pub const DEFAULT_CHUNK_BYTES: usize = 1024 * 1024; // 1 MiB

// Bounded hand-off queue between the chunk producer and the workers. Caps
// in-flight memory at roughly queue_cap * chunk_bytes and gives the producer
// natural backpressure.
pub const DEFAULT_QUEUE_CAP: usize = 8;

// Read granularity of the forward scan that extends a chunk to the next
// newline boundary.
pub const BOUNDARY_SCAN_BYTES: usize = 4096;
