pub mod chunk;
pub mod constants;
pub mod decimal;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod summary;

pub use chunk::ChunkSource;
pub use pipeline::{run, PipelineConfig};
pub use summary::{KeySummary, SummaryTable};
