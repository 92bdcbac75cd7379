mod com;
mod error;
mod msd;
mod stage;
mod unwrap;

pub use com::reduce_to_com;
pub use error::Error;
pub use msd::{
    ChunkContribution, EnsembleAccumulator, EnsembleStats, MOLECULE_AVERAGING_THRESHOLD,
    SkipReason, SkippedChunk, aggregate, non_gaussian,
};
pub use stage::{
    SeriesFiles, StageReport, aggregate_chunks, load_geometry, reduce_chunk, reduce_chunks,
    unwrap_chunk, unwrap_chunks,
};
pub use unwrap::{image_correction, unwrap};
