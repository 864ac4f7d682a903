//! Client-side building blocks of the resumable chunked upload.
//!
//! Everything here is transport-agnostic: planning chunk windows,
//! hashing and reading files off the async workers, tracking the state of
//! every chunk and keeping the displayed progress monotonic.

mod chunked;
mod digest;
mod plan;
mod progress;
mod tracker;
mod validation;

pub use chunked::ChunkReader;
pub use digest::{ContentDigest, digest_file, md5_file, synthetic_id};
pub use plan::{ChunkPlan, ChunkRange};
pub use progress::{MAX_PENDING_PERCENT, ProgressGauge};
pub use tracker::{ChunkState, ChunkTracker};
pub use validation::{MediaClass, UploadCandidate, classify};

/// Chunk size used when the service does not declare one: 5 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 5 * 1024 * 1024;

/// Size of each sequential read while hashing a file: 2 MiB.
pub const HASH_READ_SIZE: usize = 2 * 1024 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("chunk {index} out of range (plan has {count} chunks)")]
    ChunkOutOfRange { index: u32, count: u32 },

    #[error("short read on chunk {index}: expected {expected} bytes, got {actual}")]
    ShortRead {
        index: u32,
        expected: u64,
        actual: u64,
    },

    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
}
