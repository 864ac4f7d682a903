//! Client side of the resumable media upload workflow.
//!
//! This crate holds the **business logic** only. The storage service is
//! reached through the [`StorageBackend`] trait, which the CLI implements
//! on top of the HTTP client; tests implement it with mocks.
//!
//! # Pipeline
//!
//! 1. **Select**: classify files, reject invalid ones with a notice
//! 2. **Digest**: MD5 of each file (synthetic id on failure)
//! 3. **Dedup**: ask the service whether the file already exists
//! 4. **Transfer**: images in one call each, videos in fixed-size chunks
//! 5. **Merge-wait**: poll the session until completed or failed,
//!    re-uploading chunks the service reports missing

pub mod backend;
mod chunk_loop;
pub mod dedup;
pub mod error;
mod image;
pub mod notice;
pub mod orchestrator;
mod poller;
mod reporter;
pub mod selection;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export primary types for convenience.
pub use backend::{ChunkPayload, ImagePayload, StorageBackend};
pub use dedup::{DedupDecision, check_duplicate};
pub use error::UploadError;
pub use notice::{Notice, NoticeKind, NoticeQueue};
pub use orchestrator::UploadOrchestrator;
pub use poller::DEFAULT_FAILURE_MESSAGE;
pub use selection::{RejectReason, Rejection, Selection, select_files};
pub use types::{UploadEvent, UploadReport, UploadSettings, UploadedFile};
