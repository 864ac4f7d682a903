//! Data types for the upload flow.

use std::time::Duration;

use beicun_transfer::MediaClass;

use crate::notice::Notice;
use crate::selection::Rejection;

const MIB: u64 = 1024 * 1024;

/// Tunables of an upload run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    /// Chunks uploaded concurrently per batch.
    pub concurrency: usize,
    /// Spacing between progress polls.
    pub poll_interval: Duration,
    /// Progress polls before giving up.
    pub max_poll_attempts: u32,
    pub max_image_bytes: u64,
    pub max_video_bytes: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            concurrency: 3,
            poll_interval: Duration::from_secs(1),
            max_poll_attempts: 30,
            max_image_bytes: 10 * MIB,
            max_video_bytes: 4 * 1024 * MIB,
        }
    }
}

/// Event emitted during an upload run.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// A file started its transfer.
    Started {
        name: String,
        class: MediaClass,
        size: u64,
    },
    /// Displayed progress of the current file changed.
    Progress { name: String, percent: u8 },
    /// A file is stored. `instant` when the service already had it.
    Completed { name: String, instant: bool },
    /// The run failed.
    Failed { error: String },
    /// The run was cancelled.
    Cancelled,
    /// A user-facing notice was queued.
    Notice(Notice),
    /// The run ended; progress displays should clear.
    Reset,
}

/// A file the run stored (or found already stored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub class: MediaClass,
    /// Service id, when the service reported one.
    pub file_id: Option<String>,
    pub instant: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: Vec<UploadedFile>,
    pub rejected: Vec<Rejection>,
}

impl UploadReport {
    /// Files actually transferred (not found by dedup).
    pub fn transferred(&self) -> usize {
        self.uploaded.iter().filter(|f| !f.instant).count()
    }
}
