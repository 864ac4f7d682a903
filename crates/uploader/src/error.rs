//! Upload error types.

/// Errors produced by the upload workflow.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Rejected before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A single chunk could not be stored; reconcilable.
    #[error("chunk {index} failed: {reason}")]
    ChunkFailed { index: u32, reason: String },

    /// The service reported the session as `failed`.
    #[error("{0}")]
    SessionFailed(String),

    #[error("timed out waiting for file processing after {attempts} checks")]
    Timeout { attempts: u32 },

    #[error("cancelled")]
    Cancelled,

    /// Transport failure or non-zero envelope code from the service.
    #[error("storage service error: {0}")]
    Service(String),

    /// The service answered with something this client cannot use.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transfer error: {0}")]
    Transfer(#[from] beicun_transfer::TransferError),
}

impl UploadError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
