//! Storage backend trait.
//!
//! `StorageBackend` is implemented by the CLI to bridge the upload logic to
//! the HTTP client. Arguments are owned so implementations can move them
//! into the returned future.

use std::future::Future;
use std::pin::Pin;

use beicun_protocol::{
    CheckUploadRequest, CheckUploadResponse, FileUploadResult, FileUploadStatus,
    InitUploadRequest,
};
use tokio_util::sync::CancellationToken;

use crate::error::UploadError;

/// One chunk of a chunked upload.
#[derive(Debug, Clone)]
pub struct ChunkPayload {
    pub file_id: String,
    /// Zero-based chunk index.
    pub index: u32,
    /// Total number of chunks in the session.
    pub total: u32,
    pub data: Vec<u8>,
}

/// One image of the single-request image path.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub folder_id: String,
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Abstract connection to the storage service.
pub trait StorageBackend: Send + Sync {
    /// Asks whether an identical file already exists.
    fn check_file(
        &self,
        req: CheckUploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CheckUploadResponse, UploadError>> + Send + '_>>;

    /// Registers a chunked upload session. Returns the service's `success` flag.
    fn init_upload(
        &self,
        req: InitUploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<bool, UploadError>> + Send + '_>>;

    /// Stores one chunk.
    fn upload_chunk(
        &self,
        chunk: ChunkPayload,
    ) -> Pin<Box<dyn Future<Output = Result<(), UploadError>> + Send + '_>>;

    /// Returns the server-side view of a session.
    fn upload_progress(
        &self,
        file_id: String,
    ) -> Pin<Box<dyn Future<Output = Result<FileUploadStatus, UploadError>> + Send + '_>>;

    /// Stores one image in a single request.
    fn upload_image(
        &self,
        image: ImagePayload,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FileUploadResult>, UploadError>> + Send + '_>>;

    /// Called once new files landed in `folder_id`, so cached listings and
    /// stats can be dropped.
    fn listings_changed(&self, _folder_id: &str) {}
}

/// Races `fut` against `cancel`; cancellation wins ties.
pub(crate) async fn with_cancel<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, UploadError>
where
    F: Future<Output = Result<T, UploadError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(UploadError::Cancelled),
        r = fut => r,
    }
}

pub(crate) fn check_cancelled(cancel: &CancellationToken) -> Result<(), UploadError> {
    if cancel.is_cancelled() {
        Err(UploadError::Cancelled)
    } else {
        Ok(())
    }
}
