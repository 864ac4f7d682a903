//! Pre-upload existence check.

use beicun_protocol::CheckUploadRequest;
use beicun_transfer::{ChunkPlan, ContentDigest, UploadCandidate};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::backend::{StorageBackend, with_cancel};
use crate::error::UploadError;

/// What the service said about a file before transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupDecision {
    /// Identical content is already stored; nothing to transfer.
    Exists { file_id: Option<String>, url: Option<String> },
    /// A new upload session was assigned.
    New {
        file_id: String,
        chunk_size: u64,
        chunk_count: u32,
    },
}

impl DedupDecision {
    /// Validates the session layout against `file_size` and returns the
    /// chunk plan.
    ///
    /// A zero chunk size falls back to the default. A chunk count that does
    /// not cover the file is a protocol error.
    pub fn plan(&self, file_size: u64) -> Result<ChunkPlan, UploadError> {
        let Self::New {
            chunk_size,
            chunk_count,
            ..
        } = self
        else {
            return Err(UploadError::Protocol(
                "no upload session for an existing file".into(),
            ));
        };

        let plan = ChunkPlan::new(file_size, *chunk_size);
        if plan.chunk_count() != *chunk_count {
            return Err(UploadError::Protocol(format!(
                "service declared {chunk_count} chunks, {} bytes in {} byte chunks need {}",
                file_size,
                plan.chunk_size(),
                plan.chunk_count()
            )));
        }
        Ok(plan)
    }
}

/// Asks the service whether `candidate` already exists in `folder_id`.
pub async fn check_duplicate(
    backend: &dyn StorageBackend,
    candidate: &UploadCandidate,
    folder_id: &str,
    digest: &ContentDigest,
    cancel: &CancellationToken,
) -> Result<DedupDecision, UploadError> {
    let req = CheckUploadRequest {
        name: candidate.name.clone(),
        size: candidate.size,
        folder_id: folder_id.to_string(),
        md5: digest.as_str().to_string(),
    };

    let resp = with_cancel(cancel, backend.check_file(req)).await?;

    if resp.exists {
        info!(file = %candidate.name, "identical file already stored");
        let file_id = Some(resp.file_id).filter(|id| !id.is_empty());
        return Ok(DedupDecision::Exists {
            file_id,
            url: resp.url,
        });
    }

    if resp.file_id.is_empty() {
        return Err(UploadError::Protocol("check response without fileId".into()));
    }

    debug!(
        file = %candidate.name,
        file_id = %resp.file_id,
        chunk_size = resp.chunk_size,
        chunk_count = resp.chunk_count,
        "upload session assigned"
    );
    Ok(DedupDecision::New {
        file_id: resp.file_id,
        chunk_size: resp.chunk_size,
        chunk_count: resp.chunk_count,
    })
}
