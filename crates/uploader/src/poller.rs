//! Merge-wait: polls the session until the service finishes assembling it.

use std::time::Duration;

use beicun_protocol::UploadStatus;
use beicun_transfer::ChunkTracker;
use tracing::{debug, info, warn};

use crate::backend::{check_cancelled, with_cancel};
use crate::chunk_loop::ChunkLoop;
use crate::error::UploadError;
use crate::reporter::ProgressReporter;

/// Message used when the service reports `failed` without one.
pub const DEFAULT_FAILURE_MESSAGE: &str = "file processing failed";

/// Polls the session of `chunks.file_id` at most `max_attempts` times,
/// `interval` apart.
///
/// While the session is `uploading`, chunks the service reports missing are
/// sent again. Poll errors count as attempts.
pub(crate) async fn wait_for_merge(
    chunks: &ChunkLoop<'_>,
    tracker: &mut ChunkTracker,
    reporter: &mut ProgressReporter<'_>,
    interval: Duration,
    max_attempts: u32,
) -> Result<(), UploadError> {
    let total = chunks.plan.chunk_count();

    for attempt in 1..=max_attempts {
        check_cancelled(chunks.cancel)?;

        match with_cancel(
            chunks.cancel,
            chunks.backend.upload_progress(chunks.file_id.to_string()),
        )
        .await
        {
            Err(UploadError::Cancelled) => return Err(UploadError::Cancelled),
            Err(e) => {
                warn!(file_id = chunks.file_id, attempt, error = %e, "progress check failed");
            }
            Ok(status) => {
                debug!(
                    file_id = chunks.file_id,
                    attempt,
                    status = ?status.status,
                    stored = status.uploaded_chunks(),
                    "session status"
                );
                match status.status {
                    UploadStatus::Completed => {
                        info!(file_id = chunks.file_id, attempt, "file merged");
                        reporter.complete();
                        return Ok(());
                    }
                    UploadStatus::Failed => {
                        let message = status
                            .error_message
                            .filter(|m| !m.is_empty())
                            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
                        return Err(UploadError::SessionFailed(message));
                    }
                    UploadStatus::Uploading => {
                        let resubmit = tracker.reconcile(&status.chunks);
                        if !resubmit.is_empty() {
                            info!(
                                file_id = chunks.file_id,
                                chunks = ?resubmit,
                                "re-uploading chunks missing on the service"
                            );
                            match chunks.upload_batches(&resubmit, tracker, reporter).await {
                                Ok(()) => {}
                                Err(UploadError::ChunkFailed { index, reason }) => {
                                    warn!(chunk = index, %reason, "re-upload failed, retrying next check");
                                }
                                Err(e) => return Err(e),
                            }
                        }
                        reporter.server(status.percent(), tracker.succeeded(), total);
                    }
                    UploadStatus::Merging => {
                        reporter.server(status.percent(), tracker.succeeded(), total);
                    }
                    UploadStatus::Unknown => {
                        warn!(file_id = chunks.file_id, "unknown session status");
                    }
                }
            }
        }

        if attempt < max_attempts {
            tokio::select! {
                biased;
                _ = chunks.cancel.cancelled() => return Err(UploadError::Cancelled),
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    Err(UploadError::Timeout {
        attempts: max_attempts,
    })
}
