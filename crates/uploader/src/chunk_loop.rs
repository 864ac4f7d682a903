//! Bounded-concurrency chunk transfer.

use beicun_transfer::{ChunkPlan, ChunkReader, ChunkState, ChunkTracker};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::{ChunkPayload, StorageBackend, check_cancelled};
use crate::error::UploadError;
use crate::reporter::ProgressReporter;

/// Sends the chunks of one upload session in batches of `concurrency`.
pub(crate) struct ChunkLoop<'a> {
    pub backend: &'a dyn StorageBackend,
    pub reader: &'a ChunkReader,
    pub plan: &'a ChunkPlan,
    pub file_id: &'a str,
    pub concurrency: usize,
    pub cancel: &'a CancellationToken,
}

impl ChunkLoop<'_> {
    /// Uploads `indices` batch by batch.
    ///
    /// A batch runs to completion before the next one starts. The first
    /// chunk failure aborts its batch: siblings still in flight are dropped
    /// and marked failed, no further batch starts, and the failure is
    /// returned as [`UploadError::ChunkFailed`]. Cancellation drops whatever
    /// is in flight the same way.
    pub async fn upload_batches(
        &self,
        indices: &[u32],
        tracker: &mut ChunkTracker,
        reporter: &mut ProgressReporter<'_>,
    ) -> Result<(), UploadError> {
        let total = self.plan.chunk_count();

        for batch in indices.chunks(self.concurrency.max(1)) {
            check_cancelled(self.cancel)?;
            debug!(file_id = self.file_id, chunks = ?batch, "uploading batch");

            for &i in batch {
                tracker.mark_in_flight(i);
            }

            let mut pending: FuturesUnordered<_> =
                batch.iter().map(|&i| self.upload_one(i)).collect();

            let outcome = loop {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break Err(UploadError::Cancelled),
                    next = pending.next() => match next {
                        None => break Ok(()),
                        Some((i, Ok(()))) => {
                            tracker.mark_succeeded(i);
                            reporter.local(tracker.succeeded(), total);
                        }
                        Some((i, Err(e))) => {
                            warn!(file_id = self.file_id, chunk = i, error = %e, "chunk upload failed");
                            tracker.mark_failed(i);
                            break Err(e);
                        }
                    },
                }
            };
            drop(pending);

            for &i in batch {
                if tracker.state(i) == Some(ChunkState::InFlight) {
                    tracker.mark_failed(i);
                }
            }

            outcome?;
        }
        Ok(())
    }

    async fn upload_one(&self, index: u32) -> (u32, Result<(), UploadError>) {
        let result = async {
            let range = self.plan.range(index)?;
            let data = self.reader.read_chunk(range).await?;
            self.backend
                .upload_chunk(ChunkPayload {
                    file_id: self.file_id.to_string(),
                    index,
                    total: self.plan.chunk_count(),
                    data,
                })
                .await
                .map_err(|e| match e {
                    UploadError::Cancelled => e,
                    other => UploadError::ChunkFailed {
                        index,
                        reason: other.to_string(),
                    },
                })
        }
        .await;
        (index, result)
    }
}
