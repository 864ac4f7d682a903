//! Single-request image path.

use beicun_transfer::{UploadCandidate, digest_file};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::backend::{ImagePayload, StorageBackend, check_cancelled, with_cancel};
use crate::dedup::{DedupDecision, check_duplicate};
use crate::error::UploadError;
use crate::types::{UploadEvent, UploadedFile};

/// Uploads `images` one after another, appending each stored file to `done`.
///
/// Files the service already holds are skipped and reported as instant.
/// The first service error stops the remaining images.
pub(crate) async fn upload_images(
    backend: &dyn StorageBackend,
    images: &[UploadCandidate],
    folder_id: &str,
    events_tx: &mpsc::UnboundedSender<UploadEvent>,
    cancel: &CancellationToken,
    done: &mut Vec<UploadedFile>,
) -> Result<(), UploadError> {
    for image in images {
        check_cancelled(cancel)?;

        let _ = events_tx.send(UploadEvent::Started {
            name: image.name.clone(),
            class: image.class,
            size: image.size,
        });

        let digest = digest_file(image.path.clone(), &image.name, image.size).await;
        let decision = check_duplicate(backend, image, folder_id, &digest, cancel).await?;

        let uploaded = match decision {
            DedupDecision::Exists { file_id, .. } => UploadedFile {
                name: image.name.clone(),
                class: image.class,
                file_id,
                instant: true,
            },
            DedupDecision::New { .. } => {
                let data = tokio::fs::read(&image.path).await?;
                let results = with_cancel(
                    cancel,
                    backend.upload_image(ImagePayload {
                        folder_id: folder_id.to_string(),
                        name: image.name.clone(),
                        content_type: image.content_type.to_string(),
                        data,
                    }),
                )
                .await?;

                if let Some(err) = results.iter().find_map(|r| r.error.as_deref()) {
                    return Err(UploadError::Service(format!("{}: {err}", image.name)));
                }
                info!(file = %image.name, "image uploaded");
                UploadedFile {
                    name: image.name.clone(),
                    class: image.class,
                    file_id: results.first().map(|r| r.id.clone()),
                    instant: false,
                }
            }
        };

        let _ = events_tx.send(UploadEvent::Progress {
            name: image.name.clone(),
            percent: 100,
        });
        let _ = events_tx.send(UploadEvent::Completed {
            name: image.name.clone(),
            instant: uploaded.instant,
        });
        done.push(uploaded);
    }

    Ok(())
}
