//! Upload orchestrator.
//!
//! Drives one upload run: selection, images, then the chunked video path,
//! and turns the outcome into notices and events.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use beicun_protocol::InitUploadRequest;
use beicun_transfer::{ChunkReader, ChunkTracker, UploadCandidate, digest_file};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::backend::{StorageBackend, check_cancelled, with_cancel};
use crate::chunk_loop::ChunkLoop;
use crate::dedup::{DedupDecision, check_duplicate};
use crate::error::UploadError;
use crate::image::upload_images;
use crate::notice::{Notice, NoticeKind, NoticeQueue};
use crate::poller::wait_for_merge;
use crate::reporter::ProgressReporter;
use crate::selection::{Selection, select_files};
use crate::types::{UploadEvent, UploadReport, UploadSettings, UploadedFile};

/// Runs uploads to the storage service.
///
/// The cancellation token is shared by every run of this orchestrator; once
/// cancelled, create a new one.
pub struct UploadOrchestrator {
    settings: UploadSettings,
    events_tx: mpsc::UnboundedSender<UploadEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<UploadEvent>>,
    cancel: CancellationToken,
    notices: Mutex<NoticeQueue>,
}

impl Default for UploadOrchestrator {
    fn default() -> Self {
        Self::new(UploadSettings::default())
    }
}

impl UploadOrchestrator {
    pub fn new(settings: UploadSettings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            settings,
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
            notices: Mutex::new(NoticeQueue::new()),
        }
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// Returns the cancellation token for this orchestrator's runs.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Snapshot of the queued notices, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.lock_notices().iter().cloned().collect()
    }

    fn lock_notices(&self) -> std::sync::MutexGuard<'_, NoticeQueue> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, kind: NoticeKind, title: &str, message: Option<String>) {
        let notice = self.lock_notices().push(kind, title, message);
        let _ = self.events_tx.send(UploadEvent::Notice(notice));
    }

    /// Uploads `paths` into `folder_id`.
    ///
    /// Invalid files are skipped with a notice. Images go first, one request
    /// each; the video, if any, follows through the chunked path. The run
    /// always ends with [`UploadEvent::Reset`].
    pub async fn run(
        &self,
        backend: &dyn StorageBackend,
        folder_id: &str,
        paths: &[PathBuf],
    ) -> Result<UploadReport, UploadError> {
        if folder_id.trim().is_empty() {
            self.notify(
                NoticeKind::Error,
                "No folder selected",
                Some("Select a destination folder first".into()),
            );
            return Err(UploadError::Validation("no destination folder".into()));
        }

        let selection = select_files(paths, &self.settings);
        for rejected in &selection.rejected {
            warn!(file = %rejected.name, reason = %rejected.reason, "file skipped");
            self.notify(
                NoticeKind::Error,
                rejected.reason.title(),
                Some(format!("{}: {}", rejected.name, rejected.reason)),
            );
        }

        if selection.is_empty() {
            let _ = self.events_tx.send(UploadEvent::Reset);
            return Ok(UploadReport {
                uploaded: Vec::new(),
                rejected: selection.rejected,
            });
        }

        let mut uploaded = Vec::new();
        let result = self
            .transfer(backend, folder_id, &selection, &mut uploaded)
            .await;
        let _ = self.events_tx.send(UploadEvent::Reset);

        for file in uploaded.iter().filter(|f| f.instant) {
            self.notify(
                NoticeKind::Success,
                "File already exists",
                Some(format!("Instant upload complete: {}", file.name)),
            );
        }

        match result {
            Ok(()) => {
                info!(folder_id, files = uploaded.len(), "upload run finished");
                self.notify(
                    NoticeKind::Success,
                    "Upload complete",
                    Some("All files uploaded".into()),
                );
                Ok(UploadReport {
                    uploaded,
                    rejected: selection.rejected,
                })
            }
            Err(UploadError::Cancelled) => {
                info!(folder_id, "upload cancelled");
                self.notify(
                    NoticeKind::Info,
                    "Upload cancelled",
                    Some("The upload was stopped".into()),
                );
                let _ = self.events_tx.send(UploadEvent::Cancelled);
                Err(UploadError::Cancelled)
            }
            Err(e) => {
                let message = e.to_string();
                error!(folder_id, error = %message, "upload failed");
                self.notify(NoticeKind::Error, "Upload failed", Some(message.clone()));
                let _ = self.events_tx.send(UploadEvent::Failed { error: message });
                Err(e)
            }
        }
    }

    async fn transfer(
        &self,
        backend: &dyn StorageBackend,
        folder_id: &str,
        selection: &Selection,
        uploaded: &mut Vec<UploadedFile>,
    ) -> Result<(), UploadError> {
        let images = upload_images(
            backend,
            &selection.images,
            folder_id,
            &self.events_tx,
            &self.cancel,
            uploaded,
        )
        .await;
        // Stored images stay stored whatever happens to the rest of the run.
        if uploaded.iter().any(|f| !f.instant) {
            backend.listings_changed(folder_id);
        }
        images?;

        if let Some(video) = &selection.video {
            let file = self.upload_video(backend, video, folder_id).await?;
            if !file.instant {
                backend.listings_changed(folder_id);
            }
            uploaded.push(file);
        }
        Ok(())
    }

    async fn upload_video(
        &self,
        backend: &dyn StorageBackend,
        video: &UploadCandidate,
        folder_id: &str,
    ) -> Result<UploadedFile, UploadError> {
        check_cancelled(&self.cancel)?;
        let _ = self.events_tx.send(UploadEvent::Started {
            name: video.name.clone(),
            class: video.class,
            size: video.size,
        });

        let digest = digest_file(video.path.clone(), &video.name, video.size).await;
        check_cancelled(&self.cancel)?;

        let decision = check_duplicate(backend, video, folder_id, &digest, &self.cancel).await?;
        let file_id = match &decision {
            DedupDecision::Exists { file_id, .. } => {
                let _ = self.events_tx.send(UploadEvent::Progress {
                    name: video.name.clone(),
                    percent: 100,
                });
                let _ = self.events_tx.send(UploadEvent::Completed {
                    name: video.name.clone(),
                    instant: true,
                });
                return Ok(UploadedFile {
                    name: video.name.clone(),
                    class: video.class,
                    file_id: file_id.clone(),
                    instant: true,
                });
            }
            DedupDecision::New { file_id, .. } => file_id.clone(),
        };
        let plan = decision.plan(video.size)?;

        let init = InitUploadRequest::new(
            &file_id,
            &video.name,
            video.size,
            folder_id,
            digest.as_str(),
            plan.chunk_count(),
        );
        if !with_cancel(&self.cancel, backend.init_upload(init)).await? {
            return Err(UploadError::Service(
                "the service refused to open the upload session".into(),
            ));
        }
        info!(
            file = %video.name,
            file_id = %file_id,
            chunks = plan.chunk_count(),
            "upload session opened"
        );

        let reader = ChunkReader::new(video.path.clone());
        let mut tracker = ChunkTracker::new(plan.chunk_count());
        let mut reporter = ProgressReporter::new(&self.events_tx, video.name.clone());
        let chunks = ChunkLoop {
            backend,
            reader: &reader,
            plan: &plan,
            file_id: &file_id,
            concurrency: self.settings.concurrency,
            cancel: &self.cancel,
        };

        let all: Vec<u32> = (0..plan.chunk_count()).collect();
        match chunks.upload_batches(&all, &mut tracker, &mut reporter).await {
            Ok(()) => {}
            Err(UploadError::ChunkFailed { index, reason }) => {
                warn!(chunk = index, %reason, "chunk failed, leaving it to the merge check");
            }
            Err(e) => return Err(e),
        }

        wait_for_merge(
            &chunks,
            &mut tracker,
            &mut reporter,
            self.settings.poll_interval,
            self.settings.max_poll_attempts,
        )
        .await?;

        let _ = self.events_tx.send(UploadEvent::Completed {
            name: video.name.clone(),
            instant: false,
        });
        Ok(UploadedFile {
            name: video.name.clone(),
            class: video.class,
            file_id: Some(file_id),
            instant: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBackend, ProgressStep, sized_file, status};
    use beicun_protocol::{CheckUploadResponse, UploadStatus};
    use beicun_transfer::MediaClass;
    use std::time::Duration;
    use tempfile::TempDir;

    const MIB: u64 = 1024 * 1024;

    fn drain(rx: &mut mpsc::UnboundedReceiver<UploadEvent>) -> Vec<UploadEvent> {
        let mut events = Vec::new();
        while let Ok(e) = rx.try_recv() {
            events.push(e);
        }
        events
    }

    fn progress_of(events: &[UploadEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                UploadEvent::Progress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect()
    }

    fn has_notice(orch: &UploadOrchestrator, kind: NoticeKind, title: &str) -> bool {
        orch.notices()
            .iter()
            .any(|n| n.kind == kind && n.title == title)
    }

    #[tokio::test(start_paused = true)]
    async fn video_is_chunked_and_merged() {
        let dir = TempDir::new().unwrap();
        let video = sized_file(dir.path(), "clip.mp4", 12 * MIB);
        let backend = MockBackend::new();
        let mut orch = UploadOrchestrator::default();
        let mut rx = orch.take_events().unwrap();

        let report = orch.run(&backend, "folder-1", &[video]).await.unwrap();

        let mut calls = backend.chunk_calls();
        calls.sort();
        assert_eq!(calls, vec![0, 1, 2]);
        assert_eq!(backend.chunk_sizes()[&2], (2 * MIB) as usize);

        let inits = backend.init_calls();
        assert_eq!(inits.len(), 1);
        assert_eq!(inits[0].chunks, vec![0, 0, 0]);
        assert_eq!(inits[0].status, UploadStatus::Uploading);
        assert_eq!(inits[0].folder_id, "folder-1");
        assert!(backend.progress_calls() <= 30);

        assert_eq!(report.uploaded.len(), 1);
        assert_eq!(report.transferred(), 1);
        assert_eq!(report.uploaded[0].file_id.as_deref(), Some("f1"));
        assert_eq!(backend.invalidations(), vec!["folder-1".to_string()]);
        assert!(has_notice(&orch, NoticeKind::Success, "Upload complete"));

        let events = drain(&mut rx);
        let progress = progress_of(&events);
        assert_eq!(progress.last(), Some(&100));
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert!(progress[..progress.len() - 1].iter().all(|p| *p <= 99));
        assert!(events.contains(&UploadEvent::Completed {
            name: "clip.mp4".into(),
            instant: false
        }));
        assert_eq!(events.last(), Some(&UploadEvent::Notice(orch.notices().last().unwrap().clone())));
        assert!(events.contains(&UploadEvent::Reset));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrency_never_exceeds_three() {
        let dir = TempDir::new().unwrap();
        let video = sized_file(dir.path(), "clip.mp4", 7);
        let backend = MockBackend::new()
            .with_chunk_size(1)
            .with_chunk_delay(Duration::from_millis(50));
        let orch = UploadOrchestrator::default();

        orch.run(&backend, "folder-1", &[video]).await.unwrap();

        assert!(backend.max_in_flight() <= 3);
        assert_eq!(backend.chunk_calls().len(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn existing_video_is_instant() {
        let dir = TempDir::new().unwrap();
        let video = sized_file(dir.path(), "clip.mp4", 12 * MIB);
        let backend = MockBackend::new().with_existing("clip.mp4");
        let orch = UploadOrchestrator::default();

        let report = orch.run(&backend, "folder-1", &[video]).await.unwrap();

        assert!(backend.init_calls().is_empty());
        assert!(backend.chunk_calls().is_empty());
        assert_eq!(backend.progress_calls(), 0);
        assert!(report.uploaded[0].instant);
        assert_eq!(report.transferred(), 0);
        assert!(backend.invalidations().is_empty());

        let notices = orch.notices();
        assert!(notices.iter().any(|n| n.kind == NoticeKind::Success
            && n.message.as_deref().is_some_and(|m| m.contains("Instant upload"))));
    }

    #[tokio::test(start_paused = true)]
    async fn images_upload_one_by_one() {
        let dir = TempDir::new().unwrap();
        let a = sized_file(dir.path(), "a.png", 100);
        let b = sized_file(dir.path(), "b.jpg", 200);
        let backend = MockBackend::new().with_existing("b.jpg");
        let orch = UploadOrchestrator::default();

        let report = orch.run(&backend, "folder-1", &[a, b]).await.unwrap();

        assert_eq!(backend.check_calls().len(), 2);
        assert_eq!(backend.image_calls(), vec!["a.png".to_string()]);
        assert!(backend.chunk_calls().is_empty());
        assert_eq!(report.uploaded.len(), 2);
        assert_eq!(report.uploaded[0].class, MediaClass::Image);
        assert_eq!(report.uploaded[0].file_id.as_deref(), Some("img-a.png"));
        assert!(report.uploaded[1].instant);
        assert_eq!(backend.invalidations(), vec!["folder-1".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn image_error_stops_remaining_images() {
        let dir = TempDir::new().unwrap();
        let a = sized_file(dir.path(), "a.png", 100);
        let b = sized_file(dir.path(), "b.png", 100);
        let backend = MockBackend::new().with_image_error("a.png", "quota exceeded");
        let orch = UploadOrchestrator::default();

        let err = orch.run(&backend, "folder-1", &[a, b]).await.unwrap_err();

        assert!(matches!(err, UploadError::Service(ref m) if m.contains("quota exceeded")));
        assert_eq!(backend.image_calls(), vec!["a.png".to_string()]);
        assert!(has_notice(&orch, NoticeKind::Error, "Upload failed"));
        assert!(!has_notice(&orch, NoticeKind::Success, "Upload complete"));
    }

    #[tokio::test(start_paused = true)]
    async fn server_missing_chunk_is_resent() {
        let dir = TempDir::new().unwrap();
        let video = sized_file(dir.path(), "clip.mp4", 3);
        let backend = MockBackend::new()
            .with_chunk_size(1)
            .with_progress(vec![ProgressStep::Status(status(
                UploadStatus::Uploading,
                &[1, 0, 1],
            ))]);
        let orch = UploadOrchestrator::default();

        orch.run(&backend, "folder-1", &[video]).await.unwrap();

        let calls = backend.chunk_calls();
        let mut first = calls[..3].to_vec();
        first.sort();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(&calls[3..], &[1]);
        assert_eq!(backend.progress_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_chunk_failure_is_reconciled() {
        let dir = TempDir::new().unwrap();
        let video = sized_file(dir.path(), "clip.mp4", 3);
        let backend = MockBackend::new().with_chunk_size(1).fail_chunk_once(1);
        let orch = UploadOrchestrator::default();

        let report = orch.run(&backend, "folder-1", &[video]).await.unwrap();

        assert_eq!(report.transferred(), 1);
        assert_eq!(backend.completed_chunks(), 3);
        assert_eq!(backend.chunk_calls().iter().filter(|i| **i == 1).count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unsent_chunks_go_out_when_bitmap_is_empty() {
        let dir = TempDir::new().unwrap();
        let video = sized_file(dir.path(), "clip.mp4", 3);
        let backend = MockBackend::new()
            .with_chunk_size(1)
            .fail_chunk_once(1)
            .with_progress(vec![ProgressStep::Status(status(UploadStatus::Uploading, &[]))]);
        let orch = UploadOrchestrator::default();

        orch.run(&backend, "folder-1", &[video]).await.unwrap();

        assert_eq!(backend.completed_chunks(), 3);
        assert_eq!(backend.chunk_calls().iter().filter(|i| **i == 1).count(), 2);
        assert_eq!(backend.progress_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stored_images_refresh_listings_when_video_fails() {
        let dir = TempDir::new().unwrap();
        let image = sized_file(dir.path(), "a.png", 100);
        let video = sized_file(dir.path(), "clip.mp4", 3);
        let mut failed = status(UploadStatus::Failed, &[1, 1, 1]);
        failed.error_message = Some("merge failed".into());
        let backend = MockBackend::new()
            .with_chunk_size(1)
            .with_progress(vec![ProgressStep::Status(failed)]);
        let orch = UploadOrchestrator::default();

        let err = orch.run(&backend, "folder-1", &[image, video]).await.unwrap_err();

        assert!(matches!(err, UploadError::SessionFailed(_)));
        assert_eq!(backend.image_calls(), vec!["a.png".to_string()]);
        assert_eq!(backend.invalidations(), vec!["folder-1".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn merge_never_finishing_times_out() {
        let dir = TempDir::new().unwrap();
        let video = sized_file(dir.path(), "clip.mp4", 3);
        let backend = MockBackend::new()
            .with_chunk_size(1)
            .with_progress_fallback(ProgressStep::Status(status(
                UploadStatus::Merging,
                &[1, 1, 1],
            )));
        let orch = UploadOrchestrator::default();

        let started = tokio::time::Instant::now();
        let err = orch.run(&backend, "folder-1", &[video]).await.unwrap_err();

        assert!(matches!(err, UploadError::Timeout { attempts: 30 }));
        assert_eq!(backend.progress_calls(), 30);
        assert!(started.elapsed() <= Duration::from_secs(30));
        assert!(has_notice(&orch, NoticeKind::Error, "Upload failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_session_reports_service_message() {
        let dir = TempDir::new().unwrap();
        let video = sized_file(dir.path(), "clip.mp4", 3);
        let mut failed = status(UploadStatus::Failed, &[1, 1, 1]);
        failed.error_message = Some("merge failed".into());
        let backend = MockBackend::new()
            .with_chunk_size(1)
            .with_progress(vec![ProgressStep::Status(failed)]);
        let mut orch = UploadOrchestrator::default();
        let mut rx = orch.take_events().unwrap();

        let err = orch.run(&backend, "folder-1", &[video]).await.unwrap_err();

        assert!(matches!(err, UploadError::SessionFailed(ref m) if m == "merge failed"));
        let notice = orch
            .notices()
            .into_iter()
            .find(|n| n.kind == NoticeKind::Error)
            .unwrap();
        assert_eq!(notice.message.as_deref(), Some("merge failed"));
        assert!(drain(&mut rx).contains(&UploadEvent::Failed {
            error: "merge failed".into()
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_remaining_batches() {
        let dir = TempDir::new().unwrap();
        let video = sized_file(dir.path(), "clip.mp4", 9);
        let mut orch = UploadOrchestrator::default();
        let mut rx = orch.take_events().unwrap();
        let backend = MockBackend::new()
            .with_chunk_size(1)
            .cancel_on_chunk(3, orch.cancel_token());

        let err = orch.run(&backend, "folder-1", &[video]).await.unwrap_err();

        assert!(err.is_cancelled());
        assert!(backend.chunk_calls().iter().all(|i| *i < 6));
        assert_eq!(backend.progress_calls(), 0);
        assert!(backend.invalidations().is_empty());
        assert!(has_notice(&orch, NoticeKind::Info, "Upload cancelled"));
        assert!(!orch.notices().iter().any(|n| n.kind != NoticeKind::Info));

        let events = drain(&mut rx);
        assert!(events.contains(&UploadEvent::Cancelled));
        assert!(events.contains(&UploadEvent::Reset));
        assert!(!events.iter().any(|e| matches!(e, UploadEvent::Failed { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_image_makes_no_calls() {
        let dir = TempDir::new().unwrap();
        let image = sized_file(dir.path(), "big.png", 15 * MIB);
        let backend = MockBackend::new();
        let orch = UploadOrchestrator::default();

        let report = orch.run(&backend, "folder-1", &[image]).await.unwrap();

        assert!(report.uploaded.is_empty());
        assert_eq!(report.rejected.len(), 1);
        assert!(backend.check_calls().is_empty());
        assert!(backend.image_calls().is_empty());
        assert!(has_notice(&orch, NoticeKind::Error, "Image too large"));
        assert!(!has_notice(&orch, NoticeKind::Success, "Upload complete"));
    }

    #[tokio::test(start_paused = true)]
    async fn second_video_is_skipped() {
        let dir = TempDir::new().unwrap();
        let one = sized_file(dir.path(), "one.mp4", 3);
        let two = sized_file(dir.path(), "two.mp4", 3);
        let backend = MockBackend::new().with_chunk_size(1);
        let orch = UploadOrchestrator::default();

        let report = orch.run(&backend, "folder-1", &[one, two]).await.unwrap();

        assert_eq!(report.uploaded.len(), 1);
        assert_eq!(report.uploaded[0].name, "one.mp4");
        assert_eq!(report.rejected[0].name, "two.mp4");
        assert_eq!(backend.check_calls().len(), 1);
        assert!(has_notice(&orch, NoticeKind::Error, "Only one video per upload"));
    }

    #[tokio::test]
    async fn missing_folder_is_rejected() {
        let dir = TempDir::new().unwrap();
        let image = sized_file(dir.path(), "a.png", 10);
        let backend = MockBackend::new();
        let orch = UploadOrchestrator::default();

        let err = orch.run(&backend, "  ", &[image]).await.unwrap_err();

        assert!(matches!(err, UploadError::Validation(_)));
        assert!(backend.check_calls().is_empty());
        assert!(has_notice(&orch, NoticeKind::Error, "No folder selected"));
    }

    #[tokio::test(start_paused = true)]
    async fn chunk_count_mismatch_skips_init() {
        let dir = TempDir::new().unwrap();
        let video = sized_file(dir.path(), "clip.mp4", 12);
        let backend = MockBackend::new().with_check_response(CheckUploadResponse {
            exists: false,
            file_id: "f1".into(),
            chunk_size: 5,
            chunk_count: 2,
            status: "uploading".into(),
            url: None,
        });
        let orch = UploadOrchestrator::default();

        let err = orch.run(&backend, "folder-1", &[video]).await.unwrap_err();

        assert!(matches!(err, UploadError::Protocol(_)));
        assert!(backend.init_calls().is_empty());
        assert!(backend.chunk_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn refused_init_fails_run() {
        let dir = TempDir::new().unwrap();
        let video = sized_file(dir.path(), "clip.mp4", 3);
        let backend = MockBackend::new().with_chunk_size(1).with_init_success(false);
        let orch = UploadOrchestrator::default();

        let err = orch.run(&backend, "folder-1", &[video]).await.unwrap_err();

        assert!(matches!(err, UploadError::Service(_)));
        assert!(backend.chunk_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn check_carries_md5() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hello.png");
        std::fs::write(&path, b"hello world").unwrap();
        let backend = MockBackend::new();
        let orch = UploadOrchestrator::default();

        orch.run(&backend, "folder-1", &[path]).await.unwrap();

        let checks = backend.check_calls();
        assert_eq!(checks[0].md5, "5eb63bbbe01eeed093cb22bb8f5acdc3");
        assert_eq!(checks[0].size, 11);
        assert_eq!(checks[0].folder_id, "folder-1");
    }
}
