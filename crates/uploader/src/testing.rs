//! In-memory storage backend for tests.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use beicun_protocol::{
    CheckUploadRequest, CheckUploadResponse, FileUploadResult, FileUploadStatus,
    InitUploadRequest, UploadStatus,
};
use beicun_transfer::{ChunkPlan, DEFAULT_CHUNK_SIZE};
use tokio_util::sync::CancellationToken;

use crate::backend::{ChunkPayload, ImagePayload, StorageBackend};
use crate::error::UploadError;

/// Creates `name` under `dir` with a sparse length of `size` bytes.
pub(crate) fn sized_file(dir: &Path, name: &str, size: u64) -> PathBuf {
    let path = dir.join(name);
    let f = std::fs::File::create(&path).unwrap();
    f.set_len(size).unwrap();
    path
}

pub(crate) fn status(status: UploadStatus, chunks: &[u8]) -> FileUploadStatus {
    FileUploadStatus {
        file_id: "f1".into(),
        status,
        total_size: 0,
        uploaded_size: 0,
        chunk_size: 0,
        chunk_count: chunks.len() as u32,
        chunks: chunks.to_vec(),
        error_message: None,
    }
}

/// One scripted answer of the progress call.
#[derive(Debug, Clone)]
pub(crate) enum ProgressStep {
    Status(FileUploadStatus),
    Error,
    /// Derived from the chunks stored so far: `completed` once all are in.
    Auto,
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(crate) struct MockBackend {
    chunk_size: u64,
    existing: HashSet<String>,
    check_override: Option<CheckUploadResponse>,
    init_success: bool,
    image_errors: HashMap<String, String>,
    chunk_delay: Duration,
    cancel_on_chunk: Option<(u32, CancellationToken)>,
    fail_once: Mutex<HashSet<u32>>,
    progress: Mutex<VecDeque<ProgressStep>>,
    progress_fallback: ProgressStep,

    checks: Mutex<Vec<CheckUploadRequest>>,
    inits: Mutex<Vec<InitUploadRequest>>,
    chunks: Mutex<Vec<u32>>,
    sizes: Mutex<BTreeMap<u32, usize>>,
    stored: Mutex<BTreeSet<u32>>,
    images: Mutex<Vec<String>>,
    invalidations: Mutex<Vec<String>>,
    progress_calls: AtomicU32,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockBackend {
    pub(crate) fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            existing: HashSet::new(),
            check_override: None,
            init_success: true,
            image_errors: HashMap::new(),
            chunk_delay: Duration::ZERO,
            cancel_on_chunk: None,
            fail_once: Mutex::new(HashSet::new()),
            progress: Mutex::new(VecDeque::new()),
            progress_fallback: ProgressStep::Auto,
            checks: Mutex::new(Vec::new()),
            inits: Mutex::new(Vec::new()),
            chunks: Mutex::new(Vec::new()),
            sizes: Mutex::new(BTreeMap::new()),
            stored: Mutex::new(BTreeSet::new()),
            images: Mutex::new(Vec::new()),
            invalidations: Mutex::new(Vec::new()),
            progress_calls: AtomicU32::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_chunk_size(mut self, size: u64) -> Self {
        self.chunk_size = size;
        self
    }

    /// The dedup check reports `name` as already stored.
    pub(crate) fn with_existing(mut self, name: &str) -> Self {
        self.existing.insert(name.to_string());
        self
    }

    pub(crate) fn with_check_response(mut self, resp: CheckUploadResponse) -> Self {
        self.check_override = Some(resp);
        self
    }

    pub(crate) fn with_init_success(mut self, success: bool) -> Self {
        self.init_success = success;
        self
    }

    pub(crate) fn with_image_error(mut self, name: &str, error: &str) -> Self {
        self.image_errors.insert(name.to_string(), error.to_string());
        self
    }

    pub(crate) fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// Cancels `token` as soon as chunk `index` is requested.
    pub(crate) fn cancel_on_chunk(mut self, index: u32, token: CancellationToken) -> Self {
        self.cancel_on_chunk = Some((index, token));
        self
    }

    pub(crate) fn fail_chunk_once(self, index: u32) -> Self {
        self.fail_once.lock().unwrap().insert(index);
        self
    }

    pub(crate) fn with_progress(self, steps: Vec<ProgressStep>) -> Self {
        self.progress.lock().unwrap().extend(steps);
        self
    }

    pub(crate) fn with_progress_fallback(mut self, step: ProgressStep) -> Self {
        self.progress_fallback = step;
        self
    }

    pub(crate) fn check_calls(&self) -> Vec<CheckUploadRequest> {
        self.checks.lock().unwrap().clone()
    }

    pub(crate) fn init_calls(&self) -> Vec<InitUploadRequest> {
        self.inits.lock().unwrap().clone()
    }

    /// Chunk indices in request order, repeats included.
    pub(crate) fn chunk_calls(&self) -> Vec<u32> {
        self.chunks.lock().unwrap().clone()
    }

    pub(crate) fn chunk_sizes(&self) -> BTreeMap<u32, usize> {
        self.sizes.lock().unwrap().clone()
    }

    pub(crate) fn completed_chunks(&self) -> usize {
        self.stored.lock().unwrap().len()
    }

    pub(crate) fn image_calls(&self) -> Vec<String> {
        self.images.lock().unwrap().clone()
    }

    pub(crate) fn invalidations(&self) -> Vec<String> {
        self.invalidations.lock().unwrap().clone()
    }

    pub(crate) fn progress_calls(&self) -> u32 {
        self.progress_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn auto_status(&self) -> FileUploadStatus {
        let total = self
            .inits
            .lock()
            .unwrap()
            .last()
            .map(|r| r.chunks.len())
            .unwrap_or(0);
        let stored = self.stored.lock().unwrap();
        let bitmap: Vec<u8> = (0..total as u32)
            .map(|i| u8::from(stored.contains(&i)))
            .collect();
        let state = if bitmap.iter().all(|b| *b == 1) {
            UploadStatus::Completed
        } else {
            UploadStatus::Uploading
        };
        status(state, &bitmap)
    }
}

impl StorageBackend for MockBackend {
    fn check_file(
        &self,
        req: CheckUploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CheckUploadResponse, UploadError>> + Send + '_>> {
        Box::pin(async move {
            self.checks.lock().unwrap().push(req.clone());
            if let Some(resp) = &self.check_override {
                return Ok(resp.clone());
            }
            if self.existing.contains(&req.name) {
                return Ok(CheckUploadResponse {
                    exists: true,
                    file_id: format!("existing-{}", req.name),
                    chunk_size: 0,
                    chunk_count: 0,
                    status: "completed".into(),
                    url: Some(format!("https://cdn.example/{}", req.name)),
                });
            }
            Ok(CheckUploadResponse {
                exists: false,
                file_id: "f1".into(),
                chunk_size: self.chunk_size,
                chunk_count: ChunkPlan::expected_count(req.size, self.chunk_size),
                status: "uploading".into(),
                url: None,
            })
        })
    }

    fn init_upload(
        &self,
        req: InitUploadRequest,
    ) -> Pin<Box<dyn Future<Output = Result<bool, UploadError>> + Send + '_>> {
        Box::pin(async move {
            self.inits.lock().unwrap().push(req);
            Ok(self.init_success)
        })
    }

    fn upload_chunk(
        &self,
        chunk: ChunkPayload,
    ) -> Pin<Box<dyn Future<Output = Result<(), UploadError>> + Send + '_>> {
        Box::pin(async move {
            self.chunks.lock().unwrap().push(chunk.index);
            if let Some((index, token)) = &self.cancel_on_chunk {
                if *index == chunk.index {
                    token.cancel();
                }
            }

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            let _guard = InFlightGuard(&self.in_flight);

            if !self.chunk_delay.is_zero() {
                tokio::time::sleep(self.chunk_delay).await;
            }

            if self.fail_once.lock().unwrap().remove(&chunk.index) {
                return Err(UploadError::Service(format!(
                    "chunk {} rejected",
                    chunk.index
                )));
            }

            self.sizes
                .lock()
                .unwrap()
                .insert(chunk.index, chunk.data.len());
            self.stored.lock().unwrap().insert(chunk.index);
            Ok(())
        })
    }

    fn upload_progress(
        &self,
        _file_id: String,
    ) -> Pin<Box<dyn Future<Output = Result<FileUploadStatus, UploadError>> + Send + '_>> {
        Box::pin(async move {
            self.progress_calls.fetch_add(1, Ordering::SeqCst);
            let step = self
                .progress
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.progress_fallback.clone());
            match step {
                ProgressStep::Status(s) => Ok(s),
                ProgressStep::Error => Err(UploadError::Service("progress unavailable".into())),
                ProgressStep::Auto => Ok(self.auto_status()),
            }
        })
    }

    fn upload_image(
        &self,
        image: ImagePayload,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<FileUploadResult>, UploadError>> + Send + '_>>
    {
        Box::pin(async move {
            self.images.lock().unwrap().push(image.name.clone());
            Ok(vec![FileUploadResult {
                id: format!("img-{}", image.name),
                filename: image.name.clone(),
                size: image.data.len() as u64,
                url: format!("https://cdn.example/{}", image.name),
                error: self.image_errors.get(&image.name).cloned(),
            }])
        })
    }

    fn listings_changed(&self, folder_id: &str) {
        self.invalidations
            .lock()
            .unwrap()
            .push(folder_id.to_string());
    }
}
