//! In-memory cache of listings and storage stats.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use beicun_protocol::{FileQuery, Folder, FolderQuery, Page, StorageFile, StorageStats};
use tracing::debug;

#[derive(Default)]
struct Entries {
    files: HashMap<FileQuery, Page<StorageFile>>,
    folders: HashMap<FolderQuery, Page<Folder>>,
    stats: Option<StorageStats>,
}

/// Read-through cache for file pages, folder pages and storage stats.
///
/// Entries live until invalidated; uploads and mutations invalidate what
/// they touch.
#[derive(Default)]
pub struct ListingCache {
    entries: Mutex<Entries>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn files(&self, query: &FileQuery) -> Option<Page<StorageFile>> {
        self.lock().files.get(query).cloned()
    }

    pub fn put_files(&self, query: FileQuery, page: Page<StorageFile>) {
        self.lock().files.insert(query, page);
    }

    pub fn folders(&self, query: &FolderQuery) -> Option<Page<Folder>> {
        self.lock().folders.get(query).cloned()
    }

    pub fn put_folders(&self, query: FolderQuery, page: Page<Folder>) {
        self.lock().folders.insert(query, page);
    }

    pub fn stats(&self) -> Option<StorageStats> {
        self.lock().stats.clone()
    }

    pub fn put_stats(&self, stats: StorageStats) {
        self.lock().stats = Some(stats);
    }

    /// Drops every cached file page of `folder_id`.
    pub fn invalidate_folder(&self, folder_id: &str) {
        let mut entries = self.lock();
        let before = entries.files.len();
        entries
            .files
            .retain(|q, _| q.folder_id.as_deref() != Some(folder_id));
        debug!(
            folder_id,
            dropped = before - entries.files.len(),
            "file listings invalidated"
        );
    }

    /// Drops every cached file page.
    pub fn invalidate_files(&self) {
        self.lock().files.clear();
    }

    /// Drops every cached folder page.
    pub fn invalidate_folders(&self) {
        self.lock().folders.clear();
    }

    pub fn invalidate_stats(&self) {
        self.lock().stats = None;
    }

    pub fn clear(&self) {
        *self.lock() = Entries::default();
    }
}
