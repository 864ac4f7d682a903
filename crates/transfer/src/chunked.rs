use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::{ChunkRange, TransferError};

/// Reads chunk windows of a file by byte range.
///
/// Each read opens the file independently, so any number of reads may run
/// concurrently on the blocking pool.
#[derive(Debug, Clone)]
pub struct ChunkReader {
    path: PathBuf,
}

impl ChunkReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the bytes of `range`. Blocking.
    pub fn read_range(&self, range: ChunkRange) -> Result<Vec<u8>, TransferError> {
        let mut file = std::fs::File::open(&self.path)?;
        file.seek(SeekFrom::Start(range.start))?;

        let expected = range.len();
        let mut buf = Vec::with_capacity(expected as usize);
        file.take(expected).read_to_end(&mut buf)?;

        if buf.len() as u64 != expected {
            return Err(TransferError::ShortRead {
                index: range.index,
                expected,
                actual: buf.len() as u64,
            });
        }
        Ok(buf)
    }

    /// Reads the bytes of `range` on the blocking pool.
    pub async fn read_chunk(&self, range: ChunkRange) -> Result<Vec<u8>, TransferError> {
        let reader = self.clone();
        tokio::task::spawn_blocking(move || reader.read_range(range)).await?
    }
}
