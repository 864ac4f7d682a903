use crate::{DEFAULT_CHUNK_SIZE, TransferError};

/// Byte window `[start, end)` of a single chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub index: u32,
    pub start: u64,
    pub end: u64,
}

impl ChunkRange {
    /// Length of the window in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Fixed-size partition of a file into chunk windows.
///
/// Windows are contiguous, never overlap and together cover `[0, size)`.
/// Only the last window may be shorter than `chunk_size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    file_size: u64,
    chunk_size: u64,
    count: u32,
}

impl ChunkPlan {
    /// Plans `file_size` bytes in windows of `chunk_size`.
    ///
    /// A `chunk_size` of 0 falls back to [`DEFAULT_CHUNK_SIZE`].
    pub fn new(file_size: u64, chunk_size: u64) -> Self {
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        Self {
            file_size,
            chunk_size,
            count: Self::expected_count(file_size, chunk_size),
        }
    }

    /// `ceil(file_size / chunk_size)`.
    pub fn expected_count(file_size: u64, chunk_size: u64) -> u32 {
        if chunk_size == 0 {
            return 0;
        }
        file_size.div_ceil(chunk_size) as u32
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn chunk_count(&self) -> u32 {
        self.count
    }

    /// Returns the window of chunk `index`.
    pub fn range(&self, index: u32) -> Result<ChunkRange, TransferError> {
        if index >= self.count {
            return Err(TransferError::ChunkOutOfRange {
                index,
                count: self.count,
            });
        }
        let start = index as u64 * self.chunk_size;
        let end = (start + self.chunk_size).min(self.file_size);
        Ok(ChunkRange { index, start, end })
    }

    /// Iterates every window in index order.
    pub fn ranges(&self) -> impl Iterator<Item = ChunkRange> + '_ {
        (0..self.count).map(move |index| {
            let start = index as u64 * self.chunk_size;
            ChunkRange {
                index,
                start,
                end: (start + self.chunk_size).min(self.file_size),
            }
        })
    }
}
