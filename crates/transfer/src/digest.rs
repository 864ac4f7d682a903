use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use tracing::warn;

use crate::{HASH_READ_SIZE, TransferError};

/// Content fingerprint used as the dedup key of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentDigest {
    /// Hex-encoded MD5 of the whole file.
    Md5(String),
    /// `name-size-timestampMillis`, used when the file could not be hashed.
    /// Such a digest never matches an existing file.
    Synthetic(String),
}

impl ContentDigest {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Md5(s) | Self::Synthetic(s) => s,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes the MD5 of a file, reading it in [`HASH_READ_SIZE`] slices.
///
/// Blocking; call from the blocking pool.
pub fn md5_file(path: &Path) -> Result<String, TransferError> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; HASH_READ_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Builds the fallback identifier `name-size-timestampMillis`.
pub fn synthetic_id(name: &str, size: u64) -> String {
    format!("{name}-{size}-{}", chrono::Utc::now().timestamp_millis())
}

/// Hashes `path` on the blocking pool.
///
/// Never fails: an unreadable file degrades to a [`ContentDigest::Synthetic`]
/// identifier so the dedup check can still proceed.
pub async fn digest_file(path: PathBuf, name: &str, size: u64) -> ContentDigest {
    let result = tokio::task::spawn_blocking(move || md5_file(&path))
        .await
        .map_err(TransferError::from)
        .and_then(|r| r);

    match result {
        Ok(md5) => ContentDigest::Md5(md5),
        Err(e) => {
            warn!(file = name, error = %e, "MD5 failed, using synthetic identifier");
            ContentDigest::Synthetic(synthetic_id(name, size))
        }
    }
}
