use std::fmt;
use std::path::{Path, PathBuf};

use crate::TransferError;

/// Media family a file belongs to; decides which upload path it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaClass {
    Image,
    Video,
}

impl fmt::Display for MediaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => f.write_str("image"),
            Self::Video => f.write_str("video"),
        }
    }
}

/// Classifies a file by extension, returning its class and content type.
pub fn classify(path: &Path) -> Option<(MediaClass, &'static str)> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let found = match ext.as_str() {
        "png" => (MediaClass::Image, "image/png"),
        "jpg" | "jpeg" => (MediaClass::Image, "image/jpeg"),
        "webp" => (MediaClass::Image, "image/webp"),
        "gif" => (MediaClass::Image, "image/gif"),
        "bmp" => (MediaClass::Image, "image/bmp"),
        "svg" => (MediaClass::Image, "image/svg+xml"),
        "avif" => (MediaClass::Image, "image/avif"),
        "mp4" | "m4v" => (MediaClass::Video, "video/mp4"),
        "mov" => (MediaClass::Video, "video/quicktime"),
        "webm" => (MediaClass::Video, "video/webm"),
        "mkv" => (MediaClass::Video, "video/x-matroska"),
        "avi" => (MediaClass::Video, "video/x-msvideo"),
        _ => return None,
    };
    Some(found)
}

/// A selected file that passed classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub class: MediaClass,
    pub content_type: &'static str,
}

impl UploadCandidate {
    /// Classifies `path` and reads its size.
    pub fn from_path(path: &Path) -> Result<Self, TransferError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let (class, content_type) =
            classify(path).ok_or_else(|| TransferError::UnsupportedType(name.clone()))?;

        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(TransferError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: meta.len(),
            class,
            content_type,
        })
    }
}
