//! Validation of a file selection before any network call.

use std::fmt;
use std::path::PathBuf;

use beicun_transfer::{MediaClass, TransferError, UploadCandidate};
use tracing::debug;

use crate::types::UploadSettings;

const MIB: u64 = 1024 * 1024;

/// Why a selected file was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    UnsupportedType,
    ImageTooLarge { size: u64, limit: u64 },
    ExtraVideo,
    VideoTooLarge { size: u64, limit: u64 },
    Unreadable(String),
}

impl RejectReason {
    /// Short title for a notice.
    pub fn title(&self) -> &'static str {
        match self {
            Self::UnsupportedType => "Unsupported file type",
            Self::ImageTooLarge { .. } => "Image too large",
            Self::ExtraVideo => "Only one video per upload",
            Self::VideoTooLarge { .. } => "Video too large",
            Self::Unreadable(_) => "Cannot read file",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType => f.write_str("not an image or video"),
            Self::ImageTooLarge { limit, .. } => write!(f, "images must not exceed {} MiB", limit / MIB),
            Self::ExtraVideo => f.write_str("skipped, a video is already selected"),
            Self::VideoTooLarge { limit, .. } => write!(f, "videos must not exceed {} MiB", limit / MIB),
            Self::Unreadable(e) => write!(f, "cannot read file: {e}"),
        }
    }
}

/// A skipped file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub path: PathBuf,
    pub name: String,
    pub reason: RejectReason,
}

/// Result of validating a selection: images, at most one video, and the
/// rejected rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub images: Vec<UploadCandidate>,
    pub video: Option<UploadCandidate>,
    pub rejected: Vec<Rejection>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.video.is_none()
    }
}

/// Classifies `paths` and applies the size and single-video rules.
///
/// Each rule skips only the offending file.
pub fn select_files(paths: &[PathBuf], settings: &UploadSettings) -> Selection {
    let mut selection = Selection::default();

    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let reject = |reason| Rejection {
            path: path.clone(),
            name: name.clone(),
            reason,
        };

        let candidate = match UploadCandidate::from_path(path) {
            Ok(c) => c,
            Err(TransferError::UnsupportedType(_)) => {
                selection.rejected.push(reject(RejectReason::UnsupportedType));
                continue;
            }
            Err(e) => {
                selection
                    .rejected
                    .push(reject(RejectReason::Unreadable(e.to_string())));
                continue;
            }
        };

        match candidate.class {
            MediaClass::Image => {
                if candidate.size > settings.max_image_bytes {
                    selection.rejected.push(reject(RejectReason::ImageTooLarge {
                        size: candidate.size,
                        limit: settings.max_image_bytes,
                    }));
                    continue;
                }
                selection.images.push(candidate);
            }
            MediaClass::Video => {
                if selection.video.is_some() {
                    selection.rejected.push(reject(RejectReason::ExtraVideo));
                    continue;
                }
                if candidate.size > settings.max_video_bytes {
                    selection.rejected.push(reject(RejectReason::VideoTooLarge {
                        size: candidate.size,
                        limit: settings.max_video_bytes,
                    }));
                    continue;
                }
                selection.video = Some(candidate);
            }
        }
    }

    debug!(
        images = selection.images.len(),
        video = selection.video.is_some(),
        rejected = selection.rejected.len(),
        "selection validated"
    );
    selection
}
