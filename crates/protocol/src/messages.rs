use serde::{Deserialize, Deserializer, Serialize};

use crate::types::UploadStatus;

// ---------------------------------------------------------------------------
// Upload workflow
// ---------------------------------------------------------------------------

/// Asks whether an identical file already exists in the target folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckUploadRequest {
    pub name: String,
    pub size: u64,
    pub folder_id: String,
    pub md5: String,
}

/// Answer to a [`CheckUploadRequest`].
///
/// When `exists` is false the remaining fields describe the upload session
/// the client must drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckUploadResponse {
    pub exists: bool,
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub chunk_size: u64,
    #[serde(default)]
    pub chunk_count: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Registers a new upload session with an all-zero chunk bitmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitUploadRequest {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub folder_id: String,
    pub md5: String,
    pub status: UploadStatus,
    pub chunks: Vec<u8>,
}

impl InitUploadRequest {
    /// Builds the request for a fresh session of `chunk_count` chunks.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        size: u64,
        folder_id: impl Into<String>,
        md5: impl Into<String>,
        chunk_count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
            folder_id: folder_id.into(),
            md5: md5.into(),
            status: UploadStatus::Uploading,
            chunks: vec![0; chunk_count as usize],
        }
    }
}

/// Answer to an [`InitUploadRequest`]. The service may also answer with a
/// `null` payload, which callers treat as success.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitUploadResponse {
    #[serde(default = "default_true")]
    pub success: bool,
}

fn default_true() -> bool {
    true
}

/// Query string of the chunk upload call.
///
/// The service binds these as snake_case form values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkQuery {
    pub file_id: String,
    pub chunk_num: u32,
    pub total: u32,
}

/// Server-side view of an upload session, returned by the progress call.
///
/// Different service versions disagree on field names (`id` vs `fileId`,
/// `chunkCount` vs `chunksCount`, `error` vs `errorMessage`); all are
/// accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadStatus {
    #[serde(alias = "id")]
    pub file_id: String,
    pub status: UploadStatus,
    #[serde(default, alias = "size")]
    pub total_size: u64,
    #[serde(default)]
    pub uploaded_size: u64,
    #[serde(default)]
    pub chunk_size: u64,
    #[serde(default, alias = "chunksCount")]
    pub chunk_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chunks: Vec<u8>,
    #[serde(default, alias = "error", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl FileUploadStatus {
    /// Number of chunks the service has stored.
    pub fn uploaded_chunks(&self) -> usize {
        self.chunks.iter().filter(|bit| **bit == 1).count()
    }

    /// Server-side completion in percent, derived from the bitmap.
    pub fn percent(&self) -> f64 {
        let total = if self.chunk_count > 0 {
            self.chunk_count as usize
        } else {
            self.chunks.len()
        };
        if total == 0 {
            return 0.0;
        }
        self.uploaded_chunks() as f64 / total as f64 * 100.0
    }
}

/// One entry of the batch image upload answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUploadResult {
    pub id: String,
    pub filename: String,
    pub size: u64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnstile_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair issued by login and refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Media library
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_folder_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFolderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_parent_id: Option<String>,
}

/// Go encodes a nil slice as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
