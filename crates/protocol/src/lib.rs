//! Wire types for the Beicun storage service.
//!
//! Every response from the service is wrapped in an [`ApiResponse`]
//! envelope (`{ code, message, data, total }`) where `code == 0` means
//! success. Field names on the wire are camelCase except for the chunk
//! upload query string, which the service reads as snake_case.

pub mod constants;
pub mod envelope;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use envelope::{ApiResponse, Page, ProtocolError};
pub use messages::{
    CheckUploadRequest, CheckUploadResponse, ChunkQuery, CreateFolderRequest, FileUploadResult,
    FileUploadStatus, InitUploadRequest, InitUploadResponse, LoginRequest, MoveFileRequest,
    MoveFolderRequest, RefreshRequest, TokenResponse, UpdateFolderRequest,
};
pub use types::{FileQuery, Folder, FolderQuery, StorageFile, StorageStats, UploadStatus};
