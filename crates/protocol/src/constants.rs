//! Endpoint paths and well-known values of the storage service.
//!
//! Paths are relative to the API base URL (usually `https://host/api`).

/// Envelope `code` reported by the service on success.
pub const SUCCESS_CODE: i32 = 0;

// Upload workflow
pub const CHECK_UPLOAD_PATH: &str = "/files/upload/check";
pub const INIT_UPLOAD_PATH: &str = "/files/upload/init";
pub const UPLOAD_CHUNK_PATH: &str = "/files/upload/chunk";
pub const UPLOAD_PROGRESS_PATH: &str = "/files/upload/progress";
pub const UPLOAD_IMAGES_PATH: &str = "/files/upload/images";

// Media library
pub const FILES_PATH: &str = "/files";
pub const FOLDERS_PATH: &str = "/folders";
pub const STORAGE_STATS_PATH: &str = "/storage/stats";

// Authentication
pub const LOGIN_PATH: &str = "/auth/login";
pub const REFRESH_PATH: &str = "/auth/refresh";
pub const LOGOUT_PATH: &str = "/auth/logout";

/// Multipart field carrying a single chunk.
pub const CHUNK_FIELD: &str = "file";

/// Multipart field carrying each image of a batch image upload.
pub const IMAGES_FIELD: &str = "files";

/// Multipart field carrying the destination folder of a batch image upload.
pub const FOLDER_ID_FIELD: &str = "folder_id";

/// Builds the path of a single file resource.
pub fn file_path(id: &str) -> String {
    format!("{FILES_PATH}/{id}")
}

/// Builds the move endpoint of a single file resource.
pub fn file_move_path(id: &str) -> String {
    format!("{FILES_PATH}/{id}/move")
}

/// Builds the path of a single folder resource.
pub fn folder_path(id: &str) -> String {
    format!("{FOLDERS_PATH}/{id}")
}

/// Builds the move endpoint of a single folder resource.
pub fn folder_move_path(id: &str) -> String {
    format!("{FOLDERS_PATH}/{id}/move")
}
