//! HTTP client for the Beicun storage service.
//!
//! [`HttpStorageClient`] wraps `reqwest` with bearer authentication taken
//! from an explicit [`SessionContext`]. A request rejected with 401 triggers
//! one token refresh (shared by all concurrent callers) and is replayed
//! once with the new token.

mod cache;
mod client;
mod error;
mod session;

pub use cache::ListingCache;
pub use client::{HttpStorageClient, ImageUpload};
pub use error::ClientError;
pub use session::{SessionContext, TokenPair, default_session_path};
