//! Session token storage.
//!
//! The token pair lives in memory and, when a path is configured, is
//! mirrored to a JSON file readable only by the current user.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use beicun_protocol::TokenResponse;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ClientError;

/// Access/refresh token pair of a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: i64,
}

impl From<TokenResponse> for TokenPair {
    fn from(t: TokenResponse) -> Self {
        Self {
            access_token: t.access_token,
            refresh_token: t.refresh_token,
            expires_at: t.expires_at,
        }
    }
}

/// Holds the tokens used to authenticate requests.
///
/// Shared between the client and its callers behind an `Arc`; there is no
/// global session.
#[derive(Debug, Default)]
pub struct SessionContext {
    path: Option<PathBuf>,
    tokens: RwLock<Option<TokenPair>>,
}

impl SessionContext {
    /// Creates an in-memory session with no tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory session holding `tokens`.
    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            path: None,
            tokens: RwLock::new(Some(tokens)),
        }
    }

    /// Opens a persisted session, loading tokens from `path` if present.
    pub fn load(path: PathBuf) -> Result<Self, ClientError> {
        let tokens = load_tokens(&path)?;
        Ok(Self {
            path: Some(path),
            tokens: RwLock::new(tokens),
        })
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().as_ref().map(|t| t.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read()
            .as_ref()
            .map(|t| t.refresh_token.clone())
            .filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Replaces the stored tokens.
    pub fn set_tokens(&self, tokens: TokenPair) -> Result<(), ClientError> {
        *self.write() = Some(tokens);
        self.persist()
    }

    /// Forgets the stored tokens.
    pub fn clear(&self) -> Result<(), ClientError> {
        *self.write() = None;
        self.persist()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<TokenPair>> {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<TokenPair>> {
        self.tokens.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self) -> Result<(), ClientError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let tokens = self.read().clone();
        match tokens {
            Some(tokens) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let body = serde_json::to_string_pretty(&tokens)?;
                let mut options = std::fs::OpenOptions::new();
                options.write(true).create(true).truncate(true);
                #[cfg(unix)]
                {
                    use std::os::unix::fs::OpenOptionsExt;
                    options.mode(0o600);
                }
                let mut file = options.open(path)?;
                // mode() only applies on creation
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
                }
                file.write_all(body.as_bytes())?;
                debug!(path = %path.display(), "session saved");
            }
            None => {
                if path.exists() {
                    std::fs::remove_file(path)?;
                }
                debug!(path = %path.display(), "session cleared");
            }
        }
        Ok(())
    }
}

fn load_tokens(path: &Path) -> Result<Option<TokenPair>, ClientError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(path)?;
    let tokens: TokenPair = serde_json::from_str(&data)?;
    debug!(path = %path.display(), "session loaded");
    Ok(Some(tokens))
}

/// Returns the default session file path.
pub fn default_session_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("beicun").join("session.json"))
}

/// Returns the platform-specific config directory.
fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join(".config"))
    }
}
