//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `$XDG_CONFIG_HOME/beicun/cli.toml` (or `~/.config/beicun/cli.toml`)
//! - Windows: `%APPDATA%/beicun/cli.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use beicun_uploader::UploadSettings;
use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the storage API, e.g. `https://beicun.example/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Where session tokens are kept. Empty means the default location.
    #[serde(default)]
    pub token_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_path: String::new(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_image_bytes: u64,
    pub max_video_bytes: u64,
    pub concurrency: usize,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 10 * MIB,
            max_video_bytes: 4 * 1024 * MIB,
            concurrency: 3,
            poll_interval_ms: 1000,
            max_poll_attempts: 30,
        }
    }
}

impl UploadConfig {
    pub fn settings(&self) -> UploadSettings {
        UploadSettings {
            concurrency: self.concurrency.max(1),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_poll_attempts: self.max_poll_attempts.max(1),
            max_image_bytes: self.max_image_bytes,
            max_video_bytes: self.max_video_bytes,
        }
    }
}

impl CliConfig {
    /// Loads configuration from `path` (or the default location), creating
    /// a default file if none exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: CliConfig = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            let config = CliConfig::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Token file configured by the user, if any.
    pub fn token_path(&self) -> Option<PathBuf> {
        let p = self.server.token_path.trim();
        (!p.is_empty()).then(|| PathBuf::from(p))
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA")?;
        Ok(PathBuf::from(appdata).join("beicun").join("cli.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let base = match std::env::var("XDG_CONFIG_HOME") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => PathBuf::from(std::env::var("HOME")?).join(".config"),
        };
        Ok(base.join("beicun").join("cli.toml"))
    }
}
