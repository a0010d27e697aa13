//! Configuration module for motioncap-rs
//!
//! [`RecorderConfig`] holds the few knobs the pipeline has: where session
//! files live, their extension, the display tick rate and the buffer
//! pre-allocation. It is stored as JSON.
//!
//! # Storage Location
//!
//! Unless `storage_dir` is set, session files are kept in the
//! platform-appropriate data directory under `dev.motioncap.motioncap-rs`:
//!
//! - **Linux**: `~/.local/share/dev.motioncap.motioncap-rs/sessions/`
//! - **macOS**: `~/Library/Application Support/dev.motioncap.motioncap-rs/sessions/`
//! - **Windows**: `%APPDATA%\dev.motioncap.motioncap-rs\sessions\`
//!
//! When no data directory can be determined, the system temp directory is
//! used instead.
//!
//! # Example
//!
//! ```ignore
//! use motioncap_rs::config::RecorderConfig;
//!
//! let config = RecorderConfig::load_or_default("motioncap.json");
//! let recorder = MotionRecorder::from_config(&config)?;
//! ```

use crate::error::{RecorderError, Result};
use crate::session::DEFAULT_BUFFER_CAPACITY;
use crate::storage::SESSION_FILE_EXTENSION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for data directories
pub const APP_ID: &str = "dev.motioncap.motioncap-rs";

/// Subdirectory of the app data directory holding session files
pub const SESSIONS_DIR: &str = "sessions";

/// Default display refresh interval in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "info,motioncap_rs=debug";

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Version for future migration support
    #[serde(default = "default_config_version")]
    pub version: u32,

    /// Directory holding session files (platform data dir when unset)
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,

    /// Session file extension, without the dot
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Interval between elapsed-time display updates
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Samples pre-allocated for each new recording
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_config_version() -> u32 {
    1
}

fn default_file_extension() -> String {
    SESSION_FILE_EXTENSION.to_string()
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_buffer_capacity() -> usize {
    DEFAULT_BUFFER_CAPACITY
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            version: 1,
            storage_dir: None,
            file_extension: default_file_extension(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            log_filter: default_log_filter(),
        }
    }
}

impl RecorderConfig {
    /// Config with an explicit storage directory
    pub fn with_storage_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Directory session files are kept in
    pub fn resolved_storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            app_data_dir()
                .map(|p| p.join(SESSIONS_DIR))
                .unwrap_or_else(|| std::env::temp_dir().join(APP_ID))
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Check values that would make the pipeline misbehave
    pub fn validate(&self) -> Result<()> {
        let ext = self.file_extension.as_str();
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(RecorderError::Config(format!(
                "Invalid session file extension: {:?}",
                ext
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(RecorderError::Config(
                "Tick interval must be at least 1 ms".to_string(),
            ));
        }
        Ok(())
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RecorderError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            RecorderError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the config to disk as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RecorderError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| RecorderError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            RecorderError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }
}
