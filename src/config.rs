//! Configuration management for lesson annotation sync

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SyncError};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sync: SyncConfig,
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Times a failed pull subscription is re-established per document
    pub pull_restarts: u32,
    /// Delay between pull restarts, in milliseconds
    pub pull_restart_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Where lesson PDFs are read from
    pub library_dir: PathBuf,
    /// Where local copies are written to
    pub cache_dir: PathBuf,
}

impl SyncConfig {
    pub fn pull_restart_delay(&self) -> Duration {
        Duration::from_millis(self.pull_restart_delay_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            pull_restarts: 3,
            pull_restart_delay_ms: 500,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sync: SyncConfig::default(),
            files: FilesConfig {
                library_dir: PathBuf::from("./library"),
                cache_dir: PathBuf::from("./cache/pdf"),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = SyncConfig::default();

        Ok(Config {
            sync: SyncConfig {
                pull_restarts: parse_var("LESSON_SYNC_PULL_RESTARTS", defaults.pull_restarts),
                pull_restart_delay_ms: parse_var(
                    "LESSON_SYNC_PULL_RESTART_DELAY_MS",
                    defaults.pull_restart_delay_ms,
                ),
            },
            files: FilesConfig {
                library_dir: env::var("LESSON_LIBRARY_DIR")
                    .map(PathBuf::from)
                    .map_err(|e| SyncError::Config(format!("LESSON_LIBRARY_DIR: {}", e)))?,
                cache_dir: env::var("LESSON_CACHE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./cache/pdf")),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
