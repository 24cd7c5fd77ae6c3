//! Error types for lesson annotation sync
//!
//! Errors only surface at collaborator boundaries. The reading session
//! downgrades every one of them (see `sync::ReadingSession`) so callers
//! never see a failure from the session API itself.

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, SyncError>;

/// Crate error type
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid lesson index: {0:?}")]
    InvalidLessonIndex(String),

    #[error("Remote store error: {0}")]
    Store(String),

    #[error("Media lookup error: {0}")]
    Media(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Short machine-readable kind, used as a tracing field
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::InvalidLessonIndex(_) => "invalid_lesson_index",
            SyncError::Store(_) => "store",
            SyncError::Media(_) => "media",
            SyncError::Download(_) => "download",
            SyncError::Config(_) => "config",
            SyncError::Io(_) => "io",
            SyncError::Json(_) => "json",
        }
    }
}
