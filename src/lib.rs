//! Lesson Annotation Sync
//!
//! Keeps the annotations of PDF lesson documents consistent between a
//! reading session and a remote store, and tracks what else the session
//! needs: local copies of the documents and companion media availability.
//!
//! # Modules
//!
//! - `annotations`: per-page annotation records and the extractor
//! - `session`: document set and per-document state of a reading session
//! - `sync`: the coordinator driving pulls, pushes and notifications
//! - `media`: lesson index parsing and media availability
//! - `files`: local document materialization

pub mod annotations;
pub mod config;
pub mod error;
pub mod files;
pub mod media;
pub mod session;
pub mod sync;

pub use config::{Config, SyncConfig};
pub use error::{Result, SyncError};
