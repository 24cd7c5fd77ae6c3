//! Local copies of lesson documents
//!
//! A [`FileMaterializer`] turns session documents into files on disk.
//! Retrieval is best-effort: the result is the subset that succeeded.

mod materializer;

pub use materializer::{DirectoryMaterializer, FileMaterializer, LocalFile};
