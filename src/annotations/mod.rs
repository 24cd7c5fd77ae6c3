//! Annotation module
//!
//! Normalized per-page annotation records and the extractor that builds
//! them from a live document handle.
//!
//! # Model
//!
//! - [`PageAnnotations`]: every serialized annotation on one page
//! - [`RawAnnotation`] / [`LiveDocument`]: the handle owned by the PDF
//!   renderer, only ever read here
//! - [`JsonAnnotation`] / [`SnapshotDocument`]: a JSON-backed handle
//!
//! Payloads are opaque strings. The literal [`NO_ANNOTATION`] payload is
//! dropped before anything is stored or pushed.

mod document;
mod extractor;
mod types;

pub use document::{JsonAnnotation, SnapshotDocument};
pub use extractor::{extract_page_annotations, normalize_pages};
pub use types::{LiveDocument, PageAnnotations, RawAnnotation, NO_ANNOTATION};
