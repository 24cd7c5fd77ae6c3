//! Annotation types
//!
//! `PageAnnotations` is the record exchanged with the remote store. Its
//! serde shape (`pageIndex`, `annotations`) matches what the store persists.

use serde::{Deserialize, Serialize};

/// Serialized form of an annotation that carries no content
pub const NO_ANNOTATION: &str = "null";

/// All annotations on one page of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAnnotations {
    /// Page index (0-based)
    #[serde(rename = "pageIndex")]
    pub page_index: usize,
    /// Opaque annotation payloads, in page order
    pub annotations: Vec<String>,
}

impl PageAnnotations {
    pub fn new(page_index: usize, annotations: Vec<String>) -> Self {
        Self {
            page_index,
            annotations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

/// A single annotation object as held by the PDF renderer
pub trait RawAnnotation {
    /// Page this annotation lives on (0-based)
    fn page_index(&self) -> usize;

    /// Opaque textual form; [`NO_ANNOTATION`] for an empty annotation
    fn to_payload(&self) -> String;
}

/// A document currently open in the reader
pub trait LiveDocument {
    type Annotation: RawAnnotation;

    fn page_count(&self) -> usize;

    fn annotations_on_page(&self, page_index: usize) -> Vec<Self::Annotation>;
}
