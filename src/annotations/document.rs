//! JSON-backed live document
//!
//! Annotations whose bodies are `serde_json::Value`s. A `null` body
//! serializes to the [`NO_ANNOTATION`](super::NO_ANNOTATION) sentinel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{LiveDocument, RawAnnotation};

/// One annotation with a JSON body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonAnnotation {
    #[serde(rename = "pageIndex")]
    pub page_index: usize,
    #[serde(default)]
    pub body: Value,
}

impl JsonAnnotation {
    pub fn new(page_index: usize, body: Value) -> Self {
        Self { page_index, body }
    }
}

impl RawAnnotation for JsonAnnotation {
    fn page_index(&self) -> usize {
        self.page_index
    }

    fn to_payload(&self) -> String {
        // Value's Display is its compact JSON encoding
        self.body.to_string()
    }
}

/// An in-memory document: one annotation list per page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pages: Vec<Vec<JsonAnnotation>>,
}

impl SnapshotDocument {
    pub fn new(pages: Vec<Vec<JsonAnnotation>>) -> Self {
        Self { pages }
    }

    /// Blank document with `page_count` empty pages
    pub fn blank(page_count: usize) -> Self {
        Self {
            pages: vec![Vec::new(); page_count],
        }
    }

    /// Add an annotation to the page it is anchored on
    ///
    /// Returns `false` if the page is out of range.
    pub fn annotate(&mut self, annotation: JsonAnnotation) -> bool {
        match self.pages.get_mut(annotation.page_index) {
            Some(page) => {
                page.push(annotation);
                true
            }
            None => false,
        }
    }
}

impl LiveDocument for SnapshotDocument {
    type Annotation = JsonAnnotation;

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn annotations_on_page(&self, page_index: usize) -> Vec<JsonAnnotation> {
        self.pages.get(page_index).cloned().unwrap_or_default()
    }
}
