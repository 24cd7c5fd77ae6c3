//! Session state
//!
//! `DocumentSession` is shared between the coordinator's tasks and the
//! reader through an `Arc`. Annotation slots are keyed by document
//! position; each slot has one writer at a time (its pull task, or a save
//! for that position), so a plain `RwLock` over the table is enough.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::annotations::PageAnnotations;
use crate::files::LocalFile;
use crate::media::MediaAvailability;

/// Document descriptor supplied when a session starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDocument {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Source location; the last path segment names the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl LessonDocument {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            src: None,
        }
    }

    pub fn with_src(mut self, src: &str) -> Self {
        self.src = Some(src.to_string());
        self
    }
}

/// A document's place within the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub position: usize,
    pub id: String,
    pub title: String,
    pub src: Option<String>,
}

impl DocumentRef {
    pub fn new(position: usize, document: &LessonDocument) -> Self {
        Self {
            position,
            id: document.id.clone(),
            title: document.title.clone(),
            src: document.src.clone(),
        }
    }

    /// File name of the local copy
    ///
    /// The last segment of `src`, or `<id>.pdf` when that segment is not
    /// usable as a file name.
    pub fn file_name(&self) -> String {
        self.src
            .as_deref()
            .and_then(|src| src.rsplit('/').next())
            .filter(|name| is_path_component(name))
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}.pdf", self.id))
    }
}

/// Whether `name` can be joined onto a directory without leaving it
pub fn is_path_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(&['/', '\\'][..])
}

/// State of one reading session
pub struct DocumentSession {
    documents: Vec<DocumentRef>,
    annotations: RwLock<HashMap<usize, Vec<PageAnnotations>>>,
    local_files: watch::Sender<Vec<LocalFile>>,
    media: watch::Sender<MediaAvailability>,
}

impl DocumentSession {
    /// Fix the session's documents; positions follow input order
    pub fn new(documents: &[LessonDocument]) -> Self {
        let documents = documents
            .iter()
            .enumerate()
            .map(|(position, doc)| DocumentRef::new(position, doc))
            .collect();

        Self {
            documents,
            annotations: RwLock::new(HashMap::new()),
            local_files: watch::channel(Vec::new()).0,
            media: watch::channel(MediaAvailability::default()).0,
        }
    }

    pub fn documents(&self) -> &[DocumentRef] {
        &self.documents
    }

    pub fn document(&self, position: usize) -> Option<&DocumentRef> {
        self.documents.get(position)
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    /// Latest known annotations for a position; empty if none synced yet
    pub fn current_annotations(&self, position: usize) -> Vec<PageAnnotations> {
        self.annotations
            .read()
            .get(&position)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace a position's annotations wholesale
    pub(crate) fn replace_annotations(&self, position: usize, pages: Vec<PageAnnotations>) {
        self.annotations.write().insert(position, pages);
    }

    // ========================================================================
    // Local files
    // ========================================================================

    pub fn local_files(&self) -> Vec<LocalFile> {
        self.local_files.borrow().clone()
    }

    pub fn local_file(&self, position: usize) -> Option<LocalFile> {
        let document = self.documents.get(position)?;
        self.local_files
            .borrow()
            .iter()
            .find(|file| file.document_id == document.id)
            .cloned()
    }

    pub fn is_downloaded(&self, position: usize) -> bool {
        self.local_file(position).is_some()
    }

    pub fn watch_local_files(&self) -> watch::Receiver<Vec<LocalFile>> {
        self.local_files.subscribe()
    }

    pub(crate) fn set_local_files(&self, files: Vec<LocalFile>) {
        self.local_files.send_replace(files);
    }

    // ========================================================================
    // Media
    // ========================================================================

    pub fn media_availability(&self) -> MediaAvailability {
        *self.media.borrow()
    }

    pub fn watch_media(&self) -> watch::Receiver<MediaAvailability> {
        self.media.subscribe()
    }

    pub(crate) fn set_media_availability(&self, availability: MediaAvailability) {
        self.media.send_replace(availability);
    }
}
