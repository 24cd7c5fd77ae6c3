//! Remote store interface

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::annotations::PageAnnotations;
use crate::error::Result;

/// Stream of full annotation sets for one (lesson, document) key
///
/// An `Err` item is a failed update; the stream may keep going after it.
pub type PullStream = BoxStream<'static, Result<Vec<PageAnnotations>>>;

/// Remote annotation store
#[async_trait]
pub trait RemoteAnnotationStore: Send + Sync {
    /// Subscribe to the annotation sets stored for a document
    async fn pull(&self, lesson_key: &str, document_id: &str) -> Result<PullStream>;

    /// Replace the annotation set stored for a document
    async fn push(
        &self,
        lesson_key: &str,
        document_id: &str,
        pages: Vec<PageAnnotations>,
    ) -> Result<()>;
}
