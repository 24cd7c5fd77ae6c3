//! In-memory annotation store
//!
//! Replace-on-key storage with live subscriptions. Each key owns a watch
//! channel, so a subscriber sees the current value (if any) and then every
//! later replacement. Slow subscribers only see the newest value.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{future, stream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::watch;

use super::traits::{PullStream, RemoteAnnotationStore};
use crate::annotations::{normalize_pages, PageAnnotations};
use crate::error::{Result, SyncError};

type StoreKey = (String, String);
type Slot = Arc<watch::Sender<Option<Vec<PageAnnotations>>>>;

#[derive(Clone, Default)]
pub struct InMemoryAnnotationStore {
    inner: Arc<Mutex<HashMap<StoreKey, Slot>>>,
}

impl InMemoryAnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value for a key, if anything was pushed
    pub fn get(&self, lesson_key: &str, document_id: &str) -> Option<Vec<PageAnnotations>> {
        self.inner
            .lock()
            .get(&key(lesson_key, document_id))
            .and_then(|slot| slot.borrow().clone())
    }

    /// Store a value without going through the async API
    pub fn seed(&self, lesson_key: &str, document_id: &str, pages: Vec<PageAnnotations>) {
        let pages = normalize_pages(pages);
        self.slot(lesson_key, document_id).send_replace(Some(pages));
    }

    fn slot(&self, lesson_key: &str, document_id: &str) -> Slot {
        self.inner
            .lock()
            .entry(key(lesson_key, document_id))
            .or_insert_with(|| Arc::new(watch::channel(None).0))
            .clone()
    }
}

fn key(lesson_key: &str, document_id: &str) -> StoreKey {
    (lesson_key.to_string(), document_id.to_string())
}

#[async_trait]
impl RemoteAnnotationStore for InMemoryAnnotationStore {
    async fn pull(&self, lesson_key: &str, document_id: &str) -> Result<PullStream> {
        let mut rx = self.slot(lesson_key, document_id).subscribe();
        let current = rx.borrow_and_update().clone();

        let updates = stream::unfold(rx, |mut rx| async move {
            rx.changed().await.ok()?;
            let next = rx.borrow_and_update().clone();
            Some((next, rx))
        })
        .filter_map(|pages| future::ready(pages.map(Ok::<_, SyncError>)));

        Ok(stream::iter(current.map(Ok::<_, SyncError>))
            .chain(updates)
            .boxed())
    }

    async fn push(
        &self,
        lesson_key: &str,
        document_id: &str,
        pages: Vec<PageAnnotations>,
    ) -> Result<()> {
        tracing::debug!(
            lesson = %lesson_key,
            document_id = %document_id,
            pages = pages.len(),
            "Storing annotations"
        );
        self.seed(lesson_key, document_id, pages);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: usize, payloads: &[&str]) -> PageAnnotations {
        PageAnnotations::new(index, payloads.iter().map(|p| p.to_string()).collect())
    }

    #[tokio::test]
    async fn test_push_is_idempotent() {
        let store = InMemoryAnnotationStore::new();
        let pages = vec![page(0, &["a", "b"]), page(2, &["c"])];

        store.push("en-2021-03-09", "pdf-a", pages.clone()).await.unwrap();
        store.push("en-2021-03-09", "pdf-a", pages.clone()).await.unwrap();

        assert_eq!(store.get("en-2021-03-09", "pdf-a"), Some(pages));
        assert_eq!(store.get("en-2021-03-09", "pdf-b"), None);
    }

    #[tokio::test]
    async fn test_push_replaces_duplicate_pages() {
        let store = InMemoryAnnotationStore::new();

        store
            .push("lesson", "doc", vec![page(1, &["old"]), page(1, &["new"])])
            .await
            .unwrap();

        assert_eq!(store.get("lesson", "doc"), Some(vec![page(1, &["new"])]));
    }

    #[tokio::test]
    async fn test_pull_sees_current_then_updates() {
        let store = InMemoryAnnotationStore::new();
        store.seed("lesson", "doc", vec![page(0, &["first"])]);

        let mut pull = store.pull("lesson", "doc").await.unwrap();
        let first = pull.next().await.unwrap().unwrap();
        assert_eq!(first, vec![page(0, &["first"])]);

        store.push("lesson", "doc", vec![page(3, &["second"])]).await.unwrap();
        let second = pull.next().await.unwrap().unwrap();
        assert_eq!(second, vec![page(3, &["second"])]);
    }

    #[tokio::test]
    async fn test_pull_waits_for_first_push() {
        let store = InMemoryAnnotationStore::new();
        let mut pull = store.pull("lesson", "doc").await.unwrap();

        let writer = store.clone();
        tokio::spawn(async move {
            writer.push("lesson", "doc", vec![page(0, &["x"])]).await.unwrap();
        });

        let received = pull.next().await.unwrap().unwrap();
        assert_eq!(received, vec![page(0, &["x"])]);
    }
}
