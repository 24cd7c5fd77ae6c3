//! Sync coordinator
//!
//! A [`ReadingSession`] owns every task working on behalf of one reading
//! session: the media check, the file download, one pull subscription per
//! document, and fire-and-forget pushes. All of them live in a single
//! `JoinSet`, so shutting the session down (or dropping it) aborts them.
//!
//! Change notifications go through an unbounded channel. A pull task never
//! waits on the consumer, so the annotation index keeps up with the store
//! even when nobody is reading notifications.

use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use super::traits::RemoteAnnotationStore;
use crate::annotations::{extract_page_annotations, normalize_pages, LiveDocument};
use crate::config::SyncConfig;
use crate::files::FileMaterializer;
use crate::media::{check_availability, MediaLookup};
use crate::session::{DocumentRef, DocumentSession, LessonDocument};

/// External services a session talks to
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn RemoteAnnotationStore>,
    pub media: Arc<dyn MediaLookup>,
    pub files: Arc<dyn FileMaterializer>,
}

impl Collaborators {
    pub fn new(
        store: Arc<dyn RemoteAnnotationStore>,
        media: Arc<dyn MediaLookup>,
        files: Arc<dyn FileMaterializer>,
    ) -> Self {
        Self {
            store,
            media,
            files,
        }
    }
}

/// One reading session and its sync tasks
pub struct ReadingSession {
    lesson_key: Option<String>,
    state: Arc<DocumentSession>,
    store: Arc<dyn RemoteAnnotationStore>,
    tasks: Mutex<JoinSet<()>>,
    runtime: Handle,
}

/// Receiving end of a session's change notifications
///
/// Each message is the position of a document whose annotations were just
/// replaced by a pull. The channel closes once every pull has finished.
pub type SessionUpdates = mpsc::UnboundedReceiver<usize>;

/// What a pull task needs, cloned per document
#[derive(Clone)]
struct PullContext {
    lesson_key: String,
    store: Arc<dyn RemoteAnnotationStore>,
    state: Arc<DocumentSession>,
    updates: mpsc::UnboundedSender<usize>,
    restarts: u32,
    restart_delay: std::time::Duration,
}

impl ReadingSession {
    /// Start a session for `documents`
    ///
    /// Kicks off the media check and one pull per document (only when a
    /// lesson key is present) and the download of local copies. Must be
    /// called from within a Tokio runtime; later saves reuse that runtime
    /// from any thread.
    pub fn start(
        collaborators: Collaborators,
        config: &SyncConfig,
        lesson_key: Option<&str>,
        documents: &[LessonDocument],
    ) -> (Self, SessionUpdates) {
        let lesson_key = lesson_key
            .filter(|key| !key.is_empty())
            .map(str::to_string);
        let state = Arc::new(DocumentSession::new(documents));
        let (tx, rx) = mpsc::unbounded_channel();
        let mut tasks = JoinSet::new();

        tracing::info!(
            lesson = lesson_key.as_deref().unwrap_or("<none>"),
            documents = documents.len(),
            "Starting reading session"
        );

        if let Some(key) = &lesson_key {
            let media = collaborators.media.clone();
            let media_state = state.clone();
            let media_key = key.clone();
            tasks.spawn(async move {
                let availability = check_availability(media.as_ref(), &media_key).await;
                tracing::debug!(
                    lesson = %media_key,
                    audio = availability.audio,
                    video = availability.video,
                    "Media availability resolved"
                );
                media_state.set_media_availability(availability);
            });

            let ctx = PullContext {
                lesson_key: key.clone(),
                store: collaborators.store.clone(),
                state: state.clone(),
                updates: tx,
                restarts: config.pull_restarts,
                restart_delay: config.pull_restart_delay(),
            };
            for document in state.documents() {
                tasks.spawn(follow_document(ctx.clone(), document.clone()));
            }
        }

        let files = collaborators.files.clone();
        let download_state = state.clone();
        tasks.spawn(async move {
            let local = match files.download(download_state.documents()).await {
                Ok(local) => local,
                Err(e) => {
                    tracing::warn!(error = %e, kind = e.kind(), "Document download failed");
                    Vec::new()
                }
            };
            tracing::debug!(files = local.len(), "Local copies ready");
            download_state.set_local_files(local);
        });

        let session = Self {
            lesson_key,
            state,
            store: collaborators.store,
            tasks: Mutex::new(tasks),
            runtime: Handle::current(),
        };
        (session, rx)
    }

    pub fn lesson_key(&self) -> Option<&str> {
        self.lesson_key.as_deref()
    }

    pub fn state(&self) -> &Arc<DocumentSession> {
        &self.state
    }

    /// Extract and push the annotations of the document at `position`
    ///
    /// A no-op when there is no lesson key or the position is unknown.
    /// The push runs in the background on the session's runtime; its
    /// outcome is only logged.
    pub fn save_annotations<D>(&self, position: usize, document: &D)
    where
        D: LiveDocument + ?Sized,
    {
        let Some(lesson_key) = self.lesson_key.clone() else {
            tracing::debug!(position, "No lesson key, skipping save");
            return;
        };
        let Some(target) = self.state.document(position) else {
            tracing::debug!(position, "Unknown document position, skipping save");
            return;
        };
        let document_id = target.id.clone();

        let pages = extract_page_annotations(document);
        self.state.replace_annotations(position, pages.clone());

        let store = self.store.clone();
        let push = async move {
            let page_count = pages.len();
            match store.push(&lesson_key, &document_id, pages).await {
                Ok(()) => tracing::debug!(
                    lesson = %lesson_key,
                    document_id = %document_id,
                    pages = page_count,
                    "Annotations pushed"
                ),
                Err(e) => tracing::warn!(
                    lesson = %lesson_key,
                    document_id = %document_id,
                    error = %e,
                    "Annotation push failed"
                ),
            }
        };

        let mut tasks = self.tasks.lock();
        // Reap finished tasks so the set only holds live work
        while tasks.try_join_next().is_some() {}
        tasks.spawn_on(push, &self.runtime);
    }

    /// Abort every session task and wait for them to wind down
    pub async fn shutdown(self) {
        let mut tasks = self.tasks.into_inner();
        tasks.shutdown().await;
        tracing::info!(
            lesson = self.lesson_key.as_deref().unwrap_or("<none>"),
            "Reading session closed"
        );
    }
}

/// Follow one document's pull subscription for the session's lifetime
async fn follow_document(ctx: PullContext, document: DocumentRef) {
    let mut attempts_left = ctx.restarts;

    loop {
        let ended_with_error = match ctx.store.pull(&ctx.lesson_key, &document.id).await {
            Ok(mut stream) => {
                let mut last_failed = false;
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(pages) => {
                            last_failed = false;
                            attempts_left = ctx.restarts;
                            ctx.state
                                .replace_annotations(document.position, normalize_pages(pages));
                            if ctx.updates.send(document.position).is_err() {
                                tracing::trace!(
                                    position = document.position,
                                    "Update receiver gone"
                                );
                            }
                        }
                        Err(e) => {
                            last_failed = true;
                            tracing::warn!(
                                lesson = %ctx.lesson_key,
                                document_id = %document.id,
                                error = %e,
                                "Annotation pull update failed"
                            );
                        }
                    }
                }
                last_failed
            }
            Err(e) => {
                tracing::warn!(
                    lesson = %ctx.lesson_key,
                    document_id = %document.id,
                    error = %e,
                    "Annotation pull subscription failed"
                );
                true
            }
        };

        if !ended_with_error {
            tracing::debug!(document_id = %document.id, "Annotation pull finished");
            return;
        }
        if attempts_left == 0 {
            tracing::warn!(
                lesson = %ctx.lesson_key,
                document_id = %document.id,
                "Giving up on annotation pull"
            );
            return;
        }
        attempts_left -= 1;
        tokio::time::sleep(ctx.restart_delay).await;
        tracing::debug!(document_id = %document.id, attempts_left, "Restarting annotation pull");
    }
}
