//! Lesson Sync
//!
//! Runs one reading session against a JSON session manifest and logs every
//! annotation update until interrupted.
//!
//! ```text
//! lesson-sync session.json
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lesson_annotation_sync::annotations::PageAnnotations;
use lesson_annotation_sync::files::DirectoryMaterializer;
use lesson_annotation_sync::media::{MediaRepository, StaticMediaCatalog};
use lesson_annotation_sync::session::LessonDocument;
use lesson_annotation_sync::sync::{Collaborators, InMemoryAnnotationStore, ReadingSession};
use lesson_annotation_sync::Config;

/// Session manifest read from disk
#[derive(Debug, Deserialize)]
struct SessionManifest {
    #[serde(rename = "lessonIndex")]
    lesson_index: Option<String>,
    documents: Vec<LessonDocument>,
    #[serde(default)]
    media: StaticMediaCatalog,
    /// Seed annotations keyed by document id
    #[serde(default)]
    annotations: HashMap<String, Vec<PageAnnotations>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG from it reaches the filter
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "lesson_annotation_sync=debug,lesson_sync=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    let manifest_path: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: lesson-sync <session.json>")?;
    let raw = tokio::fs::read_to_string(&manifest_path)
        .await
        .with_context(|| format!("reading {}", manifest_path.display()))?;
    let manifest: SessionManifest = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", manifest_path.display()))?;

    tracing::info!("Starting Lesson Sync v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Library: {}", config.files.library_dir.display());
    tracing::info!("Cache: {}", config.files.cache_dir.display());

    let store = InMemoryAnnotationStore::new();
    if let Some(lesson) = &manifest.lesson_index {
        for (document_id, pages) in manifest.annotations {
            store.seed(lesson, &document_id, pages);
        }
    }

    let collaborators = Collaborators::new(
        Arc::new(store),
        Arc::new(MediaRepository::new(manifest.media)),
        Arc::new(DirectoryMaterializer::new(
            &config.files.library_dir,
            &config.files.cache_dir,
        )),
    );

    let (session, mut updates) = ReadingSession::start(
        collaborators,
        &config.sync,
        manifest.lesson_index.as_deref(),
        &manifest.documents,
    );
    let mut media = session.state().watch_media();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(position) => {
                    let pages = session.state().current_annotations(position);
                    let total: usize = pages.iter().map(|p| p.annotations.len()).sum();
                    tracing::info!(position, pages = pages.len(), annotations = total, "Annotations updated");
                }
                None => {
                    tracing::info!("All annotation pulls finished");
                    (&mut shutdown).await;
                    break;
                }
            },
            Ok(()) = media.changed() => {
                let availability = *media.borrow_and_update();
                tracing::info!(audio = availability.audio, video = availability.video, "Media availability");
            },
            _ = &mut shutdown => break,
        }
    }

    session.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
