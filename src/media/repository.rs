//! Media repository
//!
//! [`MediaCatalog`] is the remote source: it only knows quarterlies.
//! [`MediaRepository`] turns it into a per-lesson [`MediaLookup`].

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::lesson_index::LessonIndex;
use super::types::{MediaAvailability, MediaItem, MediaKind};
use crate::error::{Result, SyncError};

/// Quarterly-level media source
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// All audio of a quarterly
    async fn audio(&self, language: &str, quarterly: &str) -> Result<Vec<MediaItem>>;

    /// All video of a quarterly
    async fn video(&self, language: &str, quarterly: &str) -> Result<Vec<MediaItem>>;
}

/// Lesson-level media lookup
#[async_trait]
pub trait MediaLookup: Send + Sync {
    async fn audio_for(&self, lesson_key: &str) -> Result<Vec<MediaItem>>;

    async fn video_for(&self, lesson_key: &str) -> Result<Vec<MediaItem>>;
}

/// Query audio and video presence for a lesson
///
/// Both lookups run concurrently. An empty list and a failed lookup both
/// count as "not available"; failures are only logged.
pub async fn check_availability(lookup: &dyn MediaLookup, lesson_key: &str) -> MediaAvailability {
    let (audio, video) = tokio::join!(lookup.audio_for(lesson_key), lookup.video_for(lesson_key));

    MediaAvailability::new(
        is_available(MediaKind::Audio, lesson_key, audio),
        is_available(MediaKind::Video, lesson_key, video),
    )
}

fn is_available(kind: MediaKind, lesson_key: &str, result: Result<Vec<MediaItem>>) -> bool {
    match result {
        Ok(items) => !items.is_empty(),
        Err(e) => {
            tracing::debug!(
                lesson = %lesson_key,
                kind = ?kind,
                error = %e,
                "Media lookup failed, treating as unavailable"
            );
            false
        }
    }
}

/// Filters a quarterly catalog down to one lesson
pub struct MediaRepository<C> {
    catalog: C,
}

impl<C: MediaCatalog> MediaRepository<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    async fn lookup(&self, kind: MediaKind, lesson_key: &str) -> Result<Vec<MediaItem>> {
        let index = LessonIndex::parse(lesson_key)?;

        let items = match kind {
            MediaKind::Audio => self.catalog.audio(index.language(), index.quarterly()).await?,
            MediaKind::Video => self.catalog.video(index.language(), index.quarterly()).await?,
        };

        Ok(items
            .into_iter()
            .filter(|item| index.covers(&item.target_index))
            .collect())
    }
}

#[async_trait]
impl<C: MediaCatalog> MediaLookup for MediaRepository<C> {
    async fn audio_for(&self, lesson_key: &str) -> Result<Vec<MediaItem>> {
        self.lookup(MediaKind::Audio, lesson_key).await
    }

    async fn video_for(&self, lesson_key: &str) -> Result<Vec<MediaItem>> {
        self.lookup(MediaKind::Video, lesson_key).await
    }
}

/// In-memory catalog keyed by `<language>-<quarterly>`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticMediaCatalog {
    #[serde(default)]
    audio: HashMap<String, Vec<MediaItem>>,
    #[serde(default)]
    video: HashMap<String, Vec<MediaItem>>,
}

impl StaticMediaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_audio(mut self, language: &str, quarterly: &str, items: Vec<MediaItem>) -> Self {
        self.audio.insert(catalog_key(language, quarterly), items);
        self
    }

    pub fn with_video(mut self, language: &str, quarterly: &str, items: Vec<MediaItem>) -> Self {
        self.video.insert(catalog_key(language, quarterly), items);
        self
    }

    fn get(
        map: &HashMap<String, Vec<MediaItem>>,
        kind: MediaKind,
        language: &str,
        quarterly: &str,
    ) -> Result<Vec<MediaItem>> {
        map.get(&catalog_key(language, quarterly))
            .cloned()
            .ok_or_else(|| {
                SyncError::Media(format!("no {:?} for {}-{}", kind, language, quarterly))
            })
    }
}

fn catalog_key(language: &str, quarterly: &str) -> String {
    format!("{}-{}", language, quarterly)
}

#[async_trait]
impl MediaCatalog for StaticMediaCatalog {
    async fn audio(&self, language: &str, quarterly: &str) -> Result<Vec<MediaItem>> {
        Self::get(&self.audio, MediaKind::Audio, language, quarterly)
    }

    async fn video(&self, language: &str, quarterly: &str) -> Result<Vec<MediaItem>> {
        Self::get(&self.video, MediaKind::Video, language, quarterly)
    }
}
