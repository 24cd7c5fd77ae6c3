//! Media types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

/// One audio track or video clip of a quarterly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub src: String,
    /// Lesson (or day) this item belongs to, e.g. `en-2021-03-09-01`
    pub target_index: String,
}

/// Whether companion media exists for the open lesson
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAvailability {
    pub audio: bool,
    pub video: bool,
}

impl MediaAvailability {
    pub fn new(audio: bool, video: bool) -> Self {
        Self { audio, video }
    }

    pub fn any(&self) -> bool {
        self.audio || self.video
    }
}
