//! Companion media lookup
//!
//! Audio and video for a lesson are published per quarterly. The
//! [`MediaRepository`] narrows a quarterly's list down to one lesson by
//! matching each item's target index against the lesson index, and
//! [`MediaAvailability`] condenses the result into two flags.

mod lesson_index;
mod repository;
mod types;

pub use lesson_index::LessonIndex;
pub use repository::{
    check_availability, MediaCatalog, MediaLookup, MediaRepository, StaticMediaCatalog,
};
pub use types::{MediaAvailability, MediaItem, MediaKind};
