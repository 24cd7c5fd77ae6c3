//! Lesson index parsing
//!
//! A lesson index looks like `en-2021-03-09`: language, year, quarter,
//! lesson. Anything after the quarter belongs to the lesson id.

use std::fmt;

use crate::error::{Result, SyncError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonIndex {
    raw: String,
    language: String,
    quarterly: String,
    lesson: String,
}

impl LessonIndex {
    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw.split('-').collect();
        if segments.len() < 4 || segments.iter().any(|s| s.is_empty()) {
            return Err(SyncError::InvalidLessonIndex(raw.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            language: segments[0].to_string(),
            quarterly: format!("{}-{}", segments[1], segments[2]),
            lesson: segments[3..].join("-"),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Language code, e.g. `en`
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Quarterly id, e.g. `2021-03`
    pub fn quarterly(&self) -> &str {
        &self.quarterly
    }

    /// Lesson id within the quarterly, e.g. `09`
    pub fn lesson(&self) -> &str {
        &self.lesson
    }

    /// Whether a media target index belongs to this lesson
    ///
    /// Matches the index itself or any `<index>-<suffix>` below it.
    pub fn covers(&self, target_index: &str) -> bool {
        match target_index.strip_prefix(self.raw.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('-'),
            None => false,
        }
    }
}

impl fmt::Display for LessonIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lesson_index() {
        let index = LessonIndex::parse("en-2021-03-09").unwrap();
        assert_eq!(index.language(), "en");
        assert_eq!(index.quarterly(), "2021-03");
        assert_eq!(index.lesson(), "09");
        assert_eq!(index.to_string(), "en-2021-03-09");
    }

    #[test]
    fn test_parse_lesson_with_suffix() {
        let index = LessonIndex::parse("es-2023-02-cq-13").unwrap();
        assert_eq!(index.quarterly(), "2023-02");
        assert_eq!(index.lesson(), "cq-13");
    }

    #[test]
    fn test_invalid_lesson_index() {
        for raw in ["", "en", "en-2021-03", "en--03-09", "en-2021-03-"] {
            assert!(
                matches!(LessonIndex::parse(raw), Err(SyncError::InvalidLessonIndex(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_covers() {
        let index = LessonIndex::parse("en-2021-03-09").unwrap();
        assert!(index.covers("en-2021-03-09-01"));
        assert!(!index.covers("en-2021-04-03-01"));
        assert!(index.covers("en-2021-03-09"));
    }

    #[test]
    fn test_covers_stops_at_segment_boundary() {
        let index = LessonIndex::parse("en-2021-03-1").unwrap();
        assert!(index.covers("en-2021-03-1-02"));
        assert!(!index.covers("en-2021-03-10"));
        assert!(!index.covers("en-2021-03-10-01"));
    }
}
