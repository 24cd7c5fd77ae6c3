//! Annotation extractor
//!
//! Walks a live document page by page and produces one [`PageAnnotations`]
//! per page that still has content after sentinel filtering. Output is
//! ordered by ascending page index.

use std::collections::BTreeMap;

use super::types::{LiveDocument, PageAnnotations, RawAnnotation, NO_ANNOTATION};

/// Extract normalized annotations from a live document
///
/// Annotations are grouped by their own page index, so an annotation
/// reported on one page but anchored to another lands with its anchor page.
/// Pages left with no payloads are omitted entirely.
pub fn extract_page_annotations<D>(document: &D) -> Vec<PageAnnotations>
where
    D: LiveDocument + ?Sized,
{
    let mut grouped: BTreeMap<usize, Vec<String>> = BTreeMap::new();

    for page in 0..document.page_count() {
        for annotation in document.annotations_on_page(page) {
            let payload = annotation.to_payload();
            let entry = grouped.entry(annotation.page_index()).or_default();
            if payload != NO_ANNOTATION {
                entry.push(payload);
            }
        }
    }

    grouped
        .into_iter()
        .filter(|(_, payloads)| !payloads.is_empty())
        .map(|(page_index, payloads)| PageAnnotations::new(page_index, payloads))
        .collect()
}

/// Normalize a page list into store form
///
/// Sentinel payloads are removed, empty pages dropped, and a page index
/// that appears more than once keeps only its last entry.
pub fn normalize_pages(pages: Vec<PageAnnotations>) -> Vec<PageAnnotations> {
    let mut by_page: BTreeMap<usize, Vec<String>> = BTreeMap::new();

    for page in pages {
        let payloads: Vec<String> = page
            .annotations
            .into_iter()
            .filter(|p| p != NO_ANNOTATION)
            .collect();
        by_page.insert(page.page_index, payloads);
    }

    by_page
        .into_iter()
        .filter(|(_, payloads)| !payloads.is_empty())
        .map(|(page_index, payloads)| PageAnnotations::new(page_index, payloads))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{JsonAnnotation, SnapshotDocument};
    use serde_json::{json, Value};

    fn highlight(page: usize, text: &str) -> JsonAnnotation {
        JsonAnnotation::new(page, json!({ "text": text }))
    }

    #[test]
    fn test_empty_document() {
        let doc = SnapshotDocument::new(vec![vec![], vec![], vec![]]);
        assert!(extract_page_annotations(&doc).is_empty());

        let no_pages = SnapshotDocument::new(vec![]);
        assert!(extract_page_annotations(&no_pages).is_empty());
    }

    #[test]
    fn test_three_page_example() {
        let doc = SnapshotDocument::new(vec![
            vec![
                highlight(0, "first"),
                JsonAnnotation::new(0, Value::Null),
                highlight(0, "second"),
            ],
            vec![],
            vec![highlight(2, "third")],
        ]);

        let pages = extract_page_annotations(&doc);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_index, 0);
        assert_eq!(pages[0].annotations.len(), 2);
        assert!(pages[0].annotations[0].contains("first"));
        assert!(pages[0].annotations[1].contains("second"));
        assert_eq!(pages[1].page_index, 2);
        assert_eq!(pages[1].annotations.len(), 1);
    }

    #[test]
    fn test_all_sentinel_page_is_omitted() {
        let doc = SnapshotDocument::new(vec![
            vec![JsonAnnotation::new(0, Value::Null), JsonAnnotation::new(0, Value::Null)],
            vec![highlight(1, "kept")],
        ]);

        let pages = extract_page_annotations(&doc);

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_index, 1);
        assert!(pages
            .iter()
            .flat_map(|p| p.annotations.iter())
            .all(|a| a != NO_ANNOTATION));
    }

    #[test]
    fn test_groups_by_annotation_page() {
        // Renderer reported it on page 0, but it is anchored to page 3
        let doc = SnapshotDocument::new(vec![
            vec![highlight(3, "moved"), highlight(0, "here")],
            vec![],
            vec![],
            vec![highlight(3, "native")],
        ]);

        let pages = extract_page_annotations(&doc);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_index, 0);
        assert_eq!(pages[1].page_index, 3);
        assert!(pages[1].annotations[0].contains("moved"));
        assert!(pages[1].annotations[1].contains("native"));
    }

    #[test]
    fn test_normalize_pages_last_entry_wins() {
        let pages = normalize_pages(vec![
            PageAnnotations::new(4, vec!["a".to_string()]),
            PageAnnotations::new(1, vec![NO_ANNOTATION.to_string()]),
            PageAnnotations::new(4, vec!["b".to_string(), NO_ANNOTATION.to_string()]),
        ]);

        assert_eq!(pages, vec![PageAnnotations::new(4, vec!["b".to_string()])]);
    }
}
