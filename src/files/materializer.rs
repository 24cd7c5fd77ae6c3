//! File materializers

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};
use crate::session::{is_path_component, DocumentRef};

/// A document copy available on local disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalFile {
    pub document_id: String,
    pub path: PathBuf,
}

/// Retrieves local copies of session documents
#[async_trait]
pub trait FileMaterializer: Send + Sync {
    /// Materialize as many documents as possible
    ///
    /// Partial results are fine. `Err` means nothing could be retrieved.
    async fn download(&self, documents: &[DocumentRef]) -> Result<Vec<LocalFile>>;
}

/// Copies documents out of a library directory into a cache directory
///
/// Each copy lands at `<cache>/<document id>/<file name>`. The library is
/// searched at `<library>/<document id>/<file name>` first, then at
/// `<library>/<file name>`.
pub struct DirectoryMaterializer {
    library_dir: PathBuf,
    cache_dir: PathBuf,
}

impl DirectoryMaterializer {
    pub fn new(library_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: library_dir.into(),
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    async fn materialize(&self, document: &DocumentRef) -> Result<LocalFile> {
        if !is_path_component(&document.id) {
            return Err(SyncError::Download(format!(
                "document id {:?} is not a valid directory name",
                document.id
            )));
        }
        let file_name = document.file_name();
        let entry_dir = self.cache_dir.join(&document.id);
        let target = entry_dir.join(&file_name);

        if tokio::fs::try_exists(&target).await? {
            tracing::debug!(document_id = %document.id, path = %target.display(), "Using cached copy");
        } else {
            let source = self.find_source(&document.id, &file_name).await?;
            tokio::fs::create_dir_all(&entry_dir).await?;
            tokio::fs::copy(&source, &target).await?;
            tracing::debug!(document_id = %document.id, path = %target.display(), "Copied document");
        }

        Ok(LocalFile {
            document_id: document.id.clone(),
            path: target,
        })
    }

    async fn find_source(&self, document_id: &str, file_name: &str) -> Result<PathBuf> {
        let scoped = self.library_dir.join(document_id).join(file_name);
        if tokio::fs::try_exists(&scoped).await? {
            return Ok(scoped);
        }
        Ok(self.library_dir.join(file_name))
    }
}

#[async_trait]
impl FileMaterializer for DirectoryMaterializer {
    async fn download(&self, documents: &[DocumentRef]) -> Result<Vec<LocalFile>> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let mut files = Vec::with_capacity(documents.len());
        for document in documents {
            match self.materialize(document).await {
                Ok(file) => files.push(file),
                Err(e) => {
                    tracing::warn!(
                        document_id = %document.id,
                        error = %e,
                        "Failed to materialize document"
                    );
                }
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::LessonDocument;

    fn refs(ids: &[&str]) -> Vec<DocumentRef> {
        ids.iter()
            .enumerate()
            .map(|(position, id)| DocumentRef::new(position, &LessonDocument::new(id, "Lesson")))
            .collect()
    }

    #[tokio::test]
    async fn test_partial_download() {
        let library = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        std::fs::write(library.path().join("pdf-a.pdf"), b"%PDF-1.7 a").unwrap();
        std::fs::write(library.path().join("pdf-c.pdf"), b"%PDF-1.7 c").unwrap();

        let materializer = DirectoryMaterializer::new(library.path(), cache.path().join("pdf"));
        let files = materializer
            .download(&refs(&["pdf-a", "pdf-b", "pdf-c"]))
            .await
            .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].document_id, "pdf-a");
        assert_eq!(files[1].document_id, "pdf-c");
        assert_eq!(std::fs::read(&files[1].path).unwrap(), b"%PDF-1.7 c");
    }

    #[tokio::test]
    async fn test_reuses_cached_copy() {
        let library = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(cache.path().join("pdf-a")).unwrap();
        std::fs::write(cache.path().join("pdf-a").join("pdf-a.pdf"), b"cached").unwrap();

        let materializer = DirectoryMaterializer::new(library.path(), cache.path());
        let files = materializer.download(&refs(&["pdf-a"])).await.unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(std::fs::read(&files[0].path).unwrap(), b"cached");
    }

    fn with_src(entries: &[(&str, &str)]) -> Vec<DocumentRef> {
        entries
            .iter()
            .enumerate()
            .map(|(position, (id, src))| {
                DocumentRef::new(position, &LessonDocument::new(id, "Lesson").with_src(src))
            })
            .collect()
    }

    #[tokio::test]
    async fn test_same_file_name_in_different_documents() {
        let library = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        for (id, body) in [("pdf-a", "a"), ("pdf-b", "b")] {
            std::fs::create_dir_all(library.path().join(id)).unwrap();
            std::fs::write(library.path().join(id).join("lesson.pdf"), body).unwrap();
        }

        let materializer = DirectoryMaterializer::new(library.path(), cache.path());
        let documents = with_src(&[
            ("pdf-a", "https://cdn.example/a/lesson.pdf"),
            ("pdf-b", "https://cdn.example/b/lesson.pdf"),
        ]);
        let files = materializer.download(&documents).await.unwrap();

        assert_eq!(files.len(), 2);
        assert_ne!(files[0].path, files[1].path);
        assert_eq!(std::fs::read(&files[0].path).unwrap(), b"a");
        assert_eq!(std::fs::read(&files[1].path).unwrap(), b"b");
    }

    #[tokio::test]
    async fn test_cached_copy_is_not_shared_across_documents() {
        let library = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(cache.path().join("pdf-a")).unwrap();
        std::fs::write(cache.path().join("pdf-a").join("lesson.pdf"), b"a").unwrap();
        std::fs::write(library.path().join("lesson.pdf"), b"b").unwrap();

        let materializer = DirectoryMaterializer::new(library.path(), cache.path());
        let documents = with_src(&[
            ("pdf-a", "https://cdn.example/a/lesson.pdf"),
            ("pdf-b", "https://cdn.example/b/lesson.pdf"),
        ]);
        let files = materializer.download(&documents).await.unwrap();

        assert_eq!(std::fs::read(&files[0].path).unwrap(), b"a");
        assert_eq!(std::fs::read(&files[1].path).unwrap(), b"b");
        assert_eq!(files[1].path, cache.path().join("pdf-b").join("lesson.pdf"));
    }

    #[tokio::test]
    async fn test_paths_stay_inside_cache() {
        let root = tempfile::tempdir().unwrap();
        let library = root.path().join("library");
        let cache = root.path().join("cache");
        std::fs::create_dir_all(&library).unwrap();
        std::fs::write(library.join("pdf-a.pdf"), b"a").unwrap();
        std::fs::write(library.join("notes.pdf"), b"notes").unwrap();

        let materializer = DirectoryMaterializer::new(&library, &cache);
        let documents = with_src(&[
            ("pdf-a", "https://cdn.example/lessons/.."),
            ("..", "https://cdn.example/notes.pdf"),
        ]);
        let files = materializer.download(&documents).await.unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, cache.join("pdf-a").join("pdf-a.pdf"));
        assert!(!root.path().join("notes.pdf").exists());
    }
}
