use linktabs_protocol::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to parse document at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to access document at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Whole-document persistence of the page content.
///
/// Reads always return the full document; writes always replace the full
/// file. There is no locking between writers: the last save wins.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, falling back to [`Document::default`] if the file
    /// does not exist. A file that exists but does not parse is an error.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()), err)]
    pub fn load(&self) -> Result<Document, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Document file not found, using default document");
                return Ok(Document::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let document: Document =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        tracing::trace!(tabs = document.tabs.len(), "Document loaded");
        Ok(document.normalized())
    }

    /// Serialize the document with two-space indentation, keeping non-ASCII
    /// text as-is, and replace the backing file.
    ///
    /// The content is written to a temporary file next to the target and
    /// renamed into place, so a failed write never truncates the document.
    #[instrument(level = "debug", skip(self, document), fields(path = %self.path.display()), err)]
    pub fn save(&self, document: &Document) -> Result<(), StoreError> {
        let mut serialized =
            serde_json::to_string_pretty(document).map_err(StoreError::Serialize)?;
        serialized.push('\n');

        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        // Same directory as the target so the final rename stays on one filesystem.
        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
        temp.write_all(serialized.as_bytes()).map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(&self.path).map_err(|err| io_err(err.error))?;

        tracing::debug!(tabs = document.tabs.len(), "Document saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linktabs_protocol::{Item, Tab};
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn sample_document() -> Document {
        let mut document = Document::default();
        document.site.title = "Distribuidora São João".to_string();
        document.tabs[0].items = vec![
            Item::new("Site", "https://example.com").with_icon("🌐"),
            Item::new("Catálogo", "https://example.com/catalogo").with_arquivo("icons/cat.png"),
        ];
        document.tabs.push(Tab::new("Redes"));
        document
    }

    #[test]
    fn missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("links.json"));

        assert_eq!(store.load().unwrap(), Document::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DocumentStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn load_applies_invariants() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        std::fs::write(&path, r#"{"site":{"title":"t","subtitle":"s","columns":9},"tabs":[]}"#)
            .unwrap();

        let document = DocumentStore::new(&path).load().unwrap();
        assert_eq!(document.site.columns, 3);
        assert_eq!(document.tabs.len(), 1);
    }

    #[test]
    fn save_then_load_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("links.json"));
        let document = sample_document();

        store.save(&document).unwrap();
        assert_eq!(store.load().unwrap(), document);

        // A second cycle without edits reproduces the same file.
        let first = std::fs::read_to_string(store.path()).unwrap();
        store.save(&store.load().unwrap()).unwrap();
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), first);
    }

    #[test]
    fn saved_file_is_indented_and_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("links.json"));
        store.save(&sample_document()).unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("Distribuidora São João"));
        assert!(contents.contains("🌐"));
        assert!(contents.contains("\n  \"site\": {"));
        assert!(!contents.contains("\\u"));
    }

    #[test]
    fn save_leaves_no_temporary_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("links.json"));
        store.save(&sample_document()).unwrap();
        store.save(&Document::default()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("links.json")]);
    }

    #[test]
    fn save_into_missing_directory_fails_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path().join("missing").join("links.json"));

        let err = store.save(&Document::default()).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!dir.path().join("missing").exists());
    }
}
