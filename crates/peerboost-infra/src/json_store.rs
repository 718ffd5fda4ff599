//! JSON file implementation of the `DocumentStore` port.
//!
//! The whole document lives in one JSON file. Saves write the serialized
//! document to a sibling `.tmp` file and atomically rename it over the real
//! path, so a crash mid-write leaves either the old document or the new one,
//! never a torn mix. Loads absorb every failure mode: a missing file yields
//! an empty document, and a malformed file is snapshotted aside (so the data
//! can be inspected) before an empty document is returned.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use peerboost_core::store::DocumentStore;
use peerboost_types::document::Document;
use peerboost_types::error::StoreError;

/// Durable JSON-file store for the engine document.
pub struct JsonDocumentStore {
    path: PathBuf,
}

impl JsonDocumentStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Copy the unparseable document aside as `<path>.corrupt-<unix-ts>`.
    /// Best-effort: a failure here is logged and otherwise ignored.
    async fn snapshot_corrupt(&self) {
        let mut snapshot = self.path.as_os_str().to_os_string();
        snapshot.push(format!(".corrupt-{}", chrono::Utc::now().timestamp()));
        let snapshot = PathBuf::from(snapshot);

        match tokio::fs::copy(&self.path, &snapshot).await {
            Ok(_) => warn!(
                snapshot = %snapshot.display(),
                "corrupt document snapshotted aside"
            ),
            Err(err) => warn!(
                error = %err,
                "failed to snapshot corrupt document; continuing with empty state"
            ),
        }
    }
}

impl DocumentStore for JsonDocumentStore {
    async fn load(&self) -> Document {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no document file; starting empty");
                return Document::default();
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "document unreadable; starting empty"
                );
                return Document::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(doc) => doc,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "document malformed; starting empty"
                );
                self.snapshot_corrupt().await;
                Document::default()
            }
        }
    }

    async fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(doc)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        let result: Result<(), StoreError> = async {
            tokio::fs::write(&temp, json.as_bytes()).await?;
            tokio::fs::rename(&temp, &self.path).await?;
            Ok(())
        }
        .await;

        if result.is_err() {
            // Leave no partial artifact behind; the committed file is intact.
            let _ = tokio::fs::remove_file(&temp).await;
        }
        result
    }
}
