//! Chat history storage
//!
//! All chats live in one JSON document on disk. Reads always go to the
//! file; writes replace the whole document through a temp file and a
//! rename, and are serialized by a per-store lock.

use crate::error::{QuickchatError, Result};
use anyhow::Context;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, MutexGuard};

pub mod types;
pub use types::{
    new_chat_id, now_timestamp, title_from_message, Chat, ChatMessage, HistoryDocument, Role,
    DEFAULT_CHAT_TITLE, TITLE_MAX_CHARS,
};

/// File-backed store for the chat history document
pub struct HistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    /// Create a store backed by the JSON file at `path`
    ///
    /// The file does not need to exist; it is created on the first save.
    ///
    /// # Examples
    ///
    /// ```
    /// use quickchat::storage::HistoryStore;
    ///
    /// let store = HistoryStore::new("/tmp/quickchat_history.json");
    /// assert!(store.path().ends_with("quickchat_history.json"));
    /// ```
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history document
    ///
    /// A missing, unreadable or malformed file yields an empty document.
    pub async fn load(&self) -> HistoryDocument {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("History file {} not found, starting empty", self.path.display());
                return HistoryDocument::default();
            }
            Err(e) => {
                tracing::warn!("Failed to read history file {}: {}", self.path.display(), e);
                return HistoryDocument::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    "History file {} is malformed, starting empty: {}",
                    self.path.display(),
                    e
                );
                HistoryDocument::default()
            }
        }
    }

    /// Persist the history document
    ///
    /// Failures are logged and otherwise ignored; callers always proceed
    /// as if the write succeeded.
    pub async fn save(&self, document: &HistoryDocument) {
        if let Err(e) = self.write_document(document).await {
            tracing::error!("Error saving chat history: {:#}", e);
        }
    }

    /// Take the write lock and load the document for modification
    ///
    /// The lock is held until the returned writer is committed or dropped,
    /// so concurrent load-modify-save sequences cannot lose updates.
    pub async fn writer(&self) -> HistoryWriter<'_> {
        let guard = self.write_lock.lock().await;
        let document = self.load().await;
        HistoryWriter {
            store: self,
            document,
            _guard: guard,
        }
    }

    async fn write_document(&self, document: &HistoryDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| QuickchatError::Storage(format!("Failed to serialize history: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create history directory")?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        tracing::debug!(
            "Saved {} chats to {}",
            document.chats.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Exclusive, loaded view of the history document
///
/// Dereferences to [`HistoryDocument`]. Call [`HistoryWriter::commit`] to
/// save; dropping without committing discards the changes.
pub struct HistoryWriter<'a> {
    store: &'a HistoryStore,
    document: HistoryDocument,
    _guard: MutexGuard<'a, ()>,
}

impl HistoryWriter<'_> {
    /// Save the modified document and release the lock
    pub async fn commit(self) {
        self.store.save(&self.document).await;
    }
}

impl Deref for HistoryWriter<'_> {
    type Target = HistoryDocument;

    fn deref(&self) -> &Self::Target {
        &self.document
    }
}

impl DerefMut for HistoryWriter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.document
    }
}
