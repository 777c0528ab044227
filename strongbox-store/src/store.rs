//! Record store: encrypted, atomic (identifier → value) persistence plus
//! attachments, with an optional index kept in sync on every save.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{instrument, warn};

use crate::atomic;
use crate::error::StoreError;
use crate::index::IndexProvider;
use crate::search::SearchCoordinator;
use crate::serializer::{JsonSerializer, RecordSerializer};
use crate::types::{Attachment, Id, SearchResult, TypedSearchResult};
use strongbox_crypto::EncryptionProvider;

/// Encrypted, atomic document store.
///
/// Directory layout under `root`:
///
/// ```text
/// <root>/records/<id>.dat
/// <root>/attachments/<id>-<logical_name>.bin
/// <root>/index/...            (owned by the index provider)
/// ```
pub struct RecordStore<S: RecordSerializer = JsonSerializer> {
    records_dir: PathBuf,
    attachments_dir: PathBuf,
    crypto: Arc<EncryptionProvider>,
    serializer: S,
    index: Option<Arc<IndexProvider>>,
}

impl RecordStore<JsonSerializer> {
    /// Open (creating if necessary) a store rooted at `root`, with a
    /// freshly constructed index provider alongside it. Sweeps any
    /// leftover `.tmp` files from a prior crash.
    pub async fn open(root: impl Into<PathBuf>, crypto: Arc<EncryptionProvider>) -> Result<Self, StoreError> {
        Self::open_with(root, crypto, JsonSerializer, true).await
    }
}

impl<S: RecordSerializer> RecordStore<S> {
    /// Like [`Self::open`], but with explicit control over the serialiser
    /// and whether an index provider is attached.
    pub async fn open_with(
        root: impl Into<PathBuf>,
        crypto: Arc<EncryptionProvider>,
        serializer: S,
        with_index: bool,
    ) -> Result<Self, StoreError> {
        let root = root.into();
        let records_dir = root.join("records");
        let attachments_dir = root.join("attachments");
        let index_dir = root.join("index");

        tokio::fs::create_dir_all(&records_dir).await?;
        tokio::fs::create_dir_all(&attachments_dir).await?;
        tokio::fs::create_dir_all(&index_dir).await?;

        atomic::sweep_stale_tmp(&records_dir).await?;
        atomic::sweep_stale_tmp(&index_dir).await?;

        let index = if with_index {
            Some(Arc::new(IndexProvider::new(index_dir, crypto.clone())))
        } else {
            None
        };

        Ok(Self { records_dir, attachments_dir, crypto, serializer, index })
    }

    fn record_path(&self, id: &Id) -> PathBuf {
        self.records_dir.join(format!("{}.dat", id.as_str()))
    }

    fn attachment_path(&self, id: &Id, logical_name: &str) -> PathBuf {
        self.attachments_dir.join(format!("{}-{}.bin", id.as_str(), logical_name))
    }

    /// Persist `value` under `id`, optionally with attachments, and (if an
    /// index provider is configured) index its text form.
    ///
    /// The record file is durable before the index is updated; a crash
    /// between those two steps leaves the record present and the index
    /// stale. Index failure after a successful record write is reported to
    /// the caller.
    #[instrument(skip(self, value, attachments), fields(id = %id))]
    pub async fn save<T: Serialize>(
        &self,
        id: &str,
        value: &T,
        attachments: &[Attachment],
    ) -> Result<(), StoreError> {
        let id = Id::new(id)?;
        reject_duplicate_attachment_names(attachments)?;

        let bytes = self.serializer.to_bytes(value)?;
        let ciphertext = self.crypto.encrypt(&bytes, id.as_str())?;
        atomic::write(&self.record_path(&id), &ciphertext).await?;

        for attachment in attachments {
            let sealed = self.crypto.encrypt(&attachment.bytes, id.as_str())?;
            atomic::write(&self.attachment_path(&id, &attachment.logical_name), &sealed).await?;
        }

        if let Some(index) = &self.index {
            let text = self.serializer.to_text(value)?;
            if let Err(e) = index.index(id.as_str(), &text, BTreeMap::new()).await {
                warn!(id = %id, error = %e, "index update failed after record write committed");
                return Err(e);
            }
        }

        Ok(())
    }

    /// Load and deserialise the value stored under `id`.
    ///
    /// Returns `Ok(None)` if no record file exists. Decryption failure
    /// surfaces as an error — it never collapses to "absent".
    #[instrument(skip(self), fields(id))]
    pub async fn load<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>, StoreError> {
        let id = Id::new(id)?;
        let path = self.record_path(&id);
        let ciphertext = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let plaintext = self.crypto.decrypt(&ciphertext, id.as_str())?;
        let value = self.serializer.from_bytes(&plaintext)?;
        Ok(Some(value))
    }

    /// Remove the record file for `id`, if present, and every attachment
    /// whose name begins with `{id}-`. Never raises for an unknown id.
    /// Does not remove the corresponding index entry (see DESIGN.md).
    #[instrument(skip(self), fields(id))]
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = Id::new(id)?;
        remove_if_present(&self.record_path(&id)).await?;

        let prefix = format!("{}-", id.as_str());
        let mut entries = match tokio::fs::read_dir(&self.attachments_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(&prefix) {
                remove_if_present(&entry.path()).await?;
            }
        }
        Ok(())
    }

    /// Free-text search over indexed identifiers. Returns an empty
    /// sequence if no index provider is configured. Decrypts nothing.
    #[instrument(skip(self))]
    pub async fn find(&self, query: &str) -> Result<Vec<SearchResult>, StoreError> {
        match &self.index {
            Some(index) => index.query(query).await,
            None => Ok(Vec::new()),
        }
    }

    /// Like [`Self::find`], but materialises each hit into typed values,
    /// expanding aggregate (sequence-payload) records per §4.5.
    pub async fn find_typed<T: DeserializeOwned + Send + 'static>(
        &self,
        query: &str,
    ) -> Result<Vec<TypedSearchResult<T>>, StoreError> {
        let hits = self.find(query).await?;
        let coordinator = SearchCoordinator::new(&self.records_dir, &self.crypto, &self.serializer);
        Ok(coordinator.materialise(hits).await)
    }
}

fn reject_duplicate_attachment_names(attachments: &[Attachment]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for a in attachments {
        if !seen.insert(a.logical_name.as_str()) {
            return Err(StoreError::DuplicateAttachment(a.logical_name.clone()));
        }
    }
    Ok(())
}

async fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::Io(e)),
    }
}
