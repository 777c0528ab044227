//! Store construction configuration.

use std::path::PathBuf;
use std::sync::Arc;

use strongbox_crypto::{EncryptionProvider, MasterKey};

use crate::error::StoreError;
use crate::serializer::{JsonSerializer, RecordSerializer};
use crate::store::RecordStore;

/// Construction parameters for a [`RecordStore`].
///
/// Built via [`StoreConfigBuilder`]; the only required field is `root`, and
/// a key must be supplied via `master_key` or `key_bytes` before
/// [`StoreConfig::open`] is called.
pub struct StoreConfig<S: RecordSerializer = JsonSerializer> {
    root: PathBuf,
    crypto: Arc<EncryptionProvider>,
    serializer: S,
    with_index: bool,
}

impl StoreConfig<JsonSerializer> {
    pub fn builder(root: impl Into<PathBuf>) -> StoreConfigBuilder<JsonSerializer> {
        StoreConfigBuilder {
            root: root.into(),
            key: None,
            serializer: JsonSerializer,
            with_index: true,
        }
    }
}

impl<S: RecordSerializer> StoreConfig<S> {
    /// Open the store this configuration describes.
    pub async fn open(self) -> Result<RecordStore<S>, StoreError> {
        RecordStore::open_with(self.root, self.crypto, self.serializer, self.with_index).await
    }
}

/// Builder for [`StoreConfig`].
///
/// Swapping the serialiser via [`Self::serializer`] changes the builder's
/// type parameter, so the final [`StoreConfig`] (and the `RecordStore` it
/// opens) is statically tied to the serialiser chosen.
pub struct StoreConfigBuilder<S: RecordSerializer = JsonSerializer> {
    root: PathBuf,
    key: Option<MasterKey>,
    serializer: S,
    with_index: bool,
}

impl<S: RecordSerializer> StoreConfigBuilder<S> {
    /// Supply an already-constructed master key.
    pub fn master_key(mut self, key: MasterKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Supply raw 32-byte key material directly.
    pub fn key_bytes(mut self, bytes: &[u8]) -> Result<Self, StoreError> {
        self.key = Some(MasterKey::new(bytes)?);
        Ok(self)
    }

    /// Swap the record serialiser. Defaults to compact JSON.
    pub fn serializer<S2: RecordSerializer>(self, serializer: S2) -> StoreConfigBuilder<S2> {
        StoreConfigBuilder {
            root: self.root,
            key: self.key,
            serializer,
            with_index: self.with_index,
        }
    }

    /// Disable the search index entirely. `find`/`find_typed` then always
    /// return empty results and no index files are created.
    pub fn without_index(mut self) -> Self {
        self.with_index = false;
        self
    }

    pub fn build(self) -> Result<StoreConfig<S>, StoreError> {
        let key = self.key.ok_or(StoreError::Config("a master key is required to open a store"))?;
        Ok(StoreConfig {
            root: self.root,
            crypto: Arc::new(EncryptionProvider::new(key)),
            serializer: self.serializer,
            with_index: self.with_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_requires_a_key() {
        let dir = tempfile::tempdir().unwrap();
        let result = StoreConfig::builder(dir.path()).build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn builder_opens_a_usable_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::builder(dir.path()).key_bytes(&[7u8; 32]).unwrap().build().unwrap();
        let store = config.open().await.unwrap();
        assert!(store.find("anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn without_index_disables_search() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::builder(dir.path())
            .key_bytes(&[7u8; 32])
            .unwrap()
            .without_index()
            .build()
            .unwrap();
        let store = config.open().await.unwrap();
        store.save("rec-1", &serde_json::json!({"text": "seagulls"}), &[]).await.unwrap();
        assert!(store.find("seagulls").await.unwrap().is_empty());
    }
}
