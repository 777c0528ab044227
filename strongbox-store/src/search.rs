//! Materialises search hits into typed values.
//!
//! A record file can hold either a single `T` or a sequence of `T` (an
//! "aggregate" file, written by a caller that bundles several values under
//! one identifier). [`SearchCoordinator`] tries the single-value shape
//! first and falls back to the sequence shape before giving up on a hit.

use std::path::{Path, PathBuf};

use futures::future::join_all;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::serializer::RecordSerializer;
use crate::types::{SearchResult, TypedSearchResult};
use strongbox_crypto::EncryptionProvider;

pub struct SearchCoordinator<'a, S: RecordSerializer> {
    records_dir: PathBuf,
    crypto: &'a EncryptionProvider,
    serializer: &'a S,
}

impl<'a, S: RecordSerializer> SearchCoordinator<'a, S> {
    pub fn new(records_dir: &Path, crypto: &'a EncryptionProvider, serializer: &'a S) -> Self {
        Self { records_dir: records_dir.to_path_buf(), crypto, serializer }
    }

    /// Load every hit's record concurrently, deserialising each into `T`
    /// (trying a single value, then a sequence of values). A hit whose
    /// record is missing, undecryptable, or matches neither shape is
    /// dropped silently and logged — one bad record never fails the whole
    /// query.
    pub async fn materialise<T: DeserializeOwned + Send + 'static>(
        &self,
        hits: Vec<SearchResult>,
    ) -> Vec<TypedSearchResult<T>> {
        let loads = hits.into_iter().map(|hit| self.load_one(hit));
        join_all(loads).await.into_iter().flatten().collect()
    }

    async fn load_one<T: DeserializeOwned>(&self, hit: SearchResult) -> Vec<TypedSearchResult<T>> {
        let path = self.records_dir.join(format!("{}.dat", hit.id));
        let ciphertext = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(id = %hit.id, error = %e, "search hit has no readable record file, skipping");
                return Vec::new();
            }
        };
        let plaintext = match self.crypto.decrypt(&ciphertext, &hit.id) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(id = %hit.id, error = %e, "search hit record failed to decrypt, skipping");
                return Vec::new();
            }
        };

        if let Ok(value) = self.serializer.from_bytes::<T>(&plaintext) {
            return vec![TypedSearchResult { id: hit.id, score: hit.score, header: hit.header, value }];
        }
        if let Ok(values) = self.serializer.from_bytes::<Vec<T>>(&plaintext) {
            return values
                .into_iter()
                .map(|value| TypedSearchResult {
                    id: hit.id.clone(),
                    score: hit.score,
                    header: hit.header.clone(),
                    value,
                })
                .collect();
        }

        warn!(id = %hit.id, "search hit record matches neither single nor sequence shape, skipping");
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::JsonSerializer;
    use crate::types::RecordHeader;
    use chrono::Utc;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
    struct Item {
        name: String,
    }

    fn header(id: &str) -> RecordHeader {
        RecordHeader { id: id.to_string(), created_at: Utc::now(), metadata: BTreeMap::new() }
    }

    async fn write_record(dir: &Path, crypto: &EncryptionProvider, id: &str, plaintext: &[u8]) {
        let ciphertext = crypto.encrypt(plaintext, id).unwrap();
        tokio::fs::create_dir_all(dir).await.unwrap();
        tokio::fs::write(dir.join(format!("{id}.dat")), ciphertext).await.unwrap();
    }

    #[tokio::test]
    async fn single_value_shape() {
        let dir = tempfile::tempdir().unwrap();
        let crypto = EncryptionProvider::new(strongbox_crypto::MasterKey::new(&[9u8; 32]).unwrap());
        let serializer = JsonSerializer;
        write_record(dir.path(), &crypto, "one", br#"{"name":"a"}"#).await;

        let coordinator = SearchCoordinator::new(dir.path(), &crypto, &serializer);
        let hits = vec![SearchResult { id: "one".into(), score: 1.0, header: header("one") }];
        let out: Vec<TypedSearchResult<Item>> = coordinator.materialise(hits).await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, Item { name: "a".into() });
    }

    #[tokio::test]
    async fn aggregate_sequence_shape_expands_into_multiple_results() {
        let dir = tempfile::tempdir().unwrap();
        let crypto = EncryptionProvider::new(strongbox_crypto::MasterKey::new(&[9u8; 32]).unwrap());
        let serializer = JsonSerializer;
        write_record(dir.path(), &crypto, "bundle", br#"[{"name":"a"},{"name":"b"}]"#).await;

        let coordinator = SearchCoordinator::new(dir.path(), &crypto, &serializer);
        let hits = vec![SearchResult { id: "bundle".into(), score: 1.0, header: header("bundle") }];
        let out: Vec<TypedSearchResult<Item>> = coordinator.materialise(hits).await;
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "bundle");
        assert_eq!(out[1].id, "bundle");
    }

    #[tokio::test]
    async fn missing_record_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        let crypto = EncryptionProvider::new(strongbox_crypto::MasterKey::new(&[9u8; 32]).unwrap());
        let serializer = JsonSerializer;

        let coordinator = SearchCoordinator::new(dir.path(), &crypto, &serializer);
        let hits = vec![SearchResult { id: "ghost".into(), score: 1.0, header: header("ghost") }];
        let out: Vec<TypedSearchResult<Item>> = coordinator.materialise(hits).await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn shape_mismatch_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        let crypto = EncryptionProvider::new(strongbox_crypto::MasterKey::new(&[9u8; 32]).unwrap());
        let serializer = JsonSerializer;
        write_record(dir.path(), &crypto, "odd", br#"{"unrelated":true}"#).await;

        let coordinator = SearchCoordinator::new(dir.path(), &crypto, &serializer);
        let hits = vec![SearchResult { id: "odd".into(), score: 1.0, header: header("odd") }];
        let out: Vec<TypedSearchResult<Item>> = coordinator.materialise(hits).await;
        assert!(out.is_empty());
    }
}
