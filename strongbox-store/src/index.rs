//! Persistent, encrypted inverted index: tokens → scored record identifiers.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::atomic;
use crate::error::StoreError;
use crate::types::{IndexEntry, SearchResult};
use strongbox_crypto::EncryptionProvider;

/// Context string the index file is encrypted under. Fixed, not per-record.
const INDEX_CONTEXT: &str = "search-index";

/// Query tokens at or below this length contribute nothing to scoring.
const MAX_IGNORED_TOKEN_LEN: usize = 2;

struct State {
    initialised: bool,
    entries: HashMap<String, IndexEntry>,
}

/// Maintains a persistent, encrypted mapping from search tokens to scored
/// record identifiers with per-identifier metadata, surviving restarts.
///
/// Loads lazily on first use: the first call to [`Self::index`],
/// [`Self::query`], or [`Self::clear`] takes the internal lock and, if not
/// already initialised, reads and decrypts the on-disk image. A decrypt or
/// parse failure at that point is not fatal — it is logged and the index
/// starts empty (first-run and corruption share a recovery path).
pub struct IndexProvider {
    dir: PathBuf,
    crypto: Arc<EncryptionProvider>,
    state: Mutex<State>,
}

impl IndexProvider {
    /// `dir` is the index subdirectory (`<root>/index`); the on-disk image
    /// lives at `dir/search-index.dat`.
    pub fn new(dir: PathBuf, crypto: Arc<EncryptionProvider>) -> Self {
        Self {
            dir,
            crypto,
            state: Mutex::new(State { initialised: false, entries: HashMap::new() }),
        }
    }

    fn file_path(&self) -> PathBuf {
        self.dir.join("search-index.dat")
    }

    async fn ensure_initialised(&self, state: &mut State) -> Result<(), StoreError> {
        if state.initialised {
            return Ok(());
        }
        let path = self.file_path();
        match tokio::fs::read(&path).await {
            Ok(ciphertext) => match self.decode(&ciphertext) {
                Ok(entries) => {
                    state.entries = entries.into_iter().map(|e| (e.id.clone(), e)).collect();
                    debug!(count = state.entries.len(), "loaded search index");
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "search index corrupt or undecryptable, starting empty");
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::Io(e)),
        }
        state.initialised = true;
        Ok(())
    }

    fn decode(&self, ciphertext: &[u8]) -> Result<Vec<IndexEntry>, StoreError> {
        let plaintext = self.crypto.decrypt(ciphertext, INDEX_CONTEXT)?;
        serde_json::from_slice(&plaintext).map_err(|e| StoreError::Deserialize(e.to_string()))
    }

    async fn persist(&self, state: &State) -> Result<(), StoreError> {
        let entries: Vec<&IndexEntry> = state.entries.values().collect();
        let plaintext = serde_json::to_vec(&entries).map_err(|e| StoreError::Serialize(e.to_string()))?;
        let ciphertext = self.crypto.encrypt(&plaintext, INDEX_CONTEXT)?;
        atomic::write(&self.file_path(), &ciphertext).await?;
        Ok(())
    }

    /// Overwrite the entry for `id` and persist the whole index
    /// immediately — persistence is eager, there is no batched flush.
    pub async fn index(&self, id: &str, content: &str, metadata: BTreeMap<String, String>) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        self.ensure_initialised(&mut state).await?;

        let entry = IndexEntry {
            id: id.to_string(),
            content: content.to_lowercase(),
            metadata,
            created: Utc::now(),
        };
        state.entries.insert(id.to_string(), entry);
        self.persist(&state).await?;
        debug!(id, "indexed record");
        Ok(())
    }

    /// Tokenise `query_text` (lowercase, whitespace-split, dedup, drop
    /// tokens of length ≤ 2) and return entries with positive score,
    /// ordered by score descending.
    pub async fn query(&self, query_text: &str) -> Result<Vec<SearchResult>, StoreError> {
        let mut state = self.state.lock().await;
        self.ensure_initialised(&mut state).await?;

        let terms = tokenize(query_text);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut results: Vec<SearchResult> = state
            .entries
            .values()
            .filter_map(|entry| {
                let score = score(&entry.content, &terms);
                if score > 0.0 {
                    Some(SearchResult { id: entry.id.clone(), score, header: entry.header() })
                } else {
                    None
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(results)
    }

    /// Empty the in-memory map, persist (an empty list), then delete the
    /// file. Subsequent queries return nothing until the next `index`.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        self.ensure_initialised(&mut state).await?;

        state.entries.clear();
        self.persist(&state).await?;
        match tokio::fs::remove_file(self.file_path()).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::Io(e)),
        }
        Ok(())
    }
}

/// Lowercase, whitespace-split, trim, drop empty and length-≤2 tokens,
/// dedup.
fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut seen = std::collections::HashSet::new();
    let mut terms = Vec::new();
    for token in lower.split_whitespace() {
        let token = token.trim();
        if token.len() <= MAX_IGNORED_TOKEN_LEN {
            continue;
        }
        if seen.insert(token.to_string()) {
            terms.push(token.to_string());
        }
    }
    terms
}

/// `score = Σ_t 10·ln(1 + occurrences(content, t))` over query terms with
/// at least one occurrence. Occurrence counting is non-overlapping
/// substring count, advancing by the pattern length after each hit — this
/// is plain substring matching, not whitespace-bounded word matching.
fn score(content: &str, terms: &[String]) -> f64 {
    terms
        .iter()
        .map(|term| {
            let occurrences = count_occurrences(content, term);
            if occurrences > 0 {
                10.0 * ((1 + occurrences) as f64).ln()
            } else {
                0.0
            }
        })
        .sum()
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        count += 1;
        start += pos + needle.len();
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(dir: &std::path::Path) -> IndexProvider {
        let crypto = Arc::new(EncryptionProvider::new(
            strongbox_crypto::MasterKey::new(&[3u8; 32]).unwrap(),
        ));
        IndexProvider::new(dir.to_path_buf(), crypto)
    }

    #[test]
    fn tokenizer_drops_short_tokens_and_dedups() {
        let terms = tokenize("at to in seagull seagull beach");
        assert_eq!(terms, vec!["seagull".to_string(), "beach".to_string()]);
    }

    #[test]
    fn occurrence_counting_is_non_overlapping() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
        assert_eq!(count_occurrences("seagull seagull seagull", "seagull"), 3);
    }

    #[tokio::test]
    async fn query_ranks_by_occurrence_count() {
        let dir = tempfile::tempdir().unwrap();
        let idx = provider(dir.path());
        idx.index("one", "seagull", BTreeMap::new()).await.unwrap();
        idx.index("two", "seagull seagull", BTreeMap::new()).await.unwrap();
        idx.index("three", "seagull seagull seagull", BTreeMap::new()).await.unwrap();
        idx.index("four", "one seagull two seagull", BTreeMap::new()).await.unwrap();

        let results = idx.query("seagull").await.unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].id, "three");
        let tied_pair: std::collections::HashSet<_> = results[1..3].iter().map(|r| r.id.clone()).collect();
        assert_eq!(tied_pair, std::collections::HashSet::from(["two".to_string(), "four".to_string()]));
        assert_eq!(results[1].score, results[2].score);
        assert_eq!(results[3].id, "one");
    }

    #[tokio::test]
    async fn short_tokens_never_match() {
        let dir = tempfile::tempdir().unwrap();
        let idx = provider(dir.path());
        idx.index("a", "A seagull at the beach", BTreeMap::new()).await.unwrap();
        let results = idx.query("at to in").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn persists_across_fresh_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let idx = provider(dir.path());
            idx.index("rec", "seagulls at the beach", BTreeMap::new()).await.unwrap();
        }
        let idx2 = provider(dir.path());
        let results = idx2.query("seagulls").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "rec");
    }

    #[tokio::test]
    async fn clear_empties_results_and_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let idx = provider(dir.path());
        idx.index("rec", "seagulls", BTreeMap::new()).await.unwrap();
        idx.clear().await.unwrap();
        assert!(idx.query("seagulls").await.unwrap().is_empty());
        assert!(!dir.path().join("search-index.dat").exists());
    }

    #[tokio::test]
    async fn corrupt_index_file_starts_empty_instead_of_failing() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::create_dir_all(dir.path()).await.unwrap();
        tokio::fs::write(dir.path().join("search-index.dat"), b"not a valid envelope")
            .await
            .unwrap();
        let idx = provider(dir.path());
        let results = idx.query("anything").await.unwrap();
        assert!(results.is_empty());
    }
}
