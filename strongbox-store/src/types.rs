//! Core data types: identifiers, headers, index entries, search results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Identifier
// ---------------------------------------------------------------------------

/// An opaque, caller-supplied record identifier.
///
/// Used both as a filesystem leaf name and as the authenticated-encryption
/// context string, so it is validated once at construction rather than at
/// every use site.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
    /// Validate and wrap a caller-supplied identifier.
    ///
    /// Rejects the empty string, `/`, `\`, a NUL byte, or a leading `.`
    /// (the default identifier safety policy from the store's directory
    /// layout contract).
    pub fn new(id: impl Into<String>) -> Result<Self, StoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(StoreError::InvalidIdentifier(id, "identifier must not be empty"));
        }
        if id.starts_with('.') {
            return Err(StoreError::InvalidIdentifier(id, "identifier must not start with '.'"));
        }
        if id.contains('/') || id.contains('\\') || id.contains('\0') {
            return Err(StoreError::InvalidIdentifier(
                id,
                "identifier must not contain '/', '\\', or a NUL byte",
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

/// A named byte blob attached to a record.
///
/// Its durable name on disk is `{id}-{logical_name}`; logical names must be
/// unique within a single `save` call.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub logical_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(logical_name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            logical_name: logical_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Record header
// ---------------------------------------------------------------------------

/// Metadata about an indexed record, produced by the index provider and
/// carried along with every search result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordHeader {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub metadata: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Index entry (persisted)
// ---------------------------------------------------------------------------

/// One persisted row of the inverted index: a record's normalised content
/// plus the metadata needed to build a `RecordHeader` at query time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    /// Already-lowercased content, as stored — see `IndexProvider::index`.
    pub content: String,
    pub metadata: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
}

impl IndexEntry {
    pub fn header(&self) -> RecordHeader {
        RecordHeader {
            id: self.id.clone(),
            created_at: self.created,
            metadata: self.metadata.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// An identifier-level search hit, before any record has been loaded.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub id: String,
    pub score: f64,
    pub header: RecordHeader,
}

/// A search hit with its typed payload materialised.
#[derive(Clone, Debug)]
pub struct TypedSearchResult<T> {
    pub id: String,
    pub score: f64,
    pub header: RecordHeader,
    pub value: T,
}
