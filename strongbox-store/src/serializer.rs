//! Pluggable value serialisation.
//!
//! The record store treats a value's serialised form as opaque bytes; this
//! module is the only place that knows how to turn a `T: Serialize` into
//! those bytes and back.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreError;

/// Turns application values into bytes (for encryption + durable storage)
/// and into a plain string (for full-text indexing).
///
/// Implement this to swap in a different wire format; the default
/// [`JsonSerializer`] is compact, unindented, UTF-8 JSON.
pub trait RecordSerializer: Send + Sync {
    fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError>;
    fn from_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StoreError>;

    /// The string form handed to the index provider as indexable text.
    /// Defaults to the UTF-8 decoding of [`Self::to_bytes`].
    fn to_text<T: Serialize>(&self, value: &T) -> Result<String, StoreError> {
        let bytes = self.to_bytes(value)?;
        String::from_utf8(bytes).map_err(|e| StoreError::Serialize(e.to_string()))
    }
}

/// Compact, unindented UTF-8 JSON. Application types are expected to
/// `#[serde(rename_all = "camelCase")]` and
/// `#[serde(skip_serializing_if = "Option::is_none")]` on optional fields
/// themselves — the serialiser does not rewrite field names or strip
/// nulls on their behalf.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSerializer;

impl RecordSerializer for JsonSerializer {
    fn to_bytes<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(value).map_err(|e| StoreError::Serialize(e.to_string()))
    }

    fn from_bytes<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Deserialize(e.to_string()))
    }
}
