//! Error types for the record store and index.

use thiserror::Error;

/// Errors the record store and its collaborators can produce.
///
/// Recoverable cases — an absent record on `load`, an absent file on
/// `delete`, a per-hit deserialisation mismatch in search, and index
/// corruption on lazy load — are handled locally and never surface as
/// this type; see each module's documentation for where recovery happens.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Decryption or key-construction failure from the encryption provider.
    #[error("crypto: {0}")]
    Crypto(#[from] strongbox_crypto::CryptoError),

    /// Filesystem failure: permission denied, rename failure, disk full,
    /// or an unexpected missing file (one observed to exist mid-read).
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Identifier is empty or contains a forbidden character.
    #[error("invalid identifier {0:?}: {1}")]
    InvalidIdentifier(String, &'static str),

    /// Two attachments in the same `save` call used the same logical name.
    #[error("duplicate attachment logical name {0:?} in one save call")]
    DuplicateAttachment(String),

    /// The value could not be serialised to bytes.
    #[error("serialize: {0}")]
    Serialize(String),

    /// Bytes loaded directly via `load` could not be deserialised to the
    /// target type. (Search materialisation swallows this case instead —
    /// see `SearchCoordinator`.)
    #[error("deserialize: {0}")]
    Deserialize(String),

    /// A [`StoreConfigBuilder`](crate::config::StoreConfigBuilder) was
    /// missing a required field at `build()` time.
    #[error("invalid store configuration: {0}")]
    Config(&'static str),
}
