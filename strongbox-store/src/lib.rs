//! Encrypted, atomic, full-text-searchable document store.
//!
//! Built on top of [`strongbox_crypto`]'s AES-256-GCM envelopes: every
//! record, attachment, and index file is encrypted at rest, written via a
//! write-temp/fsync/rename sequence so readers never observe a partial
//! write, and (for records) bound to its identifier as AEAD context so
//! ciphertext cannot be relocated to a different identifier undetected.
//!
//! # Quick start
//!
//! ```no_run
//! # async fn run() -> Result<(), strongbox_store::StoreError> {
//! use strongbox_store::StoreConfig;
//!
//! let store = StoreConfig::builder("./data")
//!     .key_bytes(&[0u8; 32])?
//!     .build()?
//!     .open()
//!     .await?;
//!
//! store.save("lesson-2025-10-27", &serde_json::json!({
//!     "subject": "Science",
//!     "description": "Observed seagulls at the beach",
//! }), &[]).await?;
//!
//! let hits = store.find("seagulls").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # What's NOT provided
//!
//! No network surface, no CLI, no background compaction or batching — a
//! save completes or it doesn't, synchronously from the caller's point of
//! view. No key rotation or multi-key support: one store, one master key,
//! for its lifetime. See `DESIGN.md` for decisions on open questions.

mod atomic;
mod config;
mod error;
mod index;
mod search;
mod serializer;
mod store;
mod types;

pub use config::{StoreConfig, StoreConfigBuilder};
pub use error::StoreError;
pub use serializer::{JsonSerializer, RecordSerializer};
pub use store::RecordStore;
pub use types::{Attachment, Id, RecordHeader, SearchResult, TypedSearchResult};
