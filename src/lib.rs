//! # strongbox-crypto
//!
//! Authenticated encryption provider for the `strongbox` encrypted
//! document store.
//!
//! ## Quick Start
//!
//! ```
//! use strongbox_crypto::{EncryptionProvider, MasterKey};
//!
//! let key = MasterKey::new(&[0u8; 32]).unwrap();
//! let provider = EncryptionProvider::new(key);
//!
//! let envelope = provider.encrypt(b"secret", "record-42").unwrap();
//! let plaintext = provider.decrypt(&envelope, "record-42").unwrap();
//! assert_eq!(plaintext, b"secret");
//! ```
//!
//! ## Security Properties
//!
//! - AES-256-GCM with a fresh random nonce per call.
//! - The caller-supplied context string is bound in as AAD: decrypting
//!   with a different context fails, even with the right key.
//! - All failure modes collapse to one [`CryptoError::Authentication`]
//!   variant so callers cannot use error shape as a decryption oracle.
//!
//! ## What's NOT Provided
//!
//! - Key management or key derivation — callers supply raw 32-byte keys.
//! - Streaming encryption.
//! - Any on-disk persistence — see the sibling `strongbox-store` crate.

#![deny(unsafe_code)]

mod envelope;
mod error;
mod provider;

pub use error::CryptoError;
pub use provider::{EncryptionProvider, MasterKey};

/// Total envelope overhead in bytes (nonce + tag). A ciphertext envelope's
/// length is always `plaintext.len() + OVERHEAD_BYTES`.
pub use envelope::OVERHEAD_BYTES;
