//! Error type for the encryption provider.

use thiserror::Error;

/// Failure modes the encryption provider can produce.
///
/// Both variants are deliberately coarse: callers must not be able to
/// distinguish "wrong key" from "corrupted ciphertext" from "wrong context"
/// by inspecting the error, since that distinction is an oracle an attacker
/// could exploit.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// The master key supplied at construction was not exactly 32 bytes.
    #[error("invalid master key length: expected 32 bytes, got {got}")]
    InvalidKeyLength { got: usize },

    /// Decryption failed: wrong key, wrong context, corrupted ciphertext,
    /// or a truncated envelope. Authentication failures are never
    /// distinguished from each other.
    #[error("authentication failed")]
    Authentication,
}
