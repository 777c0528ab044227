//! Authenticated encryption provider: AES-256-GCM with a caller-supplied
//! context string bound in as additional authenticated data.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use getrandom::getrandom;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::envelope::{self, NONCE_BYTES};
use crate::error::CryptoError;

/// 32 raw master-key bytes. Zeroized on drop.
///
/// Owned exclusively by the [`EncryptionProvider`] that was constructed
/// from it; the provider never logs or `Debug`-prints the bytes.
#[derive(Clone, ZeroizeOnDrop)]
pub struct MasterKey([u8; 32]);

impl MasterKey {
    /// Build a master key from exactly 32 bytes.
    ///
    /// Fails with [`CryptoError::InvalidKeyLength`] for any other length.
    pub fn new(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidKeyLength { got: bytes.len() });
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

/// Authenticated encryption/decryption of byte buffers, with the context
/// string bound in as AAD.
///
/// One provider is constructed per master key and reused for every
/// encrypt/decrypt call; it holds no other mutable state.
pub struct EncryptionProvider {
    key: MasterKey,
}

impl EncryptionProvider {
    pub fn new(key: MasterKey) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext`, binding `context` as AAD.
    ///
    /// Draws a fresh random 12-byte nonce every call; two encryptions of
    /// the same plaintext and context produce distinct envelopes.
    pub fn encrypt(&self, plaintext: &[u8], context: &str) -> Result<Vec<u8>, CryptoError> {
        let cipher =
            Aes256Gcm::new_from_slice(&self.key.0).map_err(|_| CryptoError::Authentication)?;

        let mut nonce_bytes = [0u8; NONCE_BYTES];
        getrandom(&mut nonce_bytes).map_err(|_| CryptoError::Authentication)?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = cipher
            .encrypt(
                nonce,
                Payload {
                    msg: plaintext,
                    aad: context.as_bytes(),
                },
            )
            .map_err(|_| CryptoError::Authentication)?;

        Ok(envelope::encode(&nonce_bytes, &sealed))
    }

    /// Decrypt an envelope produced by [`Self::encrypt`], binding the same
    /// `context` as AAD.
    ///
    /// Fails with [`CryptoError::Authentication`] for a wrong key, wrong
    /// context, corrupted ciphertext, or a truncated envelope — every
    /// failure mode collapses to the same error so callers cannot use it
    /// as an oracle.
    pub fn decrypt(&self, envelope_bytes: &[u8], context: &str) -> Result<Vec<u8>, CryptoError> {
        let parts = envelope::decode(envelope_bytes)?;
        let cipher =
            Aes256Gcm::new_from_slice(&self.key.0).map_err(|_| CryptoError::Authentication)?;
        let nonce = Nonce::from_slice(parts.nonce);

        cipher
            .decrypt(
                nonce,
                Payload {
                    msg: parts.sealed,
                    aad: context.as_bytes(),
                },
            )
            .map_err(|_| CryptoError::Authentication)
    }
}

impl Drop for EncryptionProvider {
    fn drop(&mut self) {
        self.key.0.zeroize();
    }
}
