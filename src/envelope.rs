//! Ciphertext envelope layout (stable, bit-exact)
//!
//! ```text
//! byte[ 0..12)   nonce        (12 bytes, random)
//! byte[12..N-16) ciphertext   (N-28 bytes, same length as plaintext)
//! byte[N-16..N)  tag          (16 bytes, AES-GCM authentication tag)
//! ```
//!
//! Total length N = plaintext_length + 28.

use crate::error::CryptoError;

pub const NONCE_BYTES: usize = 12;
pub const TAG_BYTES: usize = 16;
pub const OVERHEAD_BYTES: usize = NONCE_BYTES + TAG_BYTES;

/// Borrowed view of a parsed envelope.
pub struct EnvelopeParts<'a> {
    pub nonce: &'a [u8; NONCE_BYTES],
    /// Ciphertext with the trailing GCM tag still appended, as `aes-gcm`
    /// expects for its combined decrypt call.
    pub sealed: &'a [u8],
}

pub fn decode(envelope: &[u8]) -> Result<EnvelopeParts<'_>, CryptoError> {
    if envelope.len() < OVERHEAD_BYTES {
        return Err(CryptoError::Authentication);
    }
    let nonce: &[u8; NONCE_BYTES] = envelope[..NONCE_BYTES]
        .try_into()
        .map_err(|_| CryptoError::Authentication)?;
    Ok(EnvelopeParts {
        nonce,
        sealed: &envelope[NONCE_BYTES..],
    })
}

pub fn encode(nonce: &[u8; NONCE_BYTES], sealed: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(NONCE_BYTES + sealed.len());
    out.extend_from_slice(nonce);
    out.extend_from_slice(sealed);
    out
}
