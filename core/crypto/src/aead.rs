//! Authenticated encryption using ChaCha20-Poly1305.
//!
//! Each encryption produces a [`SealedBlob`] holding a fresh random 96-bit
//! nonce, the ciphertext, and a detached 128-bit authentication tag. The
//! blob serializes to a small JSON object with base64-encoded fields, which
//! is the format persisted by the storage layer.

use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use serde::{Deserialize, Serialize};

use crate::keys::KEY_LENGTH;
use strongroom_common::{Error, Result};

/// Nonce size for ChaCha20-Poly1305 (12 bytes).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

mod b64 {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(&encoded).map_err(serde::de::Error::custom)
    }
}

/// One AEAD encryption result: nonce, ciphertext, and detached tag.
///
/// The ciphertext has the same length as the plaintext (no padding). The
/// serde representation base64-encodes each field so the blob round-trips
/// through any text-based storage column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBlob {
    #[serde(with = "b64")]
    pub nonce: Vec<u8>,
    #[serde(with = "b64")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "b64")]
    pub tag: Vec<u8>,
}

impl SealedBlob {
    /// Serialize to the persisted JSON encoding.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::CorruptData(e.to_string()))
    }

    /// Deserialize from the persisted JSON encoding.
    ///
    /// # Errors
    /// - Returns `CorruptData` on malformed JSON or invalid base64
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::CorruptData(e.to_string()))
    }
}

/// Encrypt plaintext under a 256-bit key.
///
/// # Preconditions
/// - `key` must be exactly KEY_LENGTH bytes
///
/// # Postconditions
/// - Returns a blob with a freshly generated random nonce
/// - Ciphertext length equals plaintext length
///
/// # Errors
/// - Returns `InvalidParameter` if the key length is wrong
///
/// # Security
/// - A new random nonce is drawn from the OS CSPRNG on every call
/// - The key is borrowed and never retained
pub fn seal(key: &[u8], plaintext: &[u8], aad: Option<&[u8]>) -> Result<SealedBlob> {
    if key.len() != KEY_LENGTH {
        return Err(Error::InvalidParameter(format!(
            "Invalid key length: expected {}, got {}",
            KEY_LENGTH,
            key.len()
        )));
    }

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

    let payload = Payload {
        msg: plaintext,
        aad: aad.unwrap_or(&[]),
    };
    let mut combined = cipher
        .encrypt(&nonce, payload)
        .map_err(|_| Error::CorruptData("Encryption failed".to_string()))?;

    // The cipher appends the tag to the ciphertext; store it detached.
    let tag = combined.split_off(combined.len() - TAG_SIZE);

    Ok(SealedBlob {
        nonce: nonce.to_vec(),
        ciphertext: combined,
        tag,
    })
}

/// Decrypt a sealed blob, verifying the tag before releasing plaintext.
///
/// # Errors
/// - Returns `AuthenticationFailure` on tag mismatch, truncated or
///   malformed blob, or wrong key. The failure is uniform across all
///   causes so callers cannot distinguish them.
pub fn open(key: &[u8], blob: &SealedBlob, aad: Option<&[u8]>) -> Result<Vec<u8>> {
    if key.len() != KEY_LENGTH || blob.nonce.len() != NONCE_SIZE || blob.tag.len() != TAG_SIZE {
        return Err(Error::AuthenticationFailure);
    }

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let nonce = Nonce::from_slice(&blob.nonce);

    let mut combined = Vec::with_capacity(blob.ciphertext.len() + TAG_SIZE);
    combined.extend_from_slice(&blob.ciphertext);
    combined.extend_from_slice(&blob.tag);

    let payload = Payload {
        msg: &combined,
        aad: aad.unwrap_or(&[]),
    };
    cipher
        .decrypt(nonce, payload)
        .map_err(|_| Error::AuthenticationFailure)
}

/// Encrypt a UTF-8 string. Carries no semantics beyond [`seal`].
pub fn seal_string(key: &[u8], plaintext: &str, aad: Option<&[u8]>) -> Result<SealedBlob> {
    seal(key, plaintext.as_bytes(), aad)
}

/// Decrypt a sealed blob into a UTF-8 string.
///
/// Invalid UTF-8 after a successful tag check is treated the same as any
/// other decryption failure.
pub fn open_string(key: &[u8], blob: &SealedBlob, aad: Option<&[u8]>) -> Result<String> {
    let plaintext = open(key, blob, aad)?;
    String::from_utf8(plaintext).map_err(|_| Error::AuthenticationFailure)
}
