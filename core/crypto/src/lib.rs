//! Cryptographic primitives for Strongroom.
//!
//! This module provides:
//! - Key derivation using Argon2id
//! - Authenticated encryption using ChaCha20-Poly1305
//! - Secure key management with automatic zeroization
//! - The sealed-blob wire format for encrypted fields at rest
//!
//! # Security Guarantees
//! - All key material is automatically zeroized on drop
//! - No plaintext or key material is ever logged
//! - Decryption failures are uniform across causes

pub mod aead;
pub mod kdf;
pub mod keys;

pub use aead::{open, open_string, seal, seal_string, SealedBlob, NONCE_SIZE, TAG_SIZE};
pub use kdf::{create_salt, derive_key, KdfParams};
pub use keys::{MasterKey, Salt, VaultKey, KEY_LENGTH, SALT_LENGTH};
