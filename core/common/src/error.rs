//! Common error types for Strongroom.
//!
//! Every operation either succeeds with a well-formed result or fails with
//! exactly one of these variants. `AuthenticationFailure` and `Unauthorized`
//! carry no payload: a wrong password, a corrupted sealed record, and a
//! tampered ciphertext must be indistinguishable to the caller.

use thiserror::Error;

/// Top-level error type for Strongroom operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A vault with the requested name already exists.
    #[error("Vault already exists: {0}")]
    VaultAlreadyExists(String),

    /// No vault with the requested name.
    #[error("Vault not found: {0}")]
    VaultNotFound(String),

    /// Wrong password or corrupted/tampered sealed data.
    ///
    /// Intentionally uniform across causes so the error shape cannot be
    /// used as an oracle.
    #[error("Authentication failure")]
    AuthenticationFailure,

    /// Missing, invalid, or expired session token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found, or owned by a different vault.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed sealed-blob encoding.
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// Unsafe or degenerate parameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
