//! Persisted record types for vaults and items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use strongroom_common::{ItemId, VaultId};
use strongroom_crypto::{KdfParams, Salt, SealedBlob};

/// A vault record as persisted by the storage backend.
///
/// The vault key appears only in sealed form; it is recoverable solely by
/// deriving the correct master key from the stored salt and cost parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultRecord {
    pub id: VaultId,
    /// Unique across all vaults.
    pub name: String,
    /// Vault key wrapped under the password-derived master key.
    pub sealed_key: SealedBlob,
    pub salt: Salt,
    pub kdf_params: KdfParams,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a vault record; the backend assigns the id.
#[derive(Debug, Clone)]
pub struct NewVault {
    pub name: String,
    pub sealed_key: SealedBlob,
    pub salt: Salt,
    pub kdf_params: KdfParams,
    pub created_at: DateTime<Utc>,
}

/// An item record as persisted by the storage backend.
///
/// Title and URL are stored in the clear; username, password, and notes are
/// each an independently sealed blob under the owning vault's key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub vault_id: VaultId,
    pub title: String,
    pub url: String,
    pub username: SealedBlob,
    pub password: SealedBlob,
    pub notes: SealedBlob,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating an item record; the backend assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub vault_id: VaultId,
    pub title: String,
    pub url: String,
    pub username: SealedBlob,
    pub password: SealedBlob,
    pub notes: SealedBlob,
}
