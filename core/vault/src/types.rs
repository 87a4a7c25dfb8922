//! Data-transfer types exposed to the transport layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use strongroom_common::{ItemId, VaultId};

/// Input for creating an item.
///
/// A missing or blank password is synthesized by the password generator.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItemInput {
    pub title: String,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Item listing entry: metadata only, no decrypted fields.
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub id: ItemId,
    pub title: String,
    pub url: String,
}

/// Fully decrypted item returned by a single-item lookup.
#[derive(Debug, Clone, Serialize)]
pub struct ItemDetails {
    pub id: ItemId,
    pub title: String,
    pub url: String,
    pub username: String,
    pub password: String,
}

/// Vault catalogue entry.
#[derive(Debug, Clone, Serialize)]
pub struct VaultSummary {
    pub id: VaultId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
