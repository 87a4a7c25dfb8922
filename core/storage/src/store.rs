//! Vault store trait definition.

use async_trait::async_trait;

use crate::records::{ItemRecord, NewItem, NewVault, VaultRecord};
use strongroom_common::{ItemId, Result, VaultId};

/// Persistence contract for vault and item records.
///
/// Implementations may suspend on I/O; every method is a single
/// all-or-nothing unit. Callers hold no lock across these calls.
#[async_trait]
pub trait VaultStore: Send + Sync {
    /// Look up a vault by its unique name.
    async fn vault_by_name(&self, name: &str) -> Result<Option<VaultRecord>>;

    /// Create a vault record, assigning its id.
    ///
    /// # Errors
    /// - `VaultAlreadyExists` if the name is taken
    async fn create_vault(&self, vault: NewVault) -> Result<VaultRecord>;

    /// Look up a vault by id.
    async fn vault_by_id(&self, id: VaultId) -> Result<Option<VaultRecord>>;

    /// List all vault records.
    async fn list_vaults(&self) -> Result<Vec<VaultRecord>>;

    /// Delete a vault record and, atomically, all items it owns.
    ///
    /// Deleting a non-existent vault is not an error.
    async fn delete_vault(&self, id: VaultId) -> Result<()>;

    /// Create an item record, assigning its id and creation timestamp.
    async fn add_item(&self, item: NewItem) -> Result<ItemRecord>;

    /// Look up an item by id, scoped to one vault.
    ///
    /// An item owned by a different vault is reported as absent.
    async fn item(&self, id: ItemId, vault_id: VaultId) -> Result<Option<ItemRecord>>;

    /// List all items owned by one vault.
    async fn list_items(&self, vault_id: VaultId) -> Result<Vec<ItemRecord>>;
}
