//! In-memory vault store for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::records::{ItemRecord, NewItem, NewVault, VaultRecord};
use crate::store::VaultStore;
use strongroom_common::{Error, ItemId, Result, VaultId};

#[derive(Default)]
struct Inner {
    vaults: HashMap<VaultId, VaultRecord>,
    items: HashMap<ItemId, ItemRecord>,
}

/// In-memory vault store.
///
/// Useful for testing and development. All data is stored in memory and
/// lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VaultStore for MemoryStore {
    async fn vault_by_name(&self, name: &str) -> Result<Option<VaultRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.vaults.values().find(|v| v.name == name).cloned())
    }

    async fn create_vault(&self, vault: NewVault) -> Result<VaultRecord> {
        let mut inner = self.inner.write().unwrap();

        if inner.vaults.values().any(|v| v.name == vault.name) {
            return Err(Error::VaultAlreadyExists(vault.name));
        }

        let record = VaultRecord {
            id: VaultId::generate(),
            name: vault.name,
            sealed_key: vault.sealed_key,
            salt: vault.salt,
            kdf_params: vault.kdf_params,
            created_at: vault.created_at,
        };
        inner.vaults.insert(record.id, record.clone());

        Ok(record)
    }

    async fn vault_by_id(&self, id: VaultId) -> Result<Option<VaultRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.vaults.get(&id).cloned())
    }

    async fn list_vaults(&self) -> Result<Vec<VaultRecord>> {
        let inner = self.inner.read().unwrap();
        let mut vaults: Vec<_> = inner.vaults.values().cloned().collect();
        vaults.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(vaults)
    }

    async fn delete_vault(&self, id: VaultId) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.vaults.remove(&id);
        // Item cascade is atomic with the vault deletion: both happen
        // under the same write lock.
        inner.items.retain(|_, item| item.vault_id != id);
        Ok(())
    }

    async fn add_item(&self, item: NewItem) -> Result<ItemRecord> {
        let mut inner = self.inner.write().unwrap();

        let record = ItemRecord {
            id: ItemId::generate(),
            vault_id: item.vault_id,
            title: item.title,
            url: item.url,
            username: item.username,
            password: item.password,
            notes: item.notes,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.items.insert(record.id, record.clone());

        Ok(record)
    }

    async fn item(&self, id: ItemId, vault_id: VaultId) -> Result<Option<ItemRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .items
            .get(&id)
            .filter(|item| item.vault_id == vault_id)
            .cloned())
    }

    async fn list_items(&self, vault_id: VaultId) -> Result<Vec<ItemRecord>> {
        let inner = self.inner.read().unwrap();
        let mut items: Vec<_> = inner
            .items
            .values()
            .filter(|item| item.vault_id == vault_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items)
    }
}
