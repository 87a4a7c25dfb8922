//! Vault orchestrator.
//!
//! Ties the key-derivation and envelope-crypto engines to the storage
//! contract and the session authority. Every operation resolves its session
//! up front (releasing the authority's lock) before any storage call, and
//! classifies each internal failure into exactly one taxonomy member.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::password::{generate_password, DEFAULT_PASSWORD_LENGTH};
use crate::session::{SessionAuthority, SessionToken};
use crate::types::{ItemDetails, ItemSummary, NewItemInput, VaultSummary};
use strongroom_common::{Error, ItemId, Result, VaultId};
use strongroom_crypto::{
    derive_key, open_string, seal, seal_string, KdfParams, Salt, VaultKey, SALT_LENGTH,
};
use strongroom_storage::{NewItem, NewVault, VaultStore};

/// How long an unlock session stays valid.
pub const SESSION_TTL: Duration = Duration::from_secs(5 * 60);

/// Public-facing vault core.
///
/// One vault's state machine is Locked → Unlocked(expiry) → Locked, with no
/// intermediate states. Concurrent unlocks of the same vault produce
/// independent sessions; locking one does not affect the others.
pub struct VaultService {
    store: Arc<dyn VaultStore>,
    sessions: Arc<SessionAuthority>,
    kdf_params: KdfParams,
    session_ttl: Duration,
    password_length: usize,
}

impl VaultService {
    /// Create a service with production KDF parameters and the default TTL.
    pub fn new(store: Arc<dyn VaultStore>, sessions: Arc<SessionAuthority>) -> Self {
        Self {
            store,
            sessions,
            kdf_params: KdfParams::interactive(),
            session_ttl: SESSION_TTL,
            password_length: DEFAULT_PASSWORD_LENGTH,
        }
    }

    /// Override the KDF cost parameters used for new vaults.
    pub fn with_kdf_params(mut self, params: KdfParams) -> Self {
        self.kdf_params = params;
        self
    }

    /// Override the session time to live.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Create a new vault protected by `master_password`.
    ///
    /// Derives a master key from the password, generates a fresh random
    /// vault key, and persists the vault key sealed under the master key.
    /// Neither key survives this call in memory.
    ///
    /// # Errors
    /// - `VaultAlreadyExists` if the name is taken
    /// - `InvalidParameter` for an empty name or password
    pub async fn initialize_vault(&self, name: &str, master_password: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidParameter(
                "Vault name cannot be empty".to_string(),
            ));
        }
        if self.store.vault_by_name(name).await?.is_some() {
            return Err(Error::VaultAlreadyExists(name.to_string()));
        }

        let salt = Salt::generate(SALT_LENGTH);
        let master_key = derive_key(master_password.as_bytes(), &salt, &self.kdf_params)?;
        let vault_key = VaultKey::generate();

        let sealed_key = seal(master_key.as_bytes(), vault_key.as_bytes(), None)?;

        self.store
            .create_vault(NewVault {
                name: name.to_string(),
                sealed_key,
                salt,
                kdf_params: self.kdf_params.clone(),
                created_at: Utc::now(),
            })
            .await?;

        // master_key and vault_key zeroize on drop here, on every path
        info!(vault = %name, "Vault created");
        Ok(())
    }

    /// Unlock a vault, returning a bearer token for its session.
    ///
    /// # Errors
    /// - `VaultNotFound` if no vault has that name
    /// - `AuthenticationFailure` for a wrong password or a corrupted sealed
    ///   record; the two are intentionally indistinguishable, and no session
    ///   is issued in either case
    pub async fn unlock_vault(&self, name: &str, master_password: &str) -> Result<SessionToken> {
        let record = self
            .store
            .vault_by_name(name)
            .await?
            .ok_or_else(|| Error::VaultNotFound(name.to_string()))?;

        let master_key = derive_key(master_password.as_bytes(), &record.salt, &record.kdf_params)
            .map_err(|_| Error::AuthenticationFailure)?;

        let key_bytes = Zeroizing::new(strongroom_crypto::open(
            master_key.as_bytes(),
            &record.sealed_key,
            None,
        )?);
        let vault_key =
            VaultKey::from_slice(&key_bytes).map_err(|_| Error::AuthenticationFailure)?;

        let token = self
            .sessions
            .create_session(vault_key, self.session_ttl, record.id);

        debug!(vault = %name, "Vault unlocked");
        Ok(token)
    }

    /// End a session. Unknown or already-expired tokens are not an error.
    pub fn lock_vault(&self, token: &SessionToken) {
        self.sessions.remove_session(token);
    }

    /// Create an item in the vault bound to `token`.
    ///
    /// The owning vault id comes from the session, never from caller input.
    /// A blank password is replaced with a generated one. Username,
    /// password, and notes are sealed independently, each under its own
    /// fresh nonce.
    ///
    /// # Errors
    /// - `Unauthorized` if the token is invalid or expired
    pub async fn create_item(&self, token: &SessionToken, input: NewItemInput) -> Result<ItemId> {
        let (vault_key, vault_id) = self.authorize(token)?;

        // Trim only to decide blankness; a supplied password is sealed as given.
        let password = match input.password {
            Some(password) if !password.trim().is_empty() => password,
            _ => generate_password(self.password_length)?,
        };
        let username = input.username.unwrap_or_default();

        let key = vault_key.as_bytes();
        let item = NewItem {
            vault_id,
            title: input.title,
            url: input.url,
            username: seal_string(key, &username, None)?,
            password: seal_string(key, &password, None)?,
            notes: seal_string(key, "", None)?,
        };

        let record = self.store.add_item(item).await?;

        debug!(item = %record.id, "Item created");
        Ok(record.id)
    }

    /// Fetch and decrypt one item from the vault bound to `token`.
    ///
    /// # Errors
    /// - `Unauthorized` if the token is invalid or expired
    /// - `NotFound` if no such item exists in the bound vault; an item owned
    ///   by a different vault behaves identically to a missing one
    /// - `CorruptData` if a stored blob no longer decrypts under the vault key
    pub async fn get_item(&self, token: &SessionToken, id: ItemId) -> Result<ItemDetails> {
        let (vault_key, vault_id) = self.authorize(token)?;

        let record = self
            .store
            .item(id, vault_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Item {}", id)))?;

        let key = vault_key.as_bytes();
        let username = open_string(key, &record.username, None)
            .map_err(|_| Error::CorruptData("Sealed item field".to_string()))?;
        let password = open_string(key, &record.password, None)
            .map_err(|_| Error::CorruptData("Sealed item field".to_string()))?;

        Ok(ItemDetails {
            id: record.id,
            title: record.title,
            url: record.url,
            username,
            password,
        })
    }

    /// List items in the vault bound to `token`.
    ///
    /// Returns metadata only; sensitive fields are never decrypted for a
    /// listing.
    pub async fn list_items(&self, token: &SessionToken) -> Result<Vec<ItemSummary>> {
        let (_, vault_id) = self.authorize(token)?;

        let items = self.store.list_items(vault_id).await?;
        Ok(items
            .into_iter()
            .map(|item| ItemSummary {
                id: item.id,
                title: item.title,
                url: item.url,
            })
            .collect())
    }

    /// List all vaults in the catalogue.
    pub async fn list_vaults(&self, token: &SessionToken) -> Result<Vec<VaultSummary>> {
        self.authorize(token)?;

        let vaults = self.store.list_vaults().await?;
        Ok(vaults
            .into_iter()
            .map(|vault| VaultSummary {
                id: vault.id,
                name: vault.name,
                created_at: vault.created_at,
            })
            .collect())
    }

    /// Delete a vault record. The store removes its items atomically.
    ///
    /// # Errors
    /// - `Unauthorized` if the token is invalid or expired
    /// - `NotFound` if no vault has that id
    pub async fn delete_vault(&self, token: &SessionToken, vault_id: VaultId) -> Result<()> {
        self.authorize(token)?;

        if self.store.vault_by_id(vault_id).await?.is_none() {
            return Err(Error::NotFound(format!("Vault {}", vault_id)));
        }
        self.store.delete_vault(vault_id).await?;

        info!(vault = %vault_id, "Vault deleted");
        Ok(())
    }

    /// Resolve a token before any storage call.
    ///
    /// Returns owned values, so the session authority's lock is released
    /// before the caller suspends on I/O.
    fn authorize(&self, token: &SessionToken) -> Result<(VaultKey, VaultId)> {
        self.sessions.resolve(token).ok_or(Error::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strongroom_storage::MemoryStore;

    fn test_service() -> VaultService {
        let store = Arc::new(MemoryStore::new());
        let sessions = Arc::new(SessionAuthority::new());
        VaultService::new(store, sessions).with_kdf_params(KdfParams::fast())
    }

    fn email_item() -> NewItemInput {
        NewItemInput {
            title: "Email".to_string(),
            url: "mail.example.com".to_string(),
            username: Some("a@b.com".to_string()),
            password: Some("hunter2!".to_string()),
        }
    }

    #[tokio::test]
    async fn test_initialize_then_duplicate_fails() {
        let service = test_service();

        service.initialize_vault("vault1", "Passw0rd!").await.unwrap();

        let result = service.initialize_vault("vault1", "other").await;
        assert!(matches!(result, Err(Error::VaultAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_unlock_unknown_vault() {
        let service = test_service();

        let result = service.unlock_vault("missing", "pw").await;
        assert!(matches!(result, Err(Error::VaultNotFound(_))));
    }

    #[tokio::test]
    async fn test_wrong_password_never_yields_token() {
        let service = test_service();
        service.initialize_vault("vault1", "Passw0rd!").await.unwrap();

        let result = service.unlock_vault("vault1", "wrong-password").await;
        assert!(matches!(result, Err(Error::AuthenticationFailure)));
    }

    #[tokio::test]
    async fn test_item_roundtrip() {
        let service = test_service();
        service.initialize_vault("vault1", "Passw0rd!").await.unwrap();
        let token = service.unlock_vault("vault1", "Passw0rd!").await.unwrap();

        let id = service.create_item(&token, email_item()).await.unwrap();
        let details = service.get_item(&token, id).await.unwrap();

        assert_eq!(details.title, "Email");
        assert_eq!(details.url, "mail.example.com");
        assert_eq!(details.username, "a@b.com");
        assert_eq!(details.password, "hunter2!");
    }

    #[tokio::test]
    async fn test_blank_password_is_generated() {
        let service = test_service();
        service.initialize_vault("vault1", "Passw0rd!").await.unwrap();
        let token = service.unlock_vault("vault1", "Passw0rd!").await.unwrap();

        let mut input = email_item();
        input.password = Some("".to_string());
        let id = service.create_item(&token, input).await.unwrap();

        let details = service.get_item(&token, id).await.unwrap();
        let password = &details.password;
        assert_eq!(password.len(), DEFAULT_PASSWORD_LENGTH);
        assert!(password.chars().any(|c| c.is_ascii_uppercase()));
        assert!(password.chars().any(|c| c.is_ascii_lowercase()));
        assert!(password.chars().any(|c| c.is_ascii_digit()));
        assert!(password.chars().any(|c| !c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_supplied_password_stored_verbatim() {
        let service = test_service();
        service.initialize_vault("vault1", "Passw0rd!").await.unwrap();
        let token = service.unlock_vault("vault1", "Passw0rd!").await.unwrap();

        // Edge whitespace is part of the secret and must survive the
        // round trip unaltered.
        let mut input = email_item();
        input.password = Some(" hunter2 ".to_string());
        let id = service.create_item(&token, input).await.unwrap();

        let details = service.get_item(&token, id).await.unwrap();
        assert_eq!(details.password, " hunter2 ");
    }

    #[tokio::test]
    async fn test_whitespace_only_password_is_generated() {
        let service = test_service();
        service.initialize_vault("vault1", "Passw0rd!").await.unwrap();
        let token = service.unlock_vault("vault1", "Passw0rd!").await.unwrap();

        let mut input = email_item();
        input.password = Some("   ".to_string());
        let id = service.create_item(&token, input).await.unwrap();

        let details = service.get_item(&token, id).await.unwrap();
        assert_eq!(details.password.len(), DEFAULT_PASSWORD_LENGTH);
        assert!(!details.password.chars().any(|c| c.is_whitespace()));
    }

    #[tokio::test]
    async fn test_list_items_metadata_only() {
        let service = test_service();
        service.initialize_vault("vault1", "Passw0rd!").await.unwrap();
        let token = service.unlock_vault("vault1", "Passw0rd!").await.unwrap();

        service.create_item(&token, email_item()).await.unwrap();

        let items = service.list_items(&token).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Email");
        assert_eq!(items[0].url, "mail.example.com");
    }

    #[tokio::test]
    async fn test_cross_vault_isolation() {
        let service = test_service();
        service.initialize_vault("vault-a", "password-a").await.unwrap();
        service.initialize_vault("vault-b", "password-b").await.unwrap();

        let token_a = service.unlock_vault("vault-a", "password-a").await.unwrap();
        let token_b = service.unlock_vault("vault-b", "password-b").await.unwrap();

        let id = service.create_item(&token_a, email_item()).await.unwrap();

        // The other vault's token sees the item as non-existent
        let result = service.get_item(&token_b, id).await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        assert!(service.list_items(&token_b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lock_invalidates_only_its_session() {
        let service = test_service();
        service.initialize_vault("vault1", "Passw0rd!").await.unwrap();

        let token1 = service.unlock_vault("vault1", "Passw0rd!").await.unwrap();
        let token2 = service.unlock_vault("vault1", "Passw0rd!").await.unwrap();

        service.lock_vault(&token1);

        assert!(matches!(
            service.list_items(&token1).await,
            Err(Error::Unauthorized)
        ));
        // The concurrent session is unaffected
        assert!(service.list_items(&token2).await.is_ok());

        // Locking again is idempotent
        service.lock_vault(&token1);
    }

    #[tokio::test]
    async fn test_expired_session_unauthorized() {
        let store = Arc::new(MemoryStore::new());
        let sessions = Arc::new(SessionAuthority::new());
        let service = VaultService::new(store, sessions)
            .with_kdf_params(KdfParams::fast())
            .with_session_ttl(Duration::from_millis(10));

        service.initialize_vault("vault1", "Passw0rd!").await.unwrap();
        let token = service.unlock_vault("vault1", "Passw0rd!").await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(matches!(
            service.list_items(&token).await,
            Err(Error::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_list_and_delete_vaults() {
        let service = test_service();
        service.initialize_vault("vault-a", "password-a").await.unwrap();
        service.initialize_vault("vault-b", "password-b").await.unwrap();

        let token = service.unlock_vault("vault-a", "password-a").await.unwrap();

        let vaults = service.list_vaults(&token).await.unwrap();
        assert_eq!(vaults.len(), 2);
        let vault_b = vaults.iter().find(|v| v.name == "vault-b").unwrap();

        service.delete_vault(&token, vault_b.id).await.unwrap();
        assert_eq!(service.list_vaults(&token).await.unwrap().len(), 1);

        let result = service.delete_vault(&token, vault_b.id).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let service = test_service();

        service.initialize_vault("vault1", "Passw0rd!").await.unwrap();
        assert!(matches!(
            service.initialize_vault("vault1", "anything").await,
            Err(Error::VaultAlreadyExists(_))
        ));

        let token = service.unlock_vault("vault1", "Passw0rd!").await.unwrap();

        let mut input = email_item();
        input.password = None;
        let id = service.create_item(&token, input).await.unwrap();

        let details = service.get_item(&token, id).await.unwrap();
        assert_eq!(details.username, "a@b.com");
        assert_eq!(details.password.len(), DEFAULT_PASSWORD_LENGTH);
    }
}
