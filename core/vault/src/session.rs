//! Session-scoped authorization.
//!
//! A session binds a live vault key to an opaque bearer token with a fixed
//! time to live. The authority exclusively owns the raw key bytes for the
//! session's lifetime; entries zeroize their key on removal, and expiry is
//! enforced lazily at access time rather than by a background timer.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

use strongroom_common::VaultId;
use strongroom_crypto::VaultKey;

/// Random bytes per token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Opaque bearer token identifying one session.
///
/// Drawn from the OS CSPRNG; not derived from counters or the wall clock.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Reconstruct a token received from a caller.
    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the token string for handing to a caller.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken([REDACTED])")
    }
}

struct SessionEntry {
    /// Zeroized on drop, so eviction wipes the key on every path.
    vault_key: VaultKey,
    vault_id: VaultId,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Concurrent in-memory session store.
///
/// Explicitly constructed and injected rather than process-global, so tests
/// can run independent instances. Safe for concurrent read/insert/delete
/// from many callers; the internal lock is never held across an await.
#[derive(Default)]
pub struct SessionAuthority {
    sessions: RwLock<HashMap<SessionToken, SessionEntry>>,
}

impl SessionAuthority {
    /// Create an empty authority.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session binding `vault_key` to a fresh token.
    ///
    /// The authority takes ownership of the key; callers retain no copy
    /// unless they explicitly resolve the token later.
    pub fn create_session(
        &self,
        vault_key: VaultKey,
        ttl: Duration,
        vault_id: VaultId,
    ) -> SessionToken {
        let token = SessionToken::generate();
        let entry = SessionEntry {
            vault_key,
            vault_id,
            expires_at: Instant::now() + ttl,
        };

        self.sessions.write().unwrap().insert(token.clone(), entry);
        token
    }

    /// Resolve a token to its bound key and vault id.
    ///
    /// Returns `None` for unknown tokens. An expired entry is removed as a
    /// side effect and reported absent, now and on every later call.
    pub fn resolve(&self, token: &SessionToken) -> Option<(VaultKey, VaultId)> {
        let now = Instant::now();

        {
            let sessions = self.sessions.read().unwrap();
            match sessions.get(token) {
                Some(entry) if !entry.is_expired(now) => {
                    return Some((entry.vault_key.clone(), entry.vault_id));
                }
                Some(_) => {} // expired; fall through to evict
                None => return None,
            }
        }

        // Lazy sweep: re-check under the write lock since another caller
        // may have replaced the entry in between.
        let mut sessions = self.sessions.write().unwrap();
        if let Some(entry) = sessions.get(token) {
            if entry.is_expired(now) {
                sessions.remove(token);
            }
        }
        None
    }

    /// Get the vault key bound to a token, if the session is live.
    pub fn get_key(&self, token: &SessionToken) -> Option<VaultKey> {
        self.resolve(token).map(|(key, _)| key)
    }

    /// Get the vault id bound to a token, if the session is live.
    pub fn get_vault_id(&self, token: &SessionToken) -> Option<VaultId> {
        self.resolve(token).map(|(_, id)| id)
    }

    /// Remove a session. Removing an unknown token is not an error.
    pub fn remove_session(&self, token: &SessionToken) {
        self.sessions.write().unwrap().remove(token);
    }

    /// Drop all expired entries.
    ///
    /// Purely a memory-reclamation aid; lazy eviction in [`resolve`] already
    /// guarantees expired sessions are unobservable.
    ///
    /// [`resolve`]: SessionAuthority::resolve
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.sessions
            .write()
            .unwrap()
            .retain(|_, entry| !entry.is_expired(now));
    }

    /// Number of stored entries, including any not-yet-swept expired ones.
    pub fn session_count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}
