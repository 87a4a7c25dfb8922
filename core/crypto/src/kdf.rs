//! Key derivation using Argon2id.
//!
//! Argon2id is a memory-hard password hashing function that provides
//! resistance to both GPU and time-memory trade-off attacks.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

use crate::keys::{MasterKey, Salt, KEY_LENGTH};
use strongroom_common::{Error, Result};

/// Minimum memory cost in KiB (8 MiB). Anything lower defeats the point of
/// a memory-hard function.
pub const MIN_MEMORY_COST: u32 = 8192;

/// Minimum number of iterations.
pub const MIN_TIME_COST: u32 = 1;

/// Minimum degree of parallelism.
pub const MIN_PARALLELISM: u32 = 1;

/// Parameters for Argon2id key derivation.
///
/// Stored alongside the vault record so the master key can be re-derived
/// with the exact settings used at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB (e.g., 65536 = 64 MiB).
    pub memory_cost: u32,
    /// Number of iterations.
    pub time_cost: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl KdfParams {
    /// Create parameters suitable for interactive use.
    ///
    /// These parameters provide a balance between security and usability,
    /// targeting well under a second of derivation time.
    pub fn interactive() -> Self {
        Self {
            memory_cost: 65536, // 64 MiB
            time_cost: 2,
            parallelism: 2,
        }
    }

    /// Create low-cost parameters for tests.
    ///
    /// Sits at the safety floor; never use outside tests.
    pub fn fast() -> Self {
        Self {
            memory_cost: MIN_MEMORY_COST,
            time_cost: MIN_TIME_COST,
            parallelism: MIN_PARALLELISM,
        }
    }

    /// Validate that the parameters are at or above the safety floor.
    ///
    /// # Errors
    /// - Returns `InvalidParameter` for degenerate cost settings
    pub fn validate(&self) -> Result<()> {
        if self.memory_cost < MIN_MEMORY_COST {
            return Err(Error::InvalidParameter(format!(
                "Memory cost {} KiB below minimum {} KiB",
                self.memory_cost, MIN_MEMORY_COST
            )));
        }
        if self.time_cost < MIN_TIME_COST {
            return Err(Error::InvalidParameter(format!(
                "Time cost {} below minimum {}",
                self.time_cost, MIN_TIME_COST
            )));
        }
        if self.parallelism < MIN_PARALLELISM {
            return Err(Error::InvalidParameter(format!(
                "Parallelism {} below minimum {}",
                self.parallelism, MIN_PARALLELISM
            )));
        }
        // Argon2 requires at least 8 KiB per lane
        if self.memory_cost < 8 * self.parallelism {
            return Err(Error::InvalidParameter(
                "Memory cost too low for requested parallelism".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Generate cryptographically secure random salt bytes.
pub fn create_salt(size: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut salt = vec![0u8; size];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a master key from a password and salt using Argon2id.
///
/// # Preconditions
/// - `password` must not be empty
/// - `params` must be at or above the safety floor
///
/// # Postconditions
/// - Returns a MasterKey derived from the password
/// - The derived key is deterministic given the same inputs
///
/// # Errors
/// - Returns `InvalidParameter` if the password is empty or the cost
///   parameters are unsafe
///
/// # Security
/// - Password is not stored or logged
/// - The derived key zeroizes on drop
pub fn derive_key(password: &[u8], salt: &Salt, params: &KdfParams) -> Result<MasterKey> {
    if password.is_empty() {
        return Err(Error::InvalidParameter(
            "Password cannot be empty".to_string(),
        ));
    }
    params.validate()?;

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_LENGTH),
    )
    .map_err(|e| Error::InvalidParameter(format!("Invalid KDF parameters: {}", e)))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key_bytes = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(password, salt.as_bytes(), &mut key_bytes)
        .map_err(|e| Error::InvalidParameter(format!("Key derivation failed: {}", e)))?;

    Ok(MasterKey::from_bytes(key_bytes))
}
