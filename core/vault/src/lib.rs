//! Vault engine for Strongroom.
//!
//! This module provides:
//! - Vault creation and unlock with envelope-encrypted vault keys
//! - Session-scoped authorization binding decryption keys to bearer tokens
//! - Per-item field encryption with strict vault isolation
//! - Strong password synthesis for items created without one
//!
//! # Architecture
//! The vault module sits between the transport layer and the storage
//! contract, handling all key management and encryption transparently.

pub mod password;
pub mod service;
pub mod session;
pub mod types;

pub use password::{generate_password, DEFAULT_PASSWORD_LENGTH};
pub use service::VaultService;
pub use session::{SessionAuthority, SessionToken};
pub use types::{ItemDetails, ItemSummary, NewItemInput, VaultSummary};
