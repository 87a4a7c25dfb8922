//! Storage contract for Strongroom.
//!
//! This module provides a trait-based interface for vault and item
//! persistence and an in-memory implementation for the core's tests.
//!
//! # Design Principles
//! - Backend isolation: no persistence-specific logic in vault or crypto modules
//! - Async operations: a backend may suspend on I/O
//! - Atomic writes: each call is a single all-or-nothing unit; the caller
//!   performs no partial writes of its own

pub mod memory;
pub mod records;
pub mod store;

pub use memory::MemoryStore;
pub use records::{ItemRecord, NewItem, NewVault, VaultRecord};
pub use store::VaultStore;
