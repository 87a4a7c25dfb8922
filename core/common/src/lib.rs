//! Common utilities and types shared across Strongroom modules.
//!
//! This module provides the error taxonomy and the identifier types that
//! every other crate builds on.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ItemId, VaultId};
