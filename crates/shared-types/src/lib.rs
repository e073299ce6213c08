//! # Shared Types Crate
//!
//! Ledger entities shared by the read-path resolver and the collaborators it
//! consults: the finalized history store and the mempool store.
//!
//! ## Design Principles
//!
//! - **Balances are decimal strings**: never routed through fixed-width
//!   integers, so no magnitude can overflow on the read path.
//! - **Absence is not an error**: store readers answer `Ok(None)` when a row
//!   does not exist; `StoreError` is reserved for backend failures.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
