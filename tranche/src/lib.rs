//! Partitioned regulated-security token ledger.
//!
//! This crate re-exports all the components of the tranche system.

pub use tranche_core::*;
pub use tranche_ledger::*;
