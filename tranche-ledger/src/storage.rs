//! File-based persistence of a whole token: a bincode state file plus a
//! JSON export of the human-readable surface.

use crate::token::SecurityToken;
use anyhow::Context;
use log::info;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tranche_core::{Amount, TokenEvent};

/// Errors surfaced by the state store.
#[derive(Debug, Error)]
pub enum StateStoreError {
    /// Underlying filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding of the state payload failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Contextual wrapper around a lower-level failure
    #[error(transparent)]
    Context(#[from] anyhow::Error),
}

impl From<bincode::Error> for StateStoreError {
    fn from(err: bincode::Error) -> Self {
        StateStoreError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StateStoreError {
    fn from(err: serde_json::Error) -> Self {
        StateStoreError::Serialization(err.to_string())
    }
}

/// Persist the full token state to `path`.
pub fn save_state(token: &SecurityToken, path: &Path) -> Result<(), StateStoreError> {
    let bytes = bincode::serialize(token)?;
    std::fs::write(path, bytes)?;
    info!("token {} state saved to {}", token.symbol(), path.display());
    Ok(())
}

/// Load a token previously written by [`save_state`].
pub fn load_state(path: &Path) -> Result<SecurityToken, StateStoreError> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading token state from {}", path.display()))?;
    let token = bincode::deserialize(&bytes)?;
    Ok(token)
}

/// JSON-safe summary view. The ledger maps are keyed by composite ids and
/// cannot serialize to JSON objects, so the export covers the metadata,
/// aggregate figures and the event log.
#[derive(Serialize)]
struct StateView<'a> {
    symbol: &'a str,
    name: &'a str,
    decimals: u8,
    paused: bool,
    controllable: bool,
    total_supply: Amount,
    holder_count: usize,
    snapshot_count: u64,
    events: &'a [TokenEvent],
}

/// Export the token's metadata, aggregates and event log as pretty JSON.
pub fn export_state_json(token: &SecurityToken) -> Result<String, StateStoreError> {
    let view = StateView {
        symbol: token.symbol(),
        name: token.name(),
        decimals: token.decimals(),
        paused: token.is_paused(),
        controllable: token.is_controllable(),
        total_supply: token.total_supply(),
        holder_count: token.holder_count(),
        snapshot_count: token.snapshot_count(),
        events: token.events(),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}
