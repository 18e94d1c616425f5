//! The single halt switch checked by all state-changing operations.

use crate::traits::PauseState;
use serde::{Deserialize, Serialize};
use tranche_core::TokenError;

/// Pause switch. Read-only queries are never affected by it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pause {
    paused: bool,
}

impl Pause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Halt state-changing operations. Pausing an already-paused token
    /// fails.
    pub fn pause(&mut self) -> Result<(), TokenError> {
        if self.paused {
            return Err(TokenError::TokenIsPaused);
        }
        self.paused = true;
        Ok(())
    }

    /// Resume state-changing operations. Unpausing an unpaused token fails.
    pub fn unpause(&mut self) -> Result<(), TokenError> {
        if !self.paused {
            return Err(TokenError::TokenIsUnpaused);
        }
        self.paused = false;
        Ok(())
    }
}

impl PauseState for Pause {
    fn is_paused(&self) -> bool {
        self.paused
    }
}
