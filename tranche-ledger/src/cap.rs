//! Global and per-partition maximum-supply ceilings.

use crate::traits::CapCheck;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tranche_core::{Amount, PartitionId, TokenError};

/// Supply ceilings. A value of zero means "uncapped" for that scope.
///
/// Enforcement happens on the issuance path only; caps are not re-checked
/// retroactively when balances move between partitions or holders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cap {
    max_supply: Amount,
    max_supply_by_partition: HashMap<PartitionId, Amount>,
}

impl Cap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the global ceiling, returning the previous value.
    pub fn set_max_supply(&mut self, value: Amount) -> Amount {
        std::mem::replace(&mut self.max_supply, value)
    }

    /// Set a partition ceiling, returning the previous value.
    pub fn set_max_supply_by_partition(
        &mut self,
        partition: PartitionId,
        value: Amount,
    ) -> Amount {
        self.max_supply_by_partition
            .insert(partition, value)
            .unwrap_or(Amount::ZERO)
    }

    pub fn max_supply(&self) -> Amount {
        self.max_supply
    }

    pub fn max_supply_by_partition(&self, partition: &PartitionId) -> Amount {
        self.max_supply_by_partition
            .get(partition)
            .copied()
            .unwrap_or(Amount::ZERO)
    }
}

impl CapCheck for Cap {
    fn validate_issuance(
        &self,
        new_total_supply: Amount,
        partition: PartitionId,
        new_partition_supply: Amount,
    ) -> Result<(), TokenError> {
        if !self.max_supply.is_zero() && new_total_supply > self.max_supply {
            return Err(TokenError::MaxSupplyReached {
                max: self.max_supply,
            });
        }
        // The partition ceiling is independent of the global one.
        let partition_max = self.max_supply_by_partition(&partition);
        if !partition_max.is_zero() && new_partition_supply > partition_max {
            return Err(TokenError::MaxSupplyReachedForPartition {
                partition,
                max: partition_max,
            });
        }
        Ok(())
    }
}
