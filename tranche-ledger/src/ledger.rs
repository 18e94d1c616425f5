//! The partitioned balance and supply store, with the primitive mutation
//! algorithms every value-moving operation lowers to.
//!
//! Invariants maintained by every primitive:
//!
//! - `sum over partitions of balance(p, h) == total(h)` for every holder
//! - `sum over holders of balance(p, h) == supply_by_partition(p)`
//! - `sum over partitions of supply_by_partition(p) == supply`
//! - the partitions-of-holder index lists exactly the partitions with a
//!   nonzero balance, in first-credit order
//!
//! Primitives are all-or-nothing: every new value is computed and checked
//! before any field is written.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tranche_core::{AccountId, Amount, PartitionId, TokenError};

/// Balances, supplies, partition index and operator relations of one token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartitionedLedger {
    /// Balance per (partition, holder). Keyed by the pair for O(1) lookup.
    balances: HashMap<(PartitionId, AccountId), Amount>,
    /// Holder totals, kept in sync for O(1) total-balance reads.
    totals: HashMap<AccountId, Amount>,
    supply: Amount,
    supply_by_partition: HashMap<PartitionId, Amount>,
    /// Partitions with nonzero balance per holder, in first-credit order.
    partitions_of: HashMap<AccountId, Vec<PartitionId>>,
    /// Global operator relation: holder -> operators for all partitions.
    operators: HashMap<AccountId, HashSet<AccountId>>,
    /// Partition-scoped operator relation.
    operators_by_partition: HashMap<(PartitionId, AccountId), HashSet<AccountId>>,
}

impl PartitionedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // --- queries ---

    pub fn balance_of(&self, holder: &AccountId) -> Amount {
        self.totals.get(holder).copied().unwrap_or(Amount::ZERO)
    }

    pub fn balance_of_by_partition(&self, partition: &PartitionId, holder: &AccountId) -> Amount {
        self.balances
            .get(&(*partition, *holder))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Partitions the holder currently has nonzero balance in, in
    /// first-credit order.
    pub fn partitions_of(&self, holder: &AccountId) -> Vec<PartitionId> {
        self.partitions_of.get(holder).cloned().unwrap_or_default()
    }

    pub fn total_supply(&self) -> Amount {
        self.supply
    }

    pub fn total_supply_by_partition(&self, partition: &PartitionId) -> Amount {
        self.supply_by_partition
            .get(partition)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// All holder accounts with a nonzero total balance.
    pub fn holders(&self) -> impl Iterator<Item = &AccountId> {
        self.totals
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(holder, _)| holder)
    }

    // --- operator relations ---

    pub fn authorize_operator(&mut self, holder: AccountId, operator: AccountId) {
        self.operators.entry(holder).or_default().insert(operator);
    }

    pub fn revoke_operator(&mut self, holder: &AccountId, operator: &AccountId) {
        if let Some(operators) = self.operators.get_mut(holder) {
            operators.remove(operator);
        }
    }

    pub fn authorize_operator_by_partition(
        &mut self,
        partition: PartitionId,
        holder: AccountId,
        operator: AccountId,
    ) {
        self.operators_by_partition
            .entry((partition, holder))
            .or_default()
            .insert(operator);
    }

    pub fn revoke_operator_by_partition(
        &mut self,
        partition: &PartitionId,
        holder: &AccountId,
        operator: &AccountId,
    ) {
        if let Some(operators) = self.operators_by_partition.get_mut(&(*partition, *holder)) {
            operators.remove(operator);
        }
    }

    /// Whether `operator` may act for `holder` on every partition.
    pub fn is_operator(&self, operator: &AccountId, holder: &AccountId) -> bool {
        operator == holder
            || self
                .operators
                .get(holder)
                .is_some_and(|operators| operators.contains(operator))
    }

    /// Whether `operator` may act for `holder` on `partition`: the holder
    /// itself, a global operator, or a partition-scoped operator.
    pub fn is_operator_for_partition(
        &self,
        partition: &PartitionId,
        operator: &AccountId,
        holder: &AccountId,
    ) -> bool {
        self.is_operator(operator, holder)
            || self
                .operators_by_partition
                .get(&(*partition, *holder))
                .is_some_and(|operators| operators.contains(operator))
    }

    // --- mutation primitives ---

    /// Credit `amount` into `(partition, holder)` and increment the
    /// supplies.
    pub fn issue(
        &mut self,
        partition: PartitionId,
        holder: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let new_supply = self
            .supply
            .checked_add(amount)
            .ok_or(TokenError::MaxSupplyReached { max: Amount::MAX })?;
        let new_partition_supply = self
            .total_supply_by_partition(&partition)
            .checked_add(amount)
            .ok_or(TokenError::MaxSupplyReachedForPartition {
                partition,
                max: Amount::MAX,
            })?;
        let (new_balance, new_total) = self.credited(&partition, &holder, amount)?;

        self.supply = new_supply;
        self.supply_by_partition
            .insert(partition, new_partition_supply);
        self.write_balance(partition, holder, new_balance, new_total);
        Ok(())
    }

    /// Move `amount` of `(partition, from)` to `(partition, to)`.
    pub fn transfer(
        &mut self,
        partition: PartitionId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if from == to {
            // Self-transfer changes nothing, but still requires the funds.
            let available = self.balance_of_by_partition(&partition, &from);
            if available < amount {
                return Err(TokenError::InsufficientBalance {
                    holder: from,
                    partition,
                    available,
                    required: amount,
                });
            }
            return Ok(());
        }
        let (debited_balance, debited_total) = self.debited(&partition, &from, amount)?;
        let (credited_balance, credited_total) = self.credited(&partition, &to, amount)?;

        self.write_balance(partition, from, debited_balance, debited_total);
        self.write_balance(partition, to, credited_balance, credited_total);
        Ok(())
    }

    /// Debit `amount` from `(partition, holder)` and decrement the
    /// supplies.
    pub fn redeem(
        &mut self,
        partition: PartitionId,
        holder: AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let (new_balance, new_total) = self.debited(&partition, &holder, amount)?;
        // Supplies cannot underflow while the balance invariants hold.
        let new_supply = self.supply.saturating_sub(amount);
        let new_partition_supply = self
            .total_supply_by_partition(&partition)
            .saturating_sub(amount);

        self.supply = new_supply;
        self.supply_by_partition
            .insert(partition, new_partition_supply);
        self.write_balance(partition, holder, new_balance, new_total);
        Ok(())
    }

    /// Compute the post-credit balance and total without writing.
    fn credited(
        &self,
        partition: &PartitionId,
        holder: &AccountId,
        amount: Amount,
    ) -> Result<(Amount, Amount), TokenError> {
        let overflow = || TokenError::MaxSupplyReached { max: Amount::MAX };
        let new_balance = self
            .balance_of_by_partition(partition, holder)
            .checked_add(amount)
            .ok_or_else(overflow)?;
        let new_total = self
            .balance_of(holder)
            .checked_add(amount)
            .ok_or_else(overflow)?;
        Ok((new_balance, new_total))
    }

    /// Compute the post-debit balance and total without writing.
    fn debited(
        &self,
        partition: &PartitionId,
        holder: &AccountId,
        amount: Amount,
    ) -> Result<(Amount, Amount), TokenError> {
        let available = self.balance_of_by_partition(partition, holder);
        let new_balance =
            available
                .checked_sub(amount)
                .ok_or(TokenError::InsufficientBalance {
                    holder: *holder,
                    partition: *partition,
                    available,
                    required: amount,
                })?;
        let new_total = self.balance_of(holder).saturating_sub(amount);
        Ok((new_balance, new_total))
    }

    /// Write a holder's partition balance and total, maintaining the
    /// partitions-of index.
    fn write_balance(
        &mut self,
        partition: PartitionId,
        holder: AccountId,
        new_balance: Amount,
        new_total: Amount,
    ) {
        let was_zero = self
            .balance_of_by_partition(&partition, &holder)
            .is_zero();
        self.balances.insert((partition, holder), new_balance);
        self.totals.insert(holder, new_total);

        if was_zero && !new_balance.is_zero() {
            let index = self.partitions_of.entry(holder).or_default();
            if !index.contains(&partition) {
                index.push(partition);
            }
        } else if !was_zero && new_balance.is_zero() {
            if let Some(index) = self.partitions_of.get_mut(&holder) {
                index.retain(|p| p != &partition);
            }
        }
    }
}
