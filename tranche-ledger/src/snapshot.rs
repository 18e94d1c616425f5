//! Historical balance materialization, triggered manually or by scheduled
//! corporate-action record dates.
//!
//! The engine keeps an append-only, 1-indexed sequence of snapshots. Each
//! snapshot freezes every partition balance, holder total, and supply at
//! the instant it was taken. Snapshot id 0 is the "no snapshot" sentinel.
//!
//! Scheduled triggering is lazy: record dates are queued when a corporate
//! action is set, and the facade calls [`SnapshotEngine::trigger_scheduled`]
//! at the top of every balance-mutating operation, before the mutation is
//! applied, so a triggered snapshot always reflects pre-mutation state.

use crate::ledger::PartitionedLedger;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tranche_core::{AccountId, Amount, PartitionId, SnapshotId, Timestamp, TokenError};

/// One immutable balance capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Frozen copy of the ledger state at capture time.
    state: PartitionedLedger,
    /// When the snapshot was taken.
    pub taken_at: Timestamp,
    /// Whether the snapshot was materialized by a scheduled record date
    /// rather than a manual request.
    pub scheduled: bool,
}

/// The snapshot store plus the queue of pending scheduled record dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotEngine {
    snapshots: Vec<SnapshotRecord>,
    /// Record dates that have not yet triggered a snapshot. Duplicate dates
    /// collapse; one snapshot serves every record sharing the date.
    pending: BTreeSet<Timestamp>,
}

impl SnapshotEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots taken so far.
    pub fn count(&self) -> u64 {
        self.snapshots.len() as u64
    }

    /// The id of the most recent snapshot, or the null sentinel when none
    /// has been taken.
    pub fn latest_id(&self) -> SnapshotId {
        SnapshotId(self.count())
    }

    /// Record dates still waiting to trigger.
    pub fn pending_record_dates(&self) -> impl Iterator<Item = &Timestamp> {
        self.pending.iter()
    }

    /// Queue a record date for lazy triggering.
    pub fn schedule(&mut self, record_date: Timestamp) {
        self.pending.insert(record_date);
    }

    /// Take a manual snapshot of the current ledger state.
    pub fn take(&mut self, ledger: &PartitionedLedger, now: Timestamp) -> SnapshotId {
        let id = self.push(ledger, now, false);
        info!("snapshot {} taken manually", id);
        id
    }

    /// The pre-mutation hook: if any pending record date has been reached,
    /// materialize one snapshot of the current (pre-mutation) state and
    /// drop every due date from the queue. Returns the new snapshot id when
    /// one was taken.
    pub fn trigger_scheduled(
        &mut self,
        ledger: &PartitionedLedger,
        now: Timestamp,
    ) -> Option<SnapshotId> {
        let due: Vec<Timestamp> = self
            .pending
            .range(..=now)
            .copied()
            .collect();
        if due.is_empty() {
            return None;
        }
        for date in &due {
            self.pending.remove(date);
        }
        let id = self.push(ledger, now, true);
        debug!(
            "snapshot {} triggered by {} scheduled record date(s)",
            id,
            due.len()
        );
        Some(id)
    }

    fn push(&mut self, ledger: &PartitionedLedger, now: Timestamp, scheduled: bool) -> SnapshotId {
        self.snapshots.push(SnapshotRecord {
            state: ledger.clone(),
            taken_at: now,
            scheduled,
        });
        self.latest_id()
    }

    /// Look up a snapshot, failing for the null sentinel and ids beyond the
    /// latest taken.
    pub fn get(&self, id: SnapshotId) -> Result<&SnapshotRecord, TokenError> {
        if id.is_null() {
            return Err(TokenError::SnapshotIdNull);
        }
        self.snapshots
            .get((id.0 - 1) as usize)
            .ok_or(TokenError::SnapshotIdDoesNotExists {
                id,
                latest: self.latest_id(),
            })
    }

    /// A holder's total balance as of the snapshot.
    pub fn balance_of_at(&self, id: SnapshotId, holder: &AccountId) -> Result<Amount, TokenError> {
        Ok(self.get(id)?.state.balance_of(holder))
    }

    /// A holder's partition balance as of the snapshot.
    pub fn balance_of_at_by_partition(
        &self,
        id: SnapshotId,
        partition: &PartitionId,
        holder: &AccountId,
    ) -> Result<Amount, TokenError> {
        Ok(self
            .get(id)?
            .state
            .balance_of_by_partition(partition, holder))
    }

    /// The global supply as of the snapshot.
    pub fn total_supply_at(&self, id: SnapshotId) -> Result<Amount, TokenError> {
        Ok(self.get(id)?.state.total_supply())
    }

    /// A partition's supply as of the snapshot.
    pub fn total_supply_at_by_partition(
        &self,
        id: SnapshotId,
        partition: &PartitionId,
    ) -> Result<Amount, TokenError> {
        Ok(self.get(id)?.state.total_supply_by_partition(partition))
    }

    /// A holder's nonzero partitions as of the snapshot.
    pub fn partitions_of_at(
        &self,
        id: SnapshotId,
        holder: &AccountId,
    ) -> Result<Vec<PartitionId>, TokenError> {
        Ok(self.get(id)?.state.partitions_of(holder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(balance: u64) -> (PartitionedLedger, AccountId) {
        let mut ledger = PartitionedLedger::new();
        let alice = AccountId::derive(&[b"alice"]);
        ledger
            .issue(PartitionId::DEFAULT, alice, Amount(balance))
            .unwrap();
        (ledger, alice)
    }

    #[test]
    fn test_manual_snapshot_freezes_state() {
        let (mut ledger, alice) = ledger_with(100);
        let mut engine = SnapshotEngine::new();
        let id = engine.take(&ledger, Timestamp(10));
        assert_eq!(id, SnapshotId(1));

        // Later mutations do not affect the capture.
        ledger
            .issue(PartitionId::DEFAULT, alice, Amount(50))
            .unwrap();
        assert_eq!(engine.balance_of_at(id, &alice).unwrap(), Amount(100));
        assert_eq!(engine.total_supply_at(id).unwrap(), Amount(100));
        assert_eq!(
            engine
                .balance_of_at_by_partition(id, &PartitionId::DEFAULT, &alice)
                .unwrap(),
            Amount(100)
        );
        assert_eq!(
            engine.partitions_of_at(id, &alice).unwrap(),
            vec![PartitionId::DEFAULT]
        );
    }

    #[test]
    fn test_query_validation() {
        let (ledger, alice) = ledger_with(1);
        let mut engine = SnapshotEngine::new();
        assert_eq!(
            engine.balance_of_at(SnapshotId::NULL, &alice).unwrap_err(),
            TokenError::SnapshotIdNull
        );
        let id = engine.take(&ledger, Timestamp(1));
        assert_eq!(
            engine.balance_of_at(SnapshotId(2), &alice).unwrap_err(),
            TokenError::SnapshotIdDoesNotExists {
                id: SnapshotId(2),
                latest: id,
            }
        );
    }

    #[test]
    fn test_trigger_fires_once_per_due_set() {
        let (ledger, _) = ledger_with(10);
        let mut engine = SnapshotEngine::new();
        engine.schedule(Timestamp(100));
        engine.schedule(Timestamp(150));

        // Before the earliest date: nothing happens.
        assert_eq!(engine.trigger_scheduled(&ledger, Timestamp(99)), None);

        // Both dates reached at once: a single snapshot serves both.
        let id = engine
            .trigger_scheduled(&ledger, Timestamp(200))
            .expect("snapshot");
        assert_eq!(id, SnapshotId(1));
        assert_eq!(engine.pending_record_dates().count(), 0);

        // Queue drained: no further trigger.
        assert_eq!(engine.trigger_scheduled(&ledger, Timestamp(300)), None);
    }

    #[test]
    fn test_trigger_only_consumes_due_dates() {
        let (ledger, _) = ledger_with(10);
        let mut engine = SnapshotEngine::new();
        engine.schedule(Timestamp(100));
        engine.schedule(Timestamp(200));

        let id = engine
            .trigger_scheduled(&ledger, Timestamp(100))
            .expect("snapshot");
        assert_eq!(id, SnapshotId(1));
        assert_eq!(engine.pending_record_dates().count(), 1);
        assert!(engine.get(id).unwrap().scheduled);
    }
}
