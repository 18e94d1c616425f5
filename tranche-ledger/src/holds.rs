//! Escrow holds: amounts set aside on a partition pending release by an
//! escrow agent, execution to a recipient, or reclaim after expiration.
//!
//! A hold differs from a lock in that a third party (the escrow) controls
//! its outcome before expiration. Like locks, settled holds keep their id
//! and stay addressable with amount zero.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tranche_core::{AccountId, Amount, PartitionId, Timestamp, TokenError};

/// Parameters for creating a hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldParams {
    pub amount: Amount,
    /// The account allowed to execute or release the hold before expiry.
    pub escrow: AccountId,
    /// Predetermined recipient, if any. When set, execution must pay this
    /// account.
    pub to: Option<AccountId>,
    pub expiration: Timestamp,
    /// Opaque payload attached to the hold.
    pub data: Vec<u8>,
}

/// One hold on a (partition, holder) balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldEntry {
    pub amount: Amount,
    pub escrow: AccountId,
    pub to: Option<AccountId>,
    pub expiration: Timestamp,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HolderHolds {
    next_id: u64,
    entries: BTreeMap<u64, HoldEntry>,
}

/// All holds, keyed by partition and holder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoldBook {
    holds: HashMap<(PartitionId, AccountId), HolderHolds>,
}

impl HoldBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hold, returning its 1-indexed id. Balance sufficiency is
    /// the caller's concern.
    pub fn create(
        &mut self,
        partition: PartitionId,
        holder: AccountId,
        params: HoldParams,
        now: Timestamp,
    ) -> Result<u64, TokenError> {
        if params.amount.is_zero() {
            return Err(TokenError::ZeroValue);
        }
        if params.expiration <= now {
            return Err(TokenError::WrongExpirationTimestamp {
                expiration: params.expiration,
                now,
            });
        }
        let holder_holds = self.holds.entry((partition, holder)).or_default();
        holder_holds.next_id += 1;
        let id = holder_holds.next_id;
        holder_holds.entries.insert(
            id,
            HoldEntry {
                amount: params.amount,
                escrow: params.escrow,
                to: params.to,
                expiration: params.expiration,
                data: params.data,
            },
        );
        Ok(id)
    }

    /// Execute a hold before expiry. Only the escrow may execute. Returns
    /// the settled entry so the caller can move the funds; the stored
    /// record is zeroed.
    pub fn execute(
        &mut self,
        partition: &PartitionId,
        holder: &AccountId,
        id: u64,
        caller: &AccountId,
        now: Timestamp,
    ) -> Result<HoldEntry, TokenError> {
        let entry = self.live_entry(partition, holder, id)?;
        if entry.escrow != *caller {
            return Err(TokenError::UnauthorizedEscrow { account: *caller });
        }
        if entry.expiration <= now {
            return Err(TokenError::HoldExpired { id });
        }
        let settled = entry.clone();
        entry.amount = Amount::ZERO;
        Ok(settled)
    }

    /// Release a hold back to its holder before expiry. Only the escrow may
    /// release. Returns the amount freed.
    pub fn release(
        &mut self,
        partition: &PartitionId,
        holder: &AccountId,
        id: u64,
        caller: &AccountId,
        now: Timestamp,
    ) -> Result<Amount, TokenError> {
        let entry = self.live_entry(partition, holder, id)?;
        if entry.escrow != *caller {
            return Err(TokenError::UnauthorizedEscrow { account: *caller });
        }
        if entry.expiration <= now {
            return Err(TokenError::HoldExpired { id });
        }
        Ok(std::mem::replace(&mut entry.amount, Amount::ZERO))
    }

    /// Reclaim an expired hold back to its holder. Anyone may call this
    /// once the expiration has passed. Returns the amount freed.
    pub fn reclaim(
        &mut self,
        partition: &PartitionId,
        holder: &AccountId,
        id: u64,
        now: Timestamp,
    ) -> Result<Amount, TokenError> {
        let entry = self.live_entry(partition, holder, id)?;
        if entry.expiration > now {
            return Err(TokenError::HoldNotExpired { id });
        }
        Ok(std::mem::replace(&mut entry.amount, Amount::ZERO))
    }

    /// The amount held on the (partition, holder) balance. Expired but
    /// unreclaimed holds still count; the funds stay encumbered until a
    /// reclaim settles them.
    pub fn held_amount(&self, partition: &PartitionId, holder: &AccountId) -> Amount {
        self.holds
            .get(&(*partition, *holder))
            .map_or(Amount::ZERO, |holder_holds| {
                holder_holds.entries.values().map(|e| e.amount).sum()
            })
    }

    pub fn get_hold(
        &self,
        partition: &PartitionId,
        holder: &AccountId,
        id: u64,
    ) -> Option<&HoldEntry> {
        self.holds
            .get(&(*partition, *holder))
            .and_then(|h| h.entries.get(&id))
    }

    fn live_entry(
        &mut self,
        partition: &PartitionId,
        holder: &AccountId,
        id: u64,
    ) -> Result<&mut HoldEntry, TokenError> {
        let missing = TokenError::HoldDoesNotExist {
            partition: *partition,
            holder: *holder,
            id,
        };
        let entry = self
            .holds
            .get_mut(&(*partition, *holder))
            .and_then(|h| h.entries.get_mut(&id))
            .ok_or_else(|| missing.clone())?;
        if entry.amount.is_zero() {
            return Err(missing);
        }
        Ok(entry)
    }
}
