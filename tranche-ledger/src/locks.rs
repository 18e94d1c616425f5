//! Time-bound locks that earmark part of a holder's balance, reducing the
//! transferable (but not total) amount until expiration and release.
//!
//! Lock records are never physically deleted: a released lock keeps its id
//! and stays addressable with amount zero.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tranche_core::{AccountId, Amount, Timestamp, TokenError};

/// One lock on a holder's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEntry {
    pub amount: Amount,
    pub expiration: Timestamp,
}

impl LockEntry {
    /// Whether the lock still restricts the holder's transferable balance.
    pub fn is_active(&self, now: Timestamp) -> bool {
        !self.amount.is_zero() && self.expiration > now
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HolderLocks {
    next_id: u64,
    entries: BTreeMap<u64, LockEntry>,
}

/// All locks, per holder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LockBook {
    locks: HashMap<AccountId, HolderLocks>,
}

impl LockBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a lock, returning its 1-indexed id. Balance sufficiency is
    /// the caller's concern; this validates amount and expiration only.
    pub fn create(
        &mut self,
        holder: AccountId,
        amount: Amount,
        expiration: Timestamp,
        now: Timestamp,
    ) -> Result<u64, TokenError> {
        if amount.is_zero() {
            return Err(TokenError::ZeroValue);
        }
        if expiration <= now {
            return Err(TokenError::WrongExpirationTimestamp { expiration, now });
        }
        let holder_locks = self.locks.entry(holder).or_default();
        holder_locks.next_id += 1;
        let id = holder_locks.next_id;
        holder_locks.entries.insert(id, LockEntry { amount, expiration });
        Ok(id)
    }

    /// Release an expired lock, returning the amount freed. The record is
    /// kept with amount zero.
    pub fn release(
        &mut self,
        holder: &AccountId,
        id: u64,
        now: Timestamp,
    ) -> Result<Amount, TokenError> {
        let entry = self
            .locks
            .get_mut(holder)
            .and_then(|l| l.entries.get_mut(&id))
            .ok_or(TokenError::LockDoesNotExist { holder: *holder, id })?;
        if entry.amount.is_zero() {
            return Err(TokenError::LockDoesNotExist { holder: *holder, id });
        }
        if entry.expiration > now {
            return Err(TokenError::LockNotExpired { id });
        }
        Ok(std::mem::replace(&mut entry.amount, Amount::ZERO))
    }

    /// The amount currently locked for the holder: the sum of unexpired,
    /// unreleased locks.
    pub fn locked_amount(&self, holder: &AccountId, now: Timestamp) -> Amount {
        self.locks.get(holder).map_or(Amount::ZERO, |holder_locks| {
            holder_locks
                .entries
                .values()
                .filter(|entry| entry.is_active(now))
                .map(|entry| entry.amount)
                .sum()
        })
    }

    pub fn get_lock(&self, holder: &AccountId, id: u64) -> Option<&LockEntry> {
        self.locks.get(holder).and_then(|l| l.entries.get(&id))
    }

    /// Ids of all lock records for the holder, released ones included.
    pub fn lock_ids(&self, holder: &AccountId) -> Vec<u64> {
        self.locks
            .get(holder)
            .map_or_else(Vec::new, |l| l.entries.keys().copied().collect())
    }
}
