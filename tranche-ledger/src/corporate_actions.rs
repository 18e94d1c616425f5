//! Dividend, coupon and voting records that bind to a snapshot id once
//! their record date is reached.
//!
//! Records are append-only and 1-indexed. Each starts with the null
//! snapshot id and binds independently the first time a ledger mutation
//! happens at or after its record date. Multiple records sharing a record
//! date bind to the same triggered snapshot.

use serde::{Deserialize, Serialize};
use tranche_core::{Amount, SnapshotId, Timestamp, TokenError};

/// A scheduled dividend distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendRecord {
    /// When eligibility is measured.
    pub record_date: Timestamp,
    /// When the distribution is paid out. Always after the record date.
    pub execution_date: Timestamp,
    /// Amount distributed per token unit held at the record date.
    pub amount_per_unit: Amount,
    /// The snapshot the record bound to, or null before the record date is
    /// reached.
    pub snapshot_id: SnapshotId,
}

/// A scheduled bond coupon payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRecord {
    pub record_date: Timestamp,
    pub execution_date: Timestamp,
    /// Coupon rate in basis points.
    pub rate: u64,
    pub snapshot_id: SnapshotId,
}

/// A scheduled voting record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingRecord {
    pub record_date: Timestamp,
    /// Opaque ballot payload.
    pub data: Vec<u8>,
    pub snapshot_id: SnapshotId,
}

/// A dividend record merged with its resolution state for one holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendFor {
    pub record: DividendRecord,
    pub record_date_reached: bool,
    /// The holder's balance at the bound snapshot; zero before binding.
    pub token_balance: Amount,
}

/// A coupon record merged with its resolution state for one holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponFor {
    pub record: CouponRecord,
    pub record_date_reached: bool,
    pub token_balance: Amount,
}

/// A voting record merged with its resolution state for one holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingFor {
    pub record: VotingRecord,
    pub record_date_reached: bool,
    pub token_balance: Amount,
}

/// The append-only corporate-action registries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorporateActions {
    dividends: Vec<DividendRecord>,
    coupons: Vec<CouponRecord>,
    votings: Vec<VotingRecord>,
}

/// Validate a record/execution date pair against the current time.
fn validate_dates(
    record_date: Timestamp,
    execution_date: Timestamp,
    now: Timestamp,
) -> Result<(), TokenError> {
    if record_date >= execution_date {
        return Err(TokenError::WrongDates {
            record_date,
            execution_date,
        });
    }
    if record_date < now {
        return Err(TokenError::WrongTimestamp { record_date, now });
    }
    Ok(())
}

fn get_record<T>(records: &[T], id: u64) -> Result<&T, TokenError> {
    if id == 0 {
        return Err(TokenError::WrongIndexForAction { index: id });
    }
    records
        .get((id - 1) as usize)
        .ok_or(TokenError::WrongIndexForAction { index: id })
}

impl CorporateActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dividend record, returning its 1-indexed id.
    pub fn set_dividend(
        &mut self,
        record_date: Timestamp,
        execution_date: Timestamp,
        amount_per_unit: Amount,
        now: Timestamp,
    ) -> Result<u64, TokenError> {
        validate_dates(record_date, execution_date, now)?;
        self.dividends.push(DividendRecord {
            record_date,
            execution_date,
            amount_per_unit,
            snapshot_id: SnapshotId::NULL,
        });
        Ok(self.dividends.len() as u64)
    }

    /// Append a coupon record, returning its 1-indexed id.
    pub fn set_coupon(
        &mut self,
        record_date: Timestamp,
        execution_date: Timestamp,
        rate: u64,
        now: Timestamp,
    ) -> Result<u64, TokenError> {
        validate_dates(record_date, execution_date, now)?;
        self.coupons.push(CouponRecord {
            record_date,
            execution_date,
            rate,
            snapshot_id: SnapshotId::NULL,
        });
        Ok(self.coupons.len() as u64)
    }

    /// Append a voting record, returning its 1-indexed id.
    pub fn set_voting(
        &mut self,
        record_date: Timestamp,
        data: Vec<u8>,
        now: Timestamp,
    ) -> Result<u64, TokenError> {
        if record_date < now {
            return Err(TokenError::WrongTimestamp { record_date, now });
        }
        self.votings.push(VotingRecord {
            record_date,
            data,
            snapshot_id: SnapshotId::NULL,
        });
        Ok(self.votings.len() as u64)
    }

    /// Bind every unbound record whose record date has been reached to the
    /// given snapshot.
    pub fn bind_due(&mut self, now: Timestamp, snapshot_id: SnapshotId) {
        for record in self.dividends.iter_mut() {
            if record.snapshot_id.is_null() && record.record_date <= now {
                record.snapshot_id = snapshot_id;
            }
        }
        for record in self.coupons.iter_mut() {
            if record.snapshot_id.is_null() && record.record_date <= now {
                record.snapshot_id = snapshot_id;
            }
        }
        for record in self.votings.iter_mut() {
            if record.snapshot_id.is_null() && record.record_date <= now {
                record.snapshot_id = snapshot_id;
            }
        }
    }

    pub fn dividend_count(&self) -> u64 {
        self.dividends.len() as u64
    }

    pub fn coupon_count(&self) -> u64 {
        self.coupons.len() as u64
    }

    pub fn voting_count(&self) -> u64 {
        self.votings.len() as u64
    }

    pub fn get_dividend(&self, id: u64) -> Result<&DividendRecord, TokenError> {
        get_record(&self.dividends, id)
    }

    pub fn get_coupon(&self, id: u64) -> Result<&CouponRecord, TokenError> {
        get_record(&self.coupons, id)
    }

    pub fn get_voting(&self, id: u64) -> Result<&VotingRecord, TokenError> {
        get_record(&self.votings, id)
    }
}
