use crate::amount::Amount;
use crate::id::{AccountId, PartitionId, SnapshotId};
use crate::roles::Role;
use crate::time::Timestamp;
use thiserror::Error;

/// Represents all possible errors surfaced by ledger operations.
///
/// Every error aborts the whole operation with no partial state change.
/// Callers branch on the specific kind, so variants stay fine-grained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    // --- Authorization ---
    /// The caller does not hold the role required for the operation
    #[error("account {account} does not hold role {role}")]
    AccountHasNoRole { account: AccountId, role: Role },

    /// The caller is not an authorized operator for the holder on the
    /// partition
    #[error("account {operator} is not an operator for {holder}")]
    UnauthorizedOperator {
        operator: AccountId,
        holder: AccountId,
    },

    // --- Lifecycle ---
    /// The token is paused, or a pause was requested while already paused
    #[error("token is paused")]
    TokenIsPaused,

    /// An unpause was requested while the token is not paused
    #[error("token is not paused")]
    TokenIsUnpaused,

    /// A controller operation was attempted after the controller feature was
    /// finalized
    #[error("token is not controllable")]
    TokenIsNotControllable,

    // --- Compliance ---
    /// An involved account fails the control-list predicate
    #[error("account {account} is blocked by the control list")]
    AccountIsBlocked { account: AccountId },

    // --- Validation ---
    /// The reserved zero partition was used
    #[error("the zero partition is reserved")]
    ZeroPartition,

    /// A zero amount was supplied where a positive amount is required
    #[error("amount must be greater than zero")]
    ZeroValue,

    /// The partition is not valid for the holder or operation
    #[error("invalid partition {partition}")]
    InvalidPartition { partition: PartitionId },

    /// A non-default partition was used on a single-partition token
    #[error("partition {partition} is not allowed in single-partition mode")]
    PartitionNotAllowedInSinglePartitionMode { partition: PartitionId },

    /// A single-partition controller operation was used on a multi-partition
    /// token
    #[error("operation is not allowed in multi-partition mode")]
    NotAllowedInMultiPartitionMode,

    /// A corporate action's record date is not before its execution date
    #[error("record date {record_date} must precede execution date {execution_date}")]
    WrongDates {
        record_date: Timestamp,
        execution_date: Timestamp,
    },

    /// A corporate action's record date is already in the past
    #[error("record date {record_date} is before the current time {now}")]
    WrongTimestamp {
        record_date: Timestamp,
        now: Timestamp,
    },

    /// A corporate action id is out of range
    #[error("no corporate action with index {index}")]
    WrongIndexForAction { index: u64 },

    /// A member-range query is inverted or runs past the end of the list
    #[error("invalid range [{start}, {end}) over {len} members")]
    InvalidRange { start: u64, end: u64, len: u64 },

    /// A lock or hold expiration timestamp is not in the future
    #[error("expiration {expiration} is not after the current time {now}")]
    WrongExpirationTimestamp {
        expiration: Timestamp,
        now: Timestamp,
    },

    /// An empty document name was supplied
    #[error("document name must not be empty")]
    EmptyName,

    /// An empty document URI was supplied
    #[error("document URI must not be empty")]
    EmptyUri,

    /// An empty document hash was supplied
    #[error("document hash must not be empty")]
    EmptyHash,

    // --- Capacity ---
    /// Issuance would push the global supply past the configured cap
    #[error("issuance would exceed the max supply of {max}")]
    MaxSupplyReached { max: Amount },

    /// Issuance would push a partition supply past its configured cap
    #[error("issuance would exceed the max supply of {max} for partition {partition}")]
    MaxSupplyReachedForPartition { partition: PartitionId, max: Amount },

    // --- Ledger state ---
    /// The holder's transferable balance on the partition is insufficient
    #[error(
        "insufficient balance for {holder} on {partition}: available {available}, required {required}"
    )]
    InsufficientBalance {
        holder: AccountId,
        partition: PartitionId,
        available: Amount,
        required: Amount,
    },

    /// The null account was used as a transfer or redemption source
    #[error("the from account is the null account")]
    FromAccountNull,

    /// The null account was used as a transfer destination
    #[error("the to account is the null account")]
    ToAccountNull,

    /// The reserved snapshot id 0 was queried
    #[error("snapshot id 0 is reserved")]
    SnapshotIdNull,

    /// A snapshot id beyond the latest taken snapshot was queried
    #[error("snapshot {id} does not exist (latest is {latest})")]
    SnapshotIdDoesNotExists { id: SnapshotId, latest: SnapshotId },

    /// An unknown document name was referenced
    #[error("document {name:?} does not exist")]
    DocumentDoesNotExist { name: String },

    /// An unknown lock id was referenced
    #[error("lock {id} does not exist for {holder}")]
    LockDoesNotExist { holder: AccountId, id: u64 },

    /// A lock release was attempted before the lock expired
    #[error("lock {id} has not expired yet")]
    LockNotExpired { id: u64 },

    /// An unknown hold id was referenced
    #[error("hold {id} does not exist for {holder} on {partition}")]
    HoldDoesNotExist {
        partition: PartitionId,
        holder: AccountId,
        id: u64,
    },

    /// A hold execution was attempted after the hold expired
    #[error("hold {id} has expired")]
    HoldExpired { id: u64 },

    /// A hold reclaim was attempted before the hold expired
    #[error("hold {id} has not expired yet")]
    HoldNotExpired { id: u64 },

    /// A hold was executed or released by an account other than its escrow
    #[error("account {account} is not the escrow of the hold")]
    UnauthorizedEscrow { account: AccountId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_subject() {
        let account = AccountId::derive(&[b"someone"]);
        let err = TokenError::AccountHasNoRole {
            account,
            role: Role::Issuer,
        };
        let msg = err.to_string();
        assert!(msg.contains("issuer"), "message: {}", msg);
        assert!(msg.contains(&account.to_string()), "message: {}", msg);
    }

    #[test]
    fn test_insufficient_balance_reports_amounts() {
        let err = TokenError::InsufficientBalance {
            holder: AccountId::derive(&[b"h"]),
            partition: PartitionId::DEFAULT,
            available: Amount(3),
            required: Amount(5),
        };
        let msg = err.to_string();
        assert!(msg.contains("available 3"), "message: {}", msg);
        assert!(msg.contains("required 5"), "message: {}", msg);
    }
}
