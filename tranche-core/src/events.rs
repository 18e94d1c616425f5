//! Events emitted by ledger operations.
//!
//! Events are the observable effects of state-changing operations. Field
//! order within each variant is part of the compatibility surface and
//! mirrors the declared argument order of the corresponding on-ledger event.

use crate::amount::Amount;
use crate::id::{AccountId, PartitionId, SnapshotId};
use crate::roles::Role;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// An observable effect of a state-changing token operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    /// The token was paused.
    TokenPaused { account: AccountId },
    /// The token was unpaused.
    TokenUnpaused { account: AccountId },

    /// A role was granted to an account.
    RoleGranted {
        role: Role,
        account: AccountId,
        sender: AccountId,
    },
    /// A role was revoked from an account.
    RoleRevoked {
        role: Role,
        account: AccountId,
        sender: AccountId,
    },

    /// An account was added to the control list.
    AddedToControlList {
        operator: AccountId,
        account: AccountId,
    },
    /// An account was removed from the control list.
    RemovedFromControlList {
        operator: AccountId,
        account: AccountId,
    },

    /// The global max supply was configured.
    MaxSupplySet {
        operator: AccountId,
        new_max_supply: Amount,
        previous_max_supply: Amount,
    },
    /// A partition max supply was configured.
    MaxSupplyByPartitionSet {
        operator: AccountId,
        partition: PartitionId,
        new_max_supply: Amount,
        previous_max_supply: Amount,
    },

    /// Tokens were issued into a partition.
    IssuedByPartition {
        partition: PartitionId,
        operator: AccountId,
        to: AccountId,
        amount: Amount,
        data: Vec<u8>,
    },
    /// Tokens moved between holders within a partition. The operator field
    /// is the null account for self-initiated transfers.
    TransferByPartition {
        partition: PartitionId,
        operator: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
        data: Vec<u8>,
        operator_data: Vec<u8>,
    },
    /// Tokens were redeemed (burned) from a partition.
    RedeemedByPartition {
        partition: PartitionId,
        operator: AccountId,
        from: AccountId,
        amount: Amount,
        data: Vec<u8>,
        operator_data: Vec<u8>,
    },

    /// A holder authorized an operator across all partitions.
    AuthorizedOperator {
        operator: AccountId,
        holder: AccountId,
    },
    /// A holder revoked a global operator.
    RevokedOperator {
        operator: AccountId,
        holder: AccountId,
    },
    /// A holder authorized an operator for a single partition.
    AuthorizedOperatorByPartition {
        partition: PartitionId,
        operator: AccountId,
        holder: AccountId,
    },
    /// A holder revoked a partition-scoped operator.
    RevokedOperatorByPartition {
        partition: PartitionId,
        operator: AccountId,
        holder: AccountId,
    },

    /// A controller forced a transfer on the default partition.
    ControllerTransfer {
        controller: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
        data: Vec<u8>,
        operator_data: Vec<u8>,
    },
    /// A controller forced a redemption on the default partition.
    ControllerRedemption {
        controller: AccountId,
        from: AccountId,
        amount: Amount,
        data: Vec<u8>,
        operator_data: Vec<u8>,
    },
    /// The controller feature was irreversibly disabled.
    FinalizedControllerFeature,

    /// A snapshot was taken manually.
    SnapshotTaken { id: SnapshotId },
    /// A snapshot was materialized by a scheduled record date being reached.
    SnapshotTriggered { id: SnapshotId },

    /// A dividend distribution was scheduled.
    DividendSet {
        dividend_id: u64,
        record_date: Timestamp,
        execution_date: Timestamp,
        amount_per_unit: Amount,
    },
    /// A bond coupon payment was scheduled.
    CouponSet {
        coupon_id: u64,
        record_date: Timestamp,
        execution_date: Timestamp,
        rate: u64,
    },
    /// A voting record was scheduled.
    VotingSet {
        voting_id: u64,
        record_date: Timestamp,
        data: Vec<u8>,
    },

    /// A registry document was created or replaced.
    DocumentUpdated {
        name: String,
        uri: String,
        hash: Vec<u8>,
    },
    /// A registry document was removed.
    DocumentRemoved {
        name: String,
        uri: String,
        hash: Vec<u8>,
    },

    /// Part of a holder's balance was locked.
    LockCreated {
        lock_id: u64,
        holder: AccountId,
        amount: Amount,
        expiration: Timestamp,
    },
    /// An expired lock was released.
    LockReleased { lock_id: u64, holder: AccountId },

    /// A hold was created against a holder's partition balance.
    HoldCreated {
        partition: PartitionId,
        hold_id: u64,
        holder: AccountId,
        escrow: AccountId,
        amount: Amount,
        expiration: Timestamp,
    },
    /// A hold was executed, transferring funds to the destination.
    HoldExecuted {
        partition: PartitionId,
        hold_id: u64,
        holder: AccountId,
        to: AccountId,
        amount: Amount,
    },
    /// A hold was cancelled by its escrow.
    HoldReleased {
        partition: PartitionId,
        hold_id: u64,
        holder: AccountId,
    },
    /// An expired hold was reclaimed, returning funds to the holder.
    HoldReclaimed {
        partition: PartitionId,
        hold_id: u64,
        holder: AccountId,
    },
}
