//! The `SecurityToken` facade: one value composing every service, exposing
//! the full operation surface and enforcing the cross-cutting order of
//! checks.
//!
//! Every state-changing command follows the same shape: pause gate first,
//! then role or operator authorization, input validation, compliance,
//! capacity, then the scheduled-snapshot hook, then the mutation, then the
//! event. Only `unpause` and the read-only queries work while paused.
//! A failure at any step leaves the token untouched.
//!
//! The transfer and redemption paths share one check function,
//! [`SecurityToken::transfer_code`], so the dry-run predicates always
//! report exactly the failure the mutating call would surface first.

use crate::access::AccessControl;
use crate::cap::Cap;
use crate::config::{PartitionMode, SecurityKind, TokenConfig};
use crate::control_list::{ControlList, ControlListType};
use crate::corporate_actions::{
    CorporateActions, CouponFor, CouponRecord, DividendFor, DividendRecord, VotingFor,
    VotingRecord,
};
use crate::documents::{Document, DocumentRegistry};
use crate::holds::{HoldBook, HoldEntry, HoldParams};
use crate::ledger::PartitionedLedger;
use crate::locks::{LockBook, LockEntry};
use crate::pause::Pause;
use crate::snapshot::SnapshotEngine;
use crate::traits::{CapCheck, ComplianceChecker, PauseState, RoleChecker};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tranche_core::{
    AccountId, Amount, PartitionId, Role, SnapshotId, Timestamp, TokenError, TokenEvent,
    TransferCheck, TransferCheckCode,
};

/// Who is calling and when. Every command takes one; the ledger keeps no
/// ambient clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransactionContext {
    pub caller: AccountId,
    pub now: Timestamp,
}

impl TransactionContext {
    pub fn new(caller: AccountId, now: Timestamp) -> Self {
        TransactionContext { caller, now }
    }

    /// A context stamped with the current wall-clock time.
    pub fn now(caller: AccountId) -> Self {
        TransactionContext {
            caller,
            now: Timestamp::now(),
        }
    }
}

/// A regulated-security token instance.
///
/// Single-writer by construction: every command takes `&mut self`, so the
/// borrow checker provides the serialization point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityToken {
    config: TokenConfig,
    access: AccessControl,
    pause: Pause,
    control_list: ControlList,
    cap: Cap,
    ledger: PartitionedLedger,
    snapshots: SnapshotEngine,
    actions: CorporateActions,
    documents: DocumentRegistry,
    locks: LockBook,
    holds: HoldBook,
    controllable: bool,
    events: Vec<TokenEvent>,
}

impl SecurityToken {
    /// Construct a token from its configuration, applying the initial role
    /// grants and supply ceilings before the first operation is accepted.
    pub fn new(config: TokenConfig) -> Self {
        let mut access = AccessControl::new();
        for (role, account) in &config.initial_roles {
            access.grant_unchecked(*role, *account);
        }
        let mut cap = Cap::new();
        cap.set_max_supply(config.max_supply);
        for (partition, max) in &config.max_supply_by_partition {
            cap.set_max_supply_by_partition(*partition, *max);
        }
        let control_list = ControlList::new(config.control_list_type);
        let controllable = config.controllable;
        info!("token {} ({}) created", config.symbol, config.name);
        SecurityToken {
            config,
            access,
            pause: Pause::new(),
            control_list,
            cap,
            ledger: PartitionedLedger::new(),
            snapshots: SnapshotEngine::new(),
            actions: CorporateActions::new(),
            documents: DocumentRegistry::new(),
            locks: LockBook::new(),
            holds: HoldBook::new(),
            controllable,
            events: Vec::new(),
        }
    }

    // --- metadata ---

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn decimals(&self) -> u8 {
        self.config.decimals
    }

    pub fn kind(&self) -> SecurityKind {
        self.config.kind
    }

    pub fn partition_mode(&self) -> PartitionMode {
        self.config.partition_mode
    }

    pub fn is_controllable(&self) -> bool {
        self.controllable
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    // --- events ---

    /// The ordered log of events emitted so far.
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Take the event log, leaving it empty.
    pub fn drain_events(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.events)
    }

    // --- roles ---

    pub fn has_role(&self, role: Role, account: &AccountId) -> bool {
        self.access.has_role(role, account)
    }

    pub fn grant_role(
        &mut self,
        ctx: &TransactionContext,
        role: Role,
        account: AccountId,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.grant_role(&ctx.caller, role, account)?;
        self.events.push(TokenEvent::RoleGranted {
            role,
            account,
            sender: ctx.caller,
        });
        Ok(())
    }

    pub fn revoke_role(
        &mut self,
        ctx: &TransactionContext,
        role: Role,
        account: &AccountId,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.revoke_role(&ctx.caller, role, account)?;
        self.events.push(TokenEvent::RoleRevoked {
            role,
            account: *account,
            sender: ctx.caller,
        });
        Ok(())
    }

    // --- pause ---

    pub fn pause(&mut self, ctx: &TransactionContext) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::Pauser, &ctx.caller)?;
        self.pause.pause()?;
        info!("token {} paused by {}", self.config.symbol, ctx.caller);
        self.events.push(TokenEvent::TokenPaused {
            account: ctx.caller,
        });
        Ok(())
    }

    pub fn unpause(&mut self, ctx: &TransactionContext) -> Result<(), TokenError> {
        self.access.require_role(Role::Pauser, &ctx.caller)?;
        self.pause.unpause()?;
        info!("token {} unpaused by {}", self.config.symbol, ctx.caller);
        self.events.push(TokenEvent::TokenUnpaused {
            account: ctx.caller,
        });
        Ok(())
    }

    // --- control list ---

    pub fn control_list_type(&self) -> ControlListType {
        self.control_list.list_type()
    }

    pub fn is_in_control_list(&self, account: &AccountId) -> bool {
        self.control_list.contains(account)
    }

    pub fn control_list_len(&self) -> usize {
        self.control_list.len()
    }

    /// Control-list members in the half-open range `[start, end)`.
    pub fn control_list_members(
        &self,
        start: usize,
        end: usize,
    ) -> Result<&[AccountId], TokenError> {
        self.control_list.members(start, end)
    }

    pub fn add_to_control_list(
        &mut self,
        ctx: &TransactionContext,
        account: AccountId,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::ControlList, &ctx.caller)?;
        self.control_list.add(account);
        self.events.push(TokenEvent::AddedToControlList {
            operator: ctx.caller,
            account,
        });
        Ok(())
    }

    pub fn remove_from_control_list(
        &mut self,
        ctx: &TransactionContext,
        account: &AccountId,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::ControlList, &ctx.caller)?;
        if self.control_list.remove(account) {
            self.events.push(TokenEvent::RemovedFromControlList {
                operator: ctx.caller,
                account: *account,
            });
        }
        Ok(())
    }

    // --- supply ceilings ---

    pub fn max_supply(&self) -> Amount {
        self.cap.max_supply()
    }

    pub fn max_supply_by_partition(&self, partition: &PartitionId) -> Amount {
        self.cap.max_supply_by_partition(partition)
    }

    pub fn set_max_supply(
        &mut self,
        ctx: &TransactionContext,
        value: Amount,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::Cap, &ctx.caller)?;
        let previous = self.cap.set_max_supply(value);
        self.events.push(TokenEvent::MaxSupplySet {
            operator: ctx.caller,
            new_max_supply: value,
            previous_max_supply: previous,
        });
        Ok(())
    }

    pub fn set_max_supply_by_partition(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        value: Amount,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::Cap, &ctx.caller)?;
        self.partition_valid(&partition)?;
        let previous = self.cap.set_max_supply_by_partition(partition, value);
        self.events.push(TokenEvent::MaxSupplyByPartitionSet {
            operator: ctx.caller,
            partition,
            new_max_supply: value,
            previous_max_supply: previous,
        });
        Ok(())
    }

    // --- balances ---

    pub fn balance_of(&self, holder: &AccountId) -> Amount {
        self.ledger.balance_of(holder)
    }

    pub fn balance_of_by_partition(&self, partition: &PartitionId, holder: &AccountId) -> Amount {
        self.ledger.balance_of_by_partition(partition, holder)
    }

    pub fn partitions_of(&self, holder: &AccountId) -> Vec<PartitionId> {
        self.ledger.partitions_of(holder)
    }

    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    pub fn total_supply_by_partition(&self, partition: &PartitionId) -> Amount {
        self.ledger.total_supply_by_partition(partition)
    }

    /// Number of accounts with a nonzero total balance.
    pub fn holder_count(&self) -> usize {
        self.ledger.holders().count()
    }

    /// The holder's partition balance minus locked (default partition only)
    /// and held amounts. This is the balance the transfer and redemption
    /// paths check against.
    pub fn transferable_balance(
        &self,
        partition: &PartitionId,
        holder: &AccountId,
        now: Timestamp,
    ) -> Amount {
        let mut balance = self.ledger.balance_of_by_partition(partition, holder);
        if *partition == PartitionId::DEFAULT {
            balance = balance.saturating_sub(self.locks.locked_amount(holder, now));
        }
        balance.saturating_sub(self.holds.held_amount(partition, holder))
    }

    // --- operators ---

    pub fn is_operator(&self, operator: &AccountId, holder: &AccountId) -> bool {
        self.ledger.is_operator(operator, holder)
    }

    pub fn is_operator_for_partition(
        &self,
        partition: &PartitionId,
        operator: &AccountId,
        holder: &AccountId,
    ) -> bool {
        self.ledger
            .is_operator_for_partition(partition, operator, holder)
    }

    /// Authorize `operator` to act for the caller on every partition.
    pub fn authorize_operator(
        &mut self,
        ctx: &TransactionContext,
        operator: AccountId,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.ledger.authorize_operator(ctx.caller, operator);
        self.events.push(TokenEvent::AuthorizedOperator {
            operator,
            holder: ctx.caller,
        });
        Ok(())
    }

    pub fn revoke_operator(
        &mut self,
        ctx: &TransactionContext,
        operator: &AccountId,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.ledger.revoke_operator(&ctx.caller, operator);
        self.events.push(TokenEvent::RevokedOperator {
            operator: *operator,
            holder: ctx.caller,
        });
        Ok(())
    }

    /// Authorize `operator` for the caller on one partition. Partition-scoped
    /// consent only exists on multi-partition tokens.
    pub fn authorize_operator_by_partition(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        operator: AccountId,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.partition_scoped_consent_valid(&partition)?;
        self.ledger
            .authorize_operator_by_partition(partition, ctx.caller, operator);
        self.events.push(TokenEvent::AuthorizedOperatorByPartition {
            partition,
            operator,
            holder: ctx.caller,
        });
        Ok(())
    }

    pub fn revoke_operator_by_partition(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        operator: &AccountId,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.partition_scoped_consent_valid(&partition)?;
        self.ledger
            .revoke_operator_by_partition(&partition, &ctx.caller, operator);
        self.events.push(TokenEvent::RevokedOperatorByPartition {
            partition,
            operator: *operator,
            holder: ctx.caller,
        });
        Ok(())
    }

    // --- issuance ---

    pub fn issue_by_partition(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        to: AccountId,
        amount: Amount,
        data: Vec<u8>,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::Issuer, &ctx.caller)?;
        self.partition_valid(&partition)?;
        if amount.is_zero() {
            return Err(TokenError::ZeroValue);
        }
        self.control_list.require_compliant(&to)?;
        let new_supply = self
            .ledger
            .total_supply()
            .checked_add(amount)
            .ok_or(TokenError::MaxSupplyReached { max: Amount::MAX })?;
        let new_partition_supply = self
            .ledger
            .total_supply_by_partition(&partition)
            .checked_add(amount)
            .ok_or(TokenError::MaxSupplyReachedForPartition {
                partition,
                max: Amount::MAX,
            })?;
        self.cap
            .validate_issuance(new_supply, partition, new_partition_supply)?;
        self.run_scheduled(ctx.now);
        self.ledger.issue(partition, to, amount)?;
        info!("issued {} on {} to {}", amount, partition, to);
        self.events.push(TokenEvent::IssuedByPartition {
            partition,
            operator: ctx.caller,
            to,
            amount,
            data,
        });
        Ok(())
    }

    // --- transfers ---

    /// Transfer from the caller's own balance.
    pub fn transfer_by_partition(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        to: AccountId,
        amount: Amount,
        data: Vec<u8>,
    ) -> Result<(), TokenError> {
        let from = ctx.caller;
        self.require_transfer(&partition, &ctx.caller, &from, Some(&to), amount, ctx.now, false)?;
        self.run_scheduled(ctx.now);
        self.ledger.transfer(partition, from, to, amount)?;
        debug!("transfer {} on {}: {} -> {}", amount, partition, from, to);
        self.events.push(TokenEvent::TransferByPartition {
            partition,
            operator: AccountId::NULL,
            from,
            to,
            amount,
            data,
            operator_data: Vec::new(),
        });
        Ok(())
    }

    /// Transfer on behalf of `from`. The caller must be an authorized
    /// operator for `from` on the partition.
    #[allow(clippy::too_many_arguments)]
    pub fn operator_transfer_by_partition(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
        data: Vec<u8>,
        operator_data: Vec<u8>,
    ) -> Result<(), TokenError> {
        self.require_transfer(&partition, &ctx.caller, &from, Some(&to), amount, ctx.now, false)?;
        self.run_scheduled(ctx.now);
        self.ledger.transfer(partition, from, to, amount)?;
        debug!(
            "operator transfer {} on {}: {} -> {} by {}",
            amount, partition, from, to, ctx.caller
        );
        self.events.push(TokenEvent::TransferByPartition {
            partition,
            operator: ctx.caller,
            from,
            to,
            amount,
            data,
            operator_data,
        });
        Ok(())
    }

    /// Dry run of a transfer: the verdict plus the first reason code the
    /// mutating call would report, with no state change.
    pub fn can_transfer_by_partition(
        &self,
        ctx: &TransactionContext,
        partition: &PartitionId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> TransferCheck {
        self.transfer_code(partition, &ctx.caller, from, Some(to), amount, ctx.now, false)
            .into()
    }

    // --- redemption ---

    /// Redeem (burn) from the caller's own balance.
    pub fn redeem_by_partition(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        amount: Amount,
        data: Vec<u8>,
    ) -> Result<(), TokenError> {
        let from = ctx.caller;
        self.require_transfer(&partition, &ctx.caller, &from, None, amount, ctx.now, false)?;
        self.run_scheduled(ctx.now);
        self.ledger.redeem(partition, from, amount)?;
        debug!("redeemed {} on {} from {}", amount, partition, from);
        self.events.push(TokenEvent::RedeemedByPartition {
            partition,
            operator: AccountId::NULL,
            from,
            amount,
            data,
            operator_data: Vec::new(),
        });
        Ok(())
    }

    /// Redeem on behalf of `from`.
    pub fn operator_redeem_by_partition(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        from: AccountId,
        amount: Amount,
        data: Vec<u8>,
        operator_data: Vec<u8>,
    ) -> Result<(), TokenError> {
        self.require_transfer(&partition, &ctx.caller, &from, None, amount, ctx.now, false)?;
        self.run_scheduled(ctx.now);
        self.ledger.redeem(partition, from, amount)?;
        debug!(
            "operator redeemed {} on {} from {} by {}",
            amount, partition, from, ctx.caller
        );
        self.events.push(TokenEvent::RedeemedByPartition {
            partition,
            operator: ctx.caller,
            from,
            amount,
            data,
            operator_data,
        });
        Ok(())
    }

    /// Dry run of a redemption.
    pub fn can_redeem_by_partition(
        &self,
        ctx: &TransactionContext,
        partition: &PartitionId,
        from: &AccountId,
        amount: Amount,
    ) -> TransferCheck {
        self.transfer_code(partition, &ctx.caller, from, None, amount, ctx.now, false)
            .into()
    }

    // --- controller operations ---

    /// Force a transfer on any partition, bypassing operator authorization.
    /// Compliance, pause and balance checks still apply.
    #[allow(clippy::too_many_arguments)]
    pub fn controller_transfer_by_partition(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
        data: Vec<u8>,
        operator_data: Vec<u8>,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::Controller, &ctx.caller)?;
        self.require_controllable()?;
        self.require_transfer(&partition, &ctx.caller, &from, Some(&to), amount, ctx.now, true)?;
        self.run_scheduled(ctx.now);
        self.ledger.transfer(partition, from, to, amount)?;
        warn!(
            "controller {} forced transfer of {} on {}: {} -> {}",
            ctx.caller, amount, partition, from, to
        );
        self.events.push(TokenEvent::TransferByPartition {
            partition,
            operator: ctx.caller,
            from,
            to,
            amount,
            data,
            operator_data,
        });
        Ok(())
    }

    /// Force a redemption on any partition.
    pub fn controller_redeem_by_partition(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        from: AccountId,
        amount: Amount,
        data: Vec<u8>,
        operator_data: Vec<u8>,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::Controller, &ctx.caller)?;
        self.require_controllable()?;
        self.require_transfer(&partition, &ctx.caller, &from, None, amount, ctx.now, true)?;
        self.run_scheduled(ctx.now);
        self.ledger.redeem(partition, from, amount)?;
        warn!(
            "controller {} forced redemption of {} on {} from {}",
            ctx.caller, amount, partition, from
        );
        self.events.push(TokenEvent::RedeemedByPartition {
            partition,
            operator: ctx.caller,
            from,
            amount,
            data,
            operator_data,
        });
        Ok(())
    }

    /// Single-partition controller transfer on the default partition. Fails
    /// on multi-partition tokens.
    pub fn controller_transfer(
        &mut self,
        ctx: &TransactionContext,
        from: AccountId,
        to: AccountId,
        amount: Amount,
        data: Vec<u8>,
        operator_data: Vec<u8>,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        if self.config.partition_mode == PartitionMode::Multi {
            return Err(TokenError::NotAllowedInMultiPartitionMode);
        }
        self.access.require_role(Role::Controller, &ctx.caller)?;
        self.require_controllable()?;
        let partition = PartitionId::DEFAULT;
        self.require_transfer(&partition, &ctx.caller, &from, Some(&to), amount, ctx.now, true)?;
        self.run_scheduled(ctx.now);
        self.ledger.transfer(partition, from, to, amount)?;
        warn!(
            "controller {} forced transfer of {}: {} -> {}",
            ctx.caller, amount, from, to
        );
        self.events.push(TokenEvent::ControllerTransfer {
            controller: ctx.caller,
            from,
            to,
            amount,
            data,
            operator_data,
        });
        Ok(())
    }

    /// Single-partition controller redemption on the default partition.
    pub fn controller_redeem(
        &mut self,
        ctx: &TransactionContext,
        from: AccountId,
        amount: Amount,
        data: Vec<u8>,
        operator_data: Vec<u8>,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        if self.config.partition_mode == PartitionMode::Multi {
            return Err(TokenError::NotAllowedInMultiPartitionMode);
        }
        self.access.require_role(Role::Controller, &ctx.caller)?;
        self.require_controllable()?;
        let partition = PartitionId::DEFAULT;
        self.require_transfer(&partition, &ctx.caller, &from, None, amount, ctx.now, true)?;
        self.run_scheduled(ctx.now);
        self.ledger.redeem(partition, from, amount)?;
        warn!(
            "controller {} forced redemption of {} from {}",
            ctx.caller, amount, from
        );
        self.events.push(TokenEvent::ControllerRedemption {
            controller: ctx.caller,
            from,
            amount,
            data,
            operator_data,
        });
        Ok(())
    }

    /// Irreversibly disable controller operations. Calling again fails.
    pub fn finalize_controllable(&mut self, ctx: &TransactionContext) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::Admin, &ctx.caller)?;
        self.require_controllable()?;
        self.controllable = false;
        info!("controller feature finalized by {}", ctx.caller);
        self.events.push(TokenEvent::FinalizedControllerFeature);
        Ok(())
    }

    // --- snapshots ---

    pub fn snapshot_count(&self) -> u64 {
        self.snapshots.count()
    }

    /// Take a manual snapshot of the current state.
    pub fn take_snapshot(&mut self, ctx: &TransactionContext) -> Result<SnapshotId, TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::Snapshot, &ctx.caller)?;
        let id = self.snapshots.take(&self.ledger, ctx.now);
        self.events.push(TokenEvent::SnapshotTaken { id });
        Ok(id)
    }

    pub fn balance_of_at_snapshot(
        &self,
        id: SnapshotId,
        holder: &AccountId,
    ) -> Result<Amount, TokenError> {
        self.snapshots.balance_of_at(id, holder)
    }

    pub fn balance_of_at_snapshot_by_partition(
        &self,
        id: SnapshotId,
        partition: &PartitionId,
        holder: &AccountId,
    ) -> Result<Amount, TokenError> {
        self.snapshots.balance_of_at_by_partition(id, partition, holder)
    }

    pub fn total_supply_at_snapshot(&self, id: SnapshotId) -> Result<Amount, TokenError> {
        self.snapshots.total_supply_at(id)
    }

    pub fn total_supply_at_snapshot_by_partition(
        &self,
        id: SnapshotId,
        partition: &PartitionId,
    ) -> Result<Amount, TokenError> {
        self.snapshots.total_supply_at_by_partition(id, partition)
    }

    pub fn partitions_of_at_snapshot(
        &self,
        id: SnapshotId,
        holder: &AccountId,
    ) -> Result<Vec<PartitionId>, TokenError> {
        self.snapshots.partitions_of_at(id, holder)
    }

    // --- corporate actions ---

    /// Schedule a dividend. The record date is queued with the snapshot
    /// engine; the record binds to a snapshot lazily when the date is
    /// reached.
    pub fn set_dividends(
        &mut self,
        ctx: &TransactionContext,
        record_date: Timestamp,
        execution_date: Timestamp,
        amount_per_unit: Amount,
    ) -> Result<u64, TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::CorporateActions, &ctx.caller)?;
        let id = self
            .actions
            .set_dividend(record_date, execution_date, amount_per_unit, ctx.now)?;
        self.snapshots.schedule(record_date);
        self.events.push(TokenEvent::DividendSet {
            dividend_id: id,
            record_date,
            execution_date,
            amount_per_unit,
        });
        Ok(id)
    }

    /// Schedule a coupon payment. The rate is in basis points.
    pub fn set_coupon(
        &mut self,
        ctx: &TransactionContext,
        record_date: Timestamp,
        execution_date: Timestamp,
        rate: u64,
    ) -> Result<u64, TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::CorporateActions, &ctx.caller)?;
        let id = self.actions.set_coupon(record_date, execution_date, rate, ctx.now)?;
        self.snapshots.schedule(record_date);
        self.events.push(TokenEvent::CouponSet {
            coupon_id: id,
            record_date,
            execution_date,
            rate,
        });
        Ok(id)
    }

    /// Schedule a voting record.
    pub fn set_voting(
        &mut self,
        ctx: &TransactionContext,
        record_date: Timestamp,
        data: Vec<u8>,
    ) -> Result<u64, TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::CorporateActions, &ctx.caller)?;
        let id = self.actions.set_voting(record_date, data.clone(), ctx.now)?;
        self.snapshots.schedule(record_date);
        self.events.push(TokenEvent::VotingSet {
            voting_id: id,
            record_date,
            data,
        });
        Ok(id)
    }

    pub fn dividend_count(&self) -> u64 {
        self.actions.dividend_count()
    }

    pub fn coupon_count(&self) -> u64 {
        self.actions.coupon_count()
    }

    pub fn voting_count(&self) -> u64 {
        self.actions.voting_count()
    }

    pub fn get_dividends(&self, id: u64) -> Result<&DividendRecord, TokenError> {
        self.actions.get_dividend(id)
    }

    pub fn get_coupon(&self, id: u64) -> Result<&CouponRecord, TokenError> {
        self.actions.get_coupon(id)
    }

    pub fn get_voting(&self, id: u64) -> Result<&VotingRecord, TokenError> {
        self.actions.get_voting(id)
    }

    /// A dividend record together with the holder's entitlement basis: the
    /// balance at the bound snapshot, or zero while unbound.
    pub fn get_dividends_for(
        &self,
        id: u64,
        holder: &AccountId,
    ) -> Result<DividendFor, TokenError> {
        let record = self.actions.get_dividend(id)?.clone();
        let reached = !record.snapshot_id.is_null();
        let token_balance = if reached {
            self.snapshots.balance_of_at(record.snapshot_id, holder)?
        } else {
            Amount::ZERO
        };
        Ok(DividendFor {
            record,
            record_date_reached: reached,
            token_balance,
        })
    }

    pub fn get_coupon_for(&self, id: u64, holder: &AccountId) -> Result<CouponFor, TokenError> {
        let record = self.actions.get_coupon(id)?.clone();
        let reached = !record.snapshot_id.is_null();
        let token_balance = if reached {
            self.snapshots.balance_of_at(record.snapshot_id, holder)?
        } else {
            Amount::ZERO
        };
        Ok(CouponFor {
            record,
            record_date_reached: reached,
            token_balance,
        })
    }

    pub fn get_voting_for(&self, id: u64, holder: &AccountId) -> Result<VotingFor, TokenError> {
        let record = self.actions.get_voting(id)?.clone();
        let reached = !record.snapshot_id.is_null();
        let token_balance = if reached {
            self.snapshots.balance_of_at(record.snapshot_id, holder)?
        } else {
            Amount::ZERO
        };
        Ok(VotingFor {
            record,
            record_date_reached: reached,
            token_balance,
        })
    }

    // --- documents ---

    pub fn set_document(
        &mut self,
        ctx: &TransactionContext,
        name: &str,
        uri: &str,
        hash: Vec<u8>,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::Documenter, &ctx.caller)?;
        self.documents.set_document(name, uri, hash.clone(), ctx.now)?;
        self.events.push(TokenEvent::DocumentUpdated {
            name: name.to_string(),
            uri: uri.to_string(),
            hash,
        });
        Ok(())
    }

    pub fn remove_document(
        &mut self,
        ctx: &TransactionContext,
        name: &str,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::Documenter, &ctx.caller)?;
        let removed = self.documents.remove_document(name)?;
        self.events.push(TokenEvent::DocumentRemoved {
            name: name.to_string(),
            uri: removed.uri,
            hash: removed.hash,
        });
        Ok(())
    }

    pub fn get_document(&self, name: &str) -> Result<&Document, TokenError> {
        self.documents.get_document(name)
    }

    pub fn document_count(&self) -> usize {
        self.documents.document_count()
    }

    pub fn document_names(&self) -> &[String] {
        self.documents.document_names()
    }

    // --- locks ---

    /// Lock part of a holder's default-partition balance until expiration.
    pub fn lock(
        &mut self,
        ctx: &TransactionContext,
        holder: AccountId,
        amount: Amount,
        expiration: Timestamp,
    ) -> Result<u64, TokenError> {
        self.pause.require_not_paused()?;
        self.access.require_role(Role::Locker, &ctx.caller)?;
        if amount.is_zero() {
            return Err(TokenError::ZeroValue);
        }
        let available = self.transferable_balance(&PartitionId::DEFAULT, &holder, ctx.now);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                holder,
                partition: PartitionId::DEFAULT,
                available,
                required: amount,
            });
        }
        let id = self.locks.create(holder, amount, expiration, ctx.now)?;
        debug!("locked {} for {} until {}", amount, holder, expiration);
        self.events.push(TokenEvent::LockCreated {
            lock_id: id,
            holder,
            amount,
            expiration,
        });
        Ok(id)
    }

    /// Release an expired lock, returning the amount to the holder's
    /// transferable balance. Unprivileged: releasing only ever benefits the
    /// holder.
    pub fn release_lock(
        &mut self,
        ctx: &TransactionContext,
        holder: AccountId,
        id: u64,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.locks.release(&holder, id, ctx.now)?;
        self.events.push(TokenEvent::LockReleased {
            lock_id: id,
            holder,
        });
        Ok(())
    }

    pub fn locked_amount(&self, holder: &AccountId, now: Timestamp) -> Amount {
        self.locks.locked_amount(holder, now)
    }

    pub fn get_lock(&self, holder: &AccountId, id: u64) -> Option<&LockEntry> {
        self.locks.get_lock(holder, id)
    }

    pub fn lock_ids(&self, holder: &AccountId) -> Vec<u64> {
        self.locks.lock_ids(holder)
    }

    // --- holds ---

    /// Place a hold on a holder's partition balance under an escrow. The
    /// caller must be the holder or an authorized operator.
    pub fn create_hold_by_partition(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        holder: AccountId,
        params: HoldParams,
    ) -> Result<u64, TokenError> {
        self.pause.require_not_paused()?;
        self.partition_valid(&partition)?;
        if !self
            .ledger
            .is_operator_for_partition(&partition, &ctx.caller, &holder)
        {
            return Err(TokenError::UnauthorizedOperator {
                operator: ctx.caller,
                holder,
            });
        }
        if params.amount.is_zero() {
            return Err(TokenError::ZeroValue);
        }
        let available = self.transferable_balance(&partition, &holder, ctx.now);
        if available < params.amount {
            return Err(TokenError::InsufficientBalance {
                holder,
                partition,
                available,
                required: params.amount,
            });
        }
        let amount = params.amount;
        let escrow = params.escrow;
        let expiration = params.expiration;
        let id = self.holds.create(partition, holder, params, ctx.now)?;
        debug!(
            "hold of {} created on {} for {} under escrow {}",
            amount, partition, holder, escrow
        );
        self.events.push(TokenEvent::HoldCreated {
            partition,
            hold_id: id,
            holder,
            escrow,
            amount,
            expiration,
        });
        Ok(id)
    }

    /// Execute a hold before expiry, moving the held amount to its
    /// destination. Only the escrow may execute. The hold's fixed
    /// destination wins; otherwise the supplied one is used, and with
    /// neither the funds settle to the escrow.
    pub fn execute_hold(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        holder: AccountId,
        id: u64,
        to: Option<AccountId>,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        let fixed = self
            .holds
            .get_hold(&partition, &holder, id)
            .and_then(|entry| entry.to);
        let destination = fixed.or(to).unwrap_or(ctx.caller);
        self.control_list.require_compliant(&destination)?;
        let settled = self
            .holds
            .execute(&partition, &holder, id, &ctx.caller, ctx.now)?;
        self.run_scheduled(ctx.now);
        self.ledger
            .transfer(partition, holder, destination, settled.amount)?;
        debug!(
            "hold {} on {} executed: {} -> {}",
            id, partition, holder, destination
        );
        self.events.push(TokenEvent::HoldExecuted {
            partition,
            hold_id: id,
            holder,
            to: destination,
            amount: settled.amount,
        });
        Ok(())
    }

    /// Cancel a hold before expiry, freeing the amount for the holder. Only
    /// the escrow may release.
    pub fn release_hold(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        holder: AccountId,
        id: u64,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.holds
            .release(&partition, &holder, id, &ctx.caller, ctx.now)?;
        self.events.push(TokenEvent::HoldReleased {
            partition,
            hold_id: id,
            holder,
        });
        Ok(())
    }

    /// Return an expired hold's amount to the holder. Unprivileged.
    pub fn reclaim_hold(
        &mut self,
        ctx: &TransactionContext,
        partition: PartitionId,
        holder: AccountId,
        id: u64,
    ) -> Result<(), TokenError> {
        self.pause.require_not_paused()?;
        self.holds.reclaim(&partition, &holder, id, ctx.now)?;
        self.events.push(TokenEvent::HoldReclaimed {
            partition,
            hold_id: id,
            holder,
        });
        Ok(())
    }

    pub fn held_amount(&self, partition: &PartitionId, holder: &AccountId) -> Amount {
        self.holds.held_amount(partition, holder)
    }

    pub fn get_hold(
        &self,
        partition: &PartitionId,
        holder: &AccountId,
        id: u64,
    ) -> Option<&HoldEntry> {
        self.holds.get_hold(partition, holder, id)
    }

    // --- shared checks ---

    fn require_controllable(&self) -> Result<(), TokenError> {
        if self.controllable {
            Ok(())
        } else {
            Err(TokenError::TokenIsNotControllable)
        }
    }

    fn partition_valid(&self, partition: &PartitionId) -> Result<(), TokenError> {
        if partition.is_zero() {
            return Err(TokenError::ZeroPartition);
        }
        if self.config.partition_mode == PartitionMode::Single
            && *partition != PartitionId::DEFAULT
        {
            return Err(TokenError::PartitionNotAllowedInSinglePartitionMode {
                partition: *partition,
            });
        }
        Ok(())
    }

    /// Partition-scoped operator consent is a multi-partition feature; on a
    /// single-partition token every scoped grant is rejected, the default
    /// partition included.
    fn partition_scoped_consent_valid(&self, partition: &PartitionId) -> Result<(), TokenError> {
        if self.config.partition_mode == PartitionMode::Single {
            return Err(TokenError::PartitionNotAllowedInSinglePartitionMode {
                partition: *partition,
            });
        }
        self.partition_valid(partition)
    }

    /// The single source of truth for transfer and redemption validity.
    /// Checks run in the documented precedence order; the first failure
    /// wins. `to` is `None` on the redemption path; `bypass_operator` is
    /// set on the controller path.
    #[allow(clippy::too_many_arguments)]
    fn transfer_code(
        &self,
        partition: &PartitionId,
        operator: &AccountId,
        from: &AccountId,
        to: Option<&AccountId>,
        amount: Amount,
        now: Timestamp,
        bypass_operator: bool,
    ) -> TransferCheckCode {
        if self.pause.is_paused() {
            return TransferCheckCode::TransfersPaused;
        }
        if self.partition_valid(partition).is_err() {
            return TransferCheckCode::InvalidPartition;
        }
        if !bypass_operator
            && !self
                .ledger
                .is_operator_for_partition(partition, operator, from)
        {
            return TransferCheckCode::InvalidOperator;
        }
        if !self.control_list.is_compliant(operator) {
            return TransferCheckCode::OperatorBlocked;
        }
        if let Some(to) = to {
            if !self.control_list.is_compliant(to) {
                return TransferCheckCode::ToBlocked;
            }
        }
        if !self.control_list.is_compliant(from) {
            return TransferCheckCode::FromBlocked;
        }
        // A positive amount out of a partition the source does not hold is
        // an invalid partition, not merely an insufficient balance.
        if !amount.is_zero()
            && self
                .ledger
                .balance_of_by_partition(partition, from)
                .is_zero()
        {
            return TransferCheckCode::InvalidPartition;
        }
        if self.transferable_balance(partition, from, now) < amount {
            return TransferCheckCode::InsufficientBalance;
        }
        if from.is_null() {
            return TransferCheckCode::FromAccountNull;
        }
        if let Some(to) = to {
            if to.is_null() {
                return TransferCheckCode::ToAccountNull;
            }
        }
        TransferCheckCode::Success
    }

    /// The mutating-path counterpart of [`Self::transfer_code`]: maps the
    /// first failing code to its specific error, re-deriving the detail
    /// fields.
    #[allow(clippy::too_many_arguments)]
    fn require_transfer(
        &self,
        partition: &PartitionId,
        operator: &AccountId,
        from: &AccountId,
        to: Option<&AccountId>,
        amount: Amount,
        now: Timestamp,
        bypass_operator: bool,
    ) -> Result<(), TokenError> {
        match self.transfer_code(partition, operator, from, to, amount, now, bypass_operator) {
            TransferCheckCode::Success => Ok(()),
            TransferCheckCode::TransfersPaused => Err(TokenError::TokenIsPaused),
            TransferCheckCode::InvalidPartition => {
                self.partition_valid(partition)?;
                Err(TokenError::InvalidPartition {
                    partition: *partition,
                })
            }
            TransferCheckCode::InvalidOperator => Err(TokenError::UnauthorizedOperator {
                operator: *operator,
                holder: *from,
            }),
            TransferCheckCode::OperatorBlocked => Err(TokenError::AccountIsBlocked {
                account: *operator,
            }),
            TransferCheckCode::ToBlocked => Err(TokenError::AccountIsBlocked {
                account: to.copied().unwrap_or(AccountId::NULL),
            }),
            TransferCheckCode::FromBlocked => {
                Err(TokenError::AccountIsBlocked { account: *from })
            }
            TransferCheckCode::InsufficientBalance => Err(TokenError::InsufficientBalance {
                holder: *from,
                partition: *partition,
                available: self.transferable_balance(partition, from, now),
                required: amount,
            }),
            TransferCheckCode::FromAccountNull => Err(TokenError::FromAccountNull),
            TransferCheckCode::ToAccountNull => Err(TokenError::ToAccountNull),
        }
    }

    /// The pre-mutation hook: materialize a scheduled snapshot when a
    /// pending record date has been reached, and bind the due corporate
    /// actions to it.
    fn run_scheduled(&mut self, now: Timestamp) {
        if let Some(id) = self.snapshots.trigger_scheduled(&self.ledger, now) {
            self.actions.bind_due(now, id);
            self.events.push(TokenEvent::SnapshotTriggered { id });
        }
    }
}
