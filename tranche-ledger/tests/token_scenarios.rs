//! End-to-end scenarios across the whole token facade: issuance, transfer
//! and redemption paths, compliance gating, supply ceilings, scheduled
//! snapshots, controller operations, locks and holds.

use tranche_core::{
    AccountId, Amount, PartitionId, Role, SnapshotId, Timestamp, TokenError, TokenEvent,
    TransferCheckCode,
};
use tranche_ledger::{
    ControlListType, HoldParams, PartitionMode, SecurityToken, TokenConfig, TokenConfigBuilder,
    TransactionContext,
};

fn admin() -> AccountId {
    AccountId::derive(&[b"admin"])
}

fn account(tag: &str) -> AccountId {
    AccountId::derive(&[b"account", tag.as_bytes()])
}

fn ctx_at(caller: AccountId, now: u64) -> TransactionContext {
    TransactionContext::new(caller, Timestamp(now))
}

/// A builder with every role granted to the admin account.
fn base_config(symbol: &str) -> TokenConfigBuilder {
    let mut builder = TokenConfig::builder(symbol, format!("{} Security", symbol));
    for role in Role::ALL {
        builder = builder.grant(role, admin());
    }
    builder
}

fn single_partition_token() -> SecurityToken {
    SecurityToken::new(base_config("SGL").build())
}

fn multi_partition_token() -> SecurityToken {
    SecurityToken::new(
        base_config("MLT")
            .partition_mode(PartitionMode::Multi)
            .build(),
    )
}

#[test]
fn issue_transfer_and_query_on_default_partition() {
    let mut token = single_partition_token();
    let carol = account("carol");
    let dave = account("dave");

    token
        .issue_by_partition(&ctx_at(admin(), 10), PartitionId::DEFAULT, carol, Amount(2), vec![])
        .unwrap();
    token
        .issue_by_partition(&ctx_at(admin(), 11), PartitionId::DEFAULT, carol, Amount(2), vec![])
        .unwrap();
    token
        .transfer_by_partition(&ctx_at(carol, 12), PartitionId::DEFAULT, dave, Amount(1), vec![])
        .unwrap();

    assert_eq!(token.balance_of(&carol), Amount(3));
    assert_eq!(token.balance_of(&dave), Amount(1));
    assert_eq!(token.total_supply(), Amount(4));
    assert_eq!(
        token.total_supply_by_partition(&PartitionId::DEFAULT),
        Amount(4)
    );
    assert_eq!(token.partitions_of(&carol), vec![PartitionId::DEFAULT]);

    // Self-initiated transfers carry the null operator in the event.
    let transfer = token
        .events()
        .iter()
        .find(|e| matches!(e, TokenEvent::TransferByPartition { .. }))
        .unwrap();
    assert_eq!(
        *transfer,
        TokenEvent::TransferByPartition {
            partition: PartitionId::DEFAULT,
            operator: AccountId::NULL,
            from: carol,
            to: dave,
            amount: Amount(1),
            data: vec![],
            operator_data: vec![],
        }
    );
}

#[test]
fn deny_list_blocks_each_party_with_its_own_code() {
    let mut token = single_partition_token();
    let alice = account("alice");
    let bob = account("bob");
    let blocked = account("blocked");

    for holder in [alice, blocked] {
        token
            .issue_by_partition(&ctx_at(admin(), 1), PartitionId::DEFAULT, holder, Amount(10), vec![])
            .unwrap();
    }
    token
        .add_to_control_list(&ctx_at(admin(), 2), blocked)
        .unwrap();

    // Blocked source acting for itself fails as a blocked operator: the
    // operator check precedes the from check and caller == from.
    let check =
        token.can_transfer_by_partition(&ctx_at(blocked, 3), &PartitionId::DEFAULT, &blocked, &bob, Amount(1));
    assert_eq!(check.code, TransferCheckCode::OperatorBlocked);
    assert_eq!(
        token
            .transfer_by_partition(&ctx_at(blocked, 3), PartitionId::DEFAULT, bob, Amount(1), vec![])
            .unwrap_err(),
        TokenError::AccountIsBlocked { account: blocked }
    );

    // Blocked recipient.
    let check =
        token.can_transfer_by_partition(&ctx_at(alice, 4), &PartitionId::DEFAULT, &alice, &blocked, Amount(1));
    assert_eq!(check.code, TransferCheckCode::ToBlocked);

    // Blocked source behind a clean operator.
    token.authorize_operator(&ctx_at(blocked, 5), alice).unwrap();
    let check = token.can_transfer_by_partition(
        &ctx_at(alice, 6),
        &PartitionId::DEFAULT,
        &blocked,
        &bob,
        Amount(1),
    );
    assert_eq!(check.code, TransferCheckCode::FromBlocked);

    // Issuance to a blocked account is refused too.
    assert_eq!(
        token
            .issue_by_partition(&ctx_at(admin(), 7), PartitionId::DEFAULT, blocked, Amount(1), vec![])
            .unwrap_err(),
        TokenError::AccountIsBlocked { account: blocked }
    );

    // Unblocking restores transfers.
    token
        .remove_from_control_list(&ctx_at(admin(), 8), &blocked)
        .unwrap();
    token
        .transfer_by_partition(&ctx_at(blocked, 9), PartitionId::DEFAULT, bob, Amount(1), vec![])
        .unwrap();
    assert_eq!(token.balance_of(&bob), Amount(1));
}

#[test]
fn allow_list_only_admits_members() {
    let mut token = SecurityToken::new(
        base_config("ALW")
            .control_list_type(ControlListType::Allow)
            .build(),
    );
    let member = account("member");
    let outsider = account("outsider");
    token
        .add_to_control_list(&ctx_at(admin(), 1), member)
        .unwrap();

    token
        .issue_by_partition(&ctx_at(admin(), 2), PartitionId::DEFAULT, member, Amount(5), vec![])
        .unwrap();
    assert_eq!(
        token
            .issue_by_partition(&ctx_at(admin(), 3), PartitionId::DEFAULT, outsider, Amount(5), vec![])
            .unwrap_err(),
        TokenError::AccountIsBlocked { account: outsider }
    );

    let check = token.can_transfer_by_partition(
        &ctx_at(member, 4),
        &PartitionId::DEFAULT,
        &member,
        &outsider,
        Amount(1),
    );
    assert_eq!(check.code, TransferCheckCode::ToBlocked);
}

#[test]
fn partition_cap_fails_before_global_headroom_is_used() {
    let mut token = SecurityToken::new(
        base_config("CAP")
            .max_supply(Amount(5))
            .max_supply_by_partition(PartitionId::DEFAULT, Amount(3))
            .build(),
    );
    let alice = account("alice");

    token
        .issue_by_partition(&ctx_at(admin(), 1), PartitionId::DEFAULT, alice, Amount(3), vec![])
        .unwrap();

    // Global ceiling has room for 2 more, but the partition is full.
    assert_eq!(
        token
            .issue_by_partition(&ctx_at(admin(), 2), PartitionId::DEFAULT, alice, Amount(1), vec![])
            .unwrap_err(),
        TokenError::MaxSupplyReachedForPartition {
            partition: PartitionId::DEFAULT,
            max: Amount(3),
        }
    );

    // Raising the partition ceiling exposes the global one.
    token
        .set_max_supply_by_partition(&ctx_at(admin(), 3), PartitionId::DEFAULT, Amount(10))
        .unwrap();
    assert_eq!(
        token
            .issue_by_partition(&ctx_at(admin(), 4), PartitionId::DEFAULT, alice, Amount(3), vec![])
            .unwrap_err(),
        TokenError::MaxSupplyReached { max: Amount(5) }
    );
    token
        .issue_by_partition(&ctx_at(admin(), 5), PartitionId::DEFAULT, alice, Amount(2), vec![])
        .unwrap();
    assert_eq!(token.total_supply(), Amount(5));
}

#[test]
fn scheduled_snapshot_binds_dividend_to_pre_mutation_state() {
    let mut token = single_partition_token();
    let alice = account("alice");
    let bob = account("bob");

    token
        .issue_by_partition(&ctx_at(admin(), 50), PartitionId::DEFAULT, alice, Amount(100), vec![])
        .unwrap();
    let dividend_id = token
        .set_dividends(&ctx_at(admin(), 100), Timestamp(200), Timestamp(300), Amount(2))
        .unwrap();
    assert_eq!(dividend_id, 1);

    // Before the record date the dividend is unbound.
    let entitlement = token.get_dividends_for(dividend_id, &alice).unwrap();
    assert!(!entitlement.record_date_reached);
    assert_eq!(entitlement.token_balance, Amount::ZERO);
    assert_eq!(entitlement.record.snapshot_id, SnapshotId::NULL);

    // A mutation before the record date triggers nothing.
    token
        .transfer_by_partition(&ctx_at(alice, 150), PartitionId::DEFAULT, bob, Amount(10), vec![])
        .unwrap();
    assert_eq!(token.snapshot_count(), 0);

    // The first mutation at or past the record date snapshots the
    // pre-mutation balances and binds the dividend.
    token
        .transfer_by_partition(&ctx_at(alice, 250), PartitionId::DEFAULT, bob, Amount(40), vec![])
        .unwrap();
    assert_eq!(token.snapshot_count(), 1);
    let entitlement = token.get_dividends_for(dividend_id, &alice).unwrap();
    assert!(entitlement.record_date_reached);
    assert_eq!(entitlement.record.snapshot_id, SnapshotId(1));
    // 90 held before the 40 moved, not the live 50.
    assert_eq!(entitlement.token_balance, Amount(90));
    assert_eq!(token.balance_of(&alice), Amount(50));

    // The trigger event precedes the transfer event.
    let events = token.events();
    let trigger = events
        .iter()
        .position(|e| matches!(e, TokenEvent::SnapshotTriggered { .. }))
        .unwrap();
    let last_transfer = events
        .iter()
        .rposition(|e| matches!(e, TokenEvent::TransferByPartition { .. }))
        .unwrap();
    assert!(trigger < last_transfer);

    // No further snapshot for later mutations.
    token
        .transfer_by_partition(&ctx_at(alice, 260), PartitionId::DEFAULT, bob, Amount(1), vec![])
        .unwrap();
    assert_eq!(token.snapshot_count(), 1);
}

#[test]
fn one_snapshot_serves_all_due_record_dates() {
    let mut token = single_partition_token();
    let alice = account("alice");
    token
        .issue_by_partition(&ctx_at(admin(), 10), PartitionId::DEFAULT, alice, Amount(10), vec![])
        .unwrap();

    token
        .set_dividends(&ctx_at(admin(), 20), Timestamp(100), Timestamp(400), Amount(1))
        .unwrap();
    token
        .set_coupon(&ctx_at(admin(), 20), Timestamp(150), Timestamp(400), 250)
        .unwrap();
    token
        .set_voting(&ctx_at(admin(), 20), Timestamp(150), vec![7])
        .unwrap();

    // Both record dates pass before the next mutation; one snapshot binds
    // all three records.
    token
        .redeem_by_partition(&ctx_at(alice, 200), PartitionId::DEFAULT, Amount(1), vec![])
        .unwrap();
    assert_eq!(token.snapshot_count(), 1);
    assert_eq!(token.get_dividends(1).unwrap().snapshot_id, SnapshotId(1));
    assert_eq!(token.get_coupon(1).unwrap().snapshot_id, SnapshotId(1));
    assert_eq!(token.get_voting(1).unwrap().snapshot_id, SnapshotId(1));
    assert_eq!(
        token.get_coupon_for(1, &alice).unwrap().token_balance,
        Amount(10)
    );
}

#[test]
fn manual_snapshots_are_immutable() {
    let mut token = single_partition_token();
    let alice = account("alice");
    token
        .issue_by_partition(&ctx_at(admin(), 10), PartitionId::DEFAULT, alice, Amount(7), vec![])
        .unwrap();

    let id = token.take_snapshot(&ctx_at(admin(), 20)).unwrap();
    token
        .issue_by_partition(&ctx_at(admin(), 30), PartitionId::DEFAULT, alice, Amount(3), vec![])
        .unwrap();

    assert_eq!(token.balance_of_at_snapshot(id, &alice).unwrap(), Amount(7));
    assert_eq!(token.total_supply_at_snapshot(id).unwrap(), Amount(7));
    assert_eq!(token.balance_of(&alice), Amount(10));
    assert_eq!(
        token.balance_of_at_snapshot(SnapshotId(2), &alice).unwrap_err(),
        TokenError::SnapshotIdDoesNotExists {
            id: SnapshotId(2),
            latest: SnapshotId(1),
        }
    );
    assert!(token
        .events()
        .iter()
        .any(|e| matches!(e, TokenEvent::SnapshotTaken { id: SnapshotId(1) })));
}

#[test]
fn multi_partition_mode_tracks_partitions_independently() {
    let mut token = multi_partition_token();
    let alice = account("alice");
    let senior = PartitionId::from_label("senior");
    let junior = PartitionId::from_label("junior");

    token
        .issue_by_partition(&ctx_at(admin(), 1), senior, alice, Amount(5), vec![])
        .unwrap();
    token
        .issue_by_partition(&ctx_at(admin(), 2), junior, alice, Amount(3), vec![])
        .unwrap();

    assert_eq!(token.balance_of(&alice), Amount(8));
    assert_eq!(token.balance_of_by_partition(&senior, &alice), Amount(5));
    assert_eq!(token.partitions_of(&alice), vec![senior, junior]);
    assert_eq!(token.total_supply_by_partition(&junior), Amount(3));

    // Partition-scoped operators only act on their partition.
    let op = account("op");
    token
        .authorize_operator_by_partition(&ctx_at(alice, 3), senior, op)
        .unwrap();
    token
        .operator_transfer_by_partition(
            &ctx_at(op, 4),
            senior,
            alice,
            account("bob"),
            Amount(1),
            vec![],
            vec![],
        )
        .unwrap();
    let check = token.can_transfer_by_partition(
        &ctx_at(op, 5),
        &junior,
        &alice,
        &account("bob"),
        Amount(1),
    );
    assert_eq!(check.code, TransferCheckCode::InvalidOperator);

    // Single-partition controller wrappers are unavailable.
    assert_eq!(
        token
            .controller_transfer(&ctx_at(admin(), 6), alice, account("bob"), Amount(1), vec![], vec![])
            .unwrap_err(),
        TokenError::NotAllowedInMultiPartitionMode
    );
    assert_eq!(
        token
            .controller_redeem(&ctx_at(admin(), 7), alice, Amount(1), vec![], vec![])
            .unwrap_err(),
        TokenError::NotAllowedInMultiPartitionMode
    );

    // The by-partition controller operations still work.
    token
        .controller_transfer_by_partition(
            &ctx_at(admin(), 8),
            junior,
            alice,
            account("bob"),
            Amount(2),
            vec![],
            vec![b'x'],
        )
        .unwrap();
    assert_eq!(token.balance_of_by_partition(&junior, &account("bob")), Amount(2));
}

#[test]
fn controller_bypasses_consent_but_not_compliance() {
    let mut token = single_partition_token();
    let alice = account("alice");
    let bob = account("bob");
    token
        .issue_by_partition(&ctx_at(admin(), 1), PartitionId::DEFAULT, alice, Amount(10), vec![])
        .unwrap();

    // No operator authorization from alice, yet the controller moves funds.
    token
        .controller_transfer(&ctx_at(admin(), 2), alice, bob, Amount(4), vec![], vec![b'c'])
        .unwrap();
    assert_eq!(token.balance_of(&bob), Amount(4));
    assert!(token.events().iter().any(|e| matches!(
        e,
        TokenEvent::ControllerTransfer { amount: Amount(4), .. }
    )));

    // A blocked recipient still stops the controller.
    token.add_to_control_list(&ctx_at(admin(), 3), bob).unwrap();
    assert_eq!(
        token
            .controller_transfer(&ctx_at(admin(), 4), alice, bob, Amount(1), vec![], vec![])
            .unwrap_err(),
        TokenError::AccountIsBlocked { account: bob }
    );

    token
        .controller_redeem(&ctx_at(admin(), 5), alice, Amount(6), vec![], vec![])
        .unwrap();
    assert_eq!(token.balance_of(&alice), Amount::ZERO);
    assert_eq!(token.total_supply(), Amount(4));
}

#[test]
fn pause_outranks_every_other_failure() {
    let mut token = single_partition_token();
    let blocked = account("blocked");
    token
        .add_to_control_list(&ctx_at(admin(), 1), blocked)
        .unwrap();
    token.pause(&ctx_at(admin(), 2)).unwrap();

    // Blocked caller with no balance on an invalid partition: the dry run
    // still reports the pause first.
    let check = token.can_transfer_by_partition(
        &ctx_at(blocked, 3),
        &PartitionId::ZERO,
        &blocked,
        &account("bob"),
        Amount(1),
    );
    assert_eq!(check.code, TransferCheckCode::TransfersPaused);

    // Issuance and locks are paused as well.
    assert_eq!(
        token
            .issue_by_partition(&ctx_at(admin(), 4), PartitionId::DEFAULT, account("a"), Amount(1), vec![])
            .unwrap_err(),
        TokenError::TokenIsPaused
    );
    assert_eq!(
        token
            .lock(&ctx_at(admin(), 5), account("a"), Amount(1), Timestamp(100))
            .unwrap_err(),
        TokenError::TokenIsPaused
    );
}

#[test]
fn pause_freezes_every_state_changing_command() {
    let mut token = single_partition_token();
    let alice = account("alice");
    let bob = account("bob");
    token
        .issue_by_partition(&ctx_at(admin(), 1), PartitionId::DEFAULT, alice, Amount(10), vec![])
        .unwrap();
    let lock_id = token
        .lock(&ctx_at(admin(), 2), alice, Amount(2), Timestamp(50))
        .unwrap();
    let events_before = token.events().len() + 1;
    token.pause(&ctx_at(admin(), 3)).unwrap();

    // Administration and corporate actions are frozen, not just transfers.
    assert_eq!(
        token
            .add_to_control_list(&ctx_at(admin(), 4), bob)
            .unwrap_err(),
        TokenError::TokenIsPaused
    );
    assert_eq!(
        token
            .set_dividends(&ctx_at(admin(), 4), Timestamp(100), Timestamp(200), Amount(1))
            .unwrap_err(),
        TokenError::TokenIsPaused
    );
    assert_eq!(
        token
            .grant_role(&ctx_at(admin(), 4), Role::Issuer, bob)
            .unwrap_err(),
        TokenError::TokenIsPaused
    );
    assert_eq!(
        token
            .set_max_supply(&ctx_at(admin(), 4), Amount(100))
            .unwrap_err(),
        TokenError::TokenIsPaused
    );
    assert_eq!(
        token.take_snapshot(&ctx_at(admin(), 4)).unwrap_err(),
        TokenError::TokenIsPaused
    );
    assert_eq!(
        token
            .set_document(&ctx_at(admin(), 4), "terms", "ipfs://terms", vec![1])
            .unwrap_err(),
        TokenError::TokenIsPaused
    );
    assert_eq!(
        token.authorize_operator(&ctx_at(alice, 4), bob).unwrap_err(),
        TokenError::TokenIsPaused
    );
    assert_eq!(
        token.release_lock(&ctx_at(alice, 60), alice, lock_id).unwrap_err(),
        TokenError::TokenIsPaused
    );
    assert_eq!(
        token
            .controller_redeem(&ctx_at(admin(), 4), alice, Amount(1), vec![], vec![])
            .unwrap_err(),
        TokenError::TokenIsPaused
    );

    // Nothing leaked into the state or the event log while frozen.
    assert!(!token.is_in_control_list(&bob));
    assert_eq!(token.dividend_count(), 0);
    assert_eq!(token.snapshot_count(), 0);
    assert_eq!(token.events().len(), events_before);

    // Unpause is the one command that works, and it reopens everything.
    token.unpause(&ctx_at(admin(), 5)).unwrap();
    token.add_to_control_list(&ctx_at(admin(), 6), bob).unwrap();
    token
        .set_dividends(&ctx_at(admin(), 6), Timestamp(100), Timestamp(200), Amount(1))
        .unwrap();
    token.release_lock(&ctx_at(alice, 60), alice, lock_id).unwrap();
}

#[test]
fn single_partition_mode_rejects_scoped_consent() {
    let mut token = single_partition_token();
    let alice = account("alice");
    let op = account("op");
    assert_eq!(
        token
            .authorize_operator_by_partition(&ctx_at(alice, 1), PartitionId::DEFAULT, op)
            .unwrap_err(),
        TokenError::PartitionNotAllowedInSinglePartitionMode {
            partition: PartitionId::DEFAULT,
        }
    );

    // Token-wide consent remains the single-partition mechanism.
    token.authorize_operator(&ctx_at(alice, 2), op).unwrap();
    assert!(token.is_operator(&op, &alice));
}

#[test]
fn failed_operations_leave_no_partial_state() {
    let mut token = single_partition_token();
    let alice = account("alice");
    let bob = account("bob");
    token
        .issue_by_partition(&ctx_at(admin(), 1), PartitionId::DEFAULT, alice, Amount(3), vec![])
        .unwrap();
    let events_before = token.events().len();

    assert!(token
        .transfer_by_partition(&ctx_at(alice, 2), PartitionId::DEFAULT, bob, Amount(5), vec![])
        .is_err());

    assert_eq!(token.balance_of(&alice), Amount(3));
    assert_eq!(token.balance_of(&bob), Amount::ZERO);
    assert_eq!(token.total_supply(), Amount(3));
    assert_eq!(token.events().len(), events_before);
}

#[test]
fn locks_reduce_transferable_but_not_total_balance() {
    let mut token = single_partition_token();
    let alice = account("alice");
    token
        .issue_by_partition(&ctx_at(admin(), 1), PartitionId::DEFAULT, alice, Amount(8), vec![])
        .unwrap();

    let lock_id = token
        .lock(&ctx_at(admin(), 10), alice, Amount(5), Timestamp(100))
        .unwrap();
    assert_eq!(token.balance_of(&alice), Amount(8));
    assert_eq!(token.locked_amount(&alice, Timestamp(10)), Amount(5));
    assert_eq!(
        token.transferable_balance(&PartitionId::DEFAULT, &alice, Timestamp(10)),
        Amount(3)
    );

    // Dipping into the locked part fails with the unlocked remainder as
    // the available figure.
    assert_eq!(
        token
            .transfer_by_partition(&ctx_at(alice, 20), PartitionId::DEFAULT, account("bob"), Amount(4), vec![])
            .unwrap_err(),
        TokenError::InsufficientBalance {
            holder: alice,
            partition: PartitionId::DEFAULT,
            available: Amount(3),
            required: Amount(4),
        }
    );
    token
        .transfer_by_partition(&ctx_at(alice, 20), PartitionId::DEFAULT, account("bob"), Amount(3), vec![])
        .unwrap();

    // A second lock cannot exceed what is unlocked.
    assert!(matches!(
        token
            .lock(&ctx_at(admin(), 30), alice, Amount(1), Timestamp(100))
            .unwrap_err(),
        TokenError::InsufficientBalance { .. }
    ));

    // Early release fails; after expiry the funds move again.
    assert_eq!(
        token.release_lock(&ctx_at(alice, 50), alice, lock_id).unwrap_err(),
        TokenError::LockNotExpired { id: lock_id }
    );
    token.release_lock(&ctx_at(alice, 100), alice, lock_id).unwrap();
    assert_eq!(token.locked_amount(&alice, Timestamp(100)), Amount::ZERO);
    token
        .transfer_by_partition(&ctx_at(alice, 110), PartitionId::DEFAULT, account("bob"), Amount(5), vec![])
        .unwrap();
    assert_eq!(token.balance_of(&alice), Amount::ZERO);
}

#[test]
fn hold_lifecycle_execute_release_and_reclaim() {
    let mut token = multi_partition_token();
    let alice = account("alice");
    let bob = account("bob");
    let escrow = account("escrow");
    let senior = PartitionId::from_label("senior");
    token
        .issue_by_partition(&ctx_at(admin(), 1), senior, alice, Amount(10), vec![])
        .unwrap();

    let params = |amount: u64, to: Option<AccountId>| HoldParams {
        amount: Amount(amount),
        escrow,
        to,
        expiration: Timestamp(100),
        data: vec![],
    };

    // A stranger cannot place a hold on alice's balance.
    assert!(matches!(
        token
            .create_hold_by_partition(&ctx_at(bob, 5), senior, alice, params(2, None))
            .unwrap_err(),
        TokenError::UnauthorizedOperator { .. }
    ));

    let h1 = token
        .create_hold_by_partition(&ctx_at(alice, 5), senior, alice, params(4, Some(bob)))
        .unwrap();
    let h2 = token
        .create_hold_by_partition(&ctx_at(alice, 6), senior, alice, params(3, None))
        .unwrap();
    assert_eq!(token.held_amount(&senior, &alice), Amount(7));
    assert_eq!(
        token.transferable_balance(&senior, &alice, Timestamp(6)),
        Amount(3)
    );

    // Only the escrow executes, and the fixed destination wins.
    assert_eq!(
        token
            .execute_hold(&ctx_at(alice, 10), senior, alice, h1, None)
            .unwrap_err(),
        TokenError::UnauthorizedEscrow { account: alice }
    );
    token
        .execute_hold(&ctx_at(escrow, 10), senior, alice, h1, None)
        .unwrap();
    assert_eq!(token.balance_of_by_partition(&senior, &bob), Amount(4));
    assert_eq!(token.held_amount(&senior, &alice), Amount(3));

    // The second hold is released back by the escrow.
    token.release_hold(&ctx_at(escrow, 20), senior, alice, h2).unwrap();
    assert_eq!(token.held_amount(&senior, &alice), Amount::ZERO);
    assert_eq!(
        token.transferable_balance(&senior, &alice, Timestamp(20)),
        Amount(6)
    );

    // An expired hold can only be reclaimed.
    let h3 = token
        .create_hold_by_partition(&ctx_at(alice, 30), senior, alice, params(2, None))
        .unwrap();
    assert_eq!(
        token
            .execute_hold(&ctx_at(escrow, 100), senior, alice, h3, None)
            .unwrap_err(),
        TokenError::HoldExpired { id: h3 }
    );
    assert_eq!(
        token
            .reclaim_hold(&ctx_at(bob, 50), senior, alice, h3)
            .unwrap_err(),
        TokenError::HoldNotExpired { id: h3 }
    );
    token.reclaim_hold(&ctx_at(bob, 100), senior, alice, h3).unwrap();
    assert_eq!(token.held_amount(&senior, &alice), Amount::ZERO);
    assert_eq!(token.balance_of_by_partition(&senior, &alice), Amount(6));
}

#[test]
fn redeem_dry_run_matches_mutating_error() {
    let mut token = single_partition_token();
    let alice = account("alice");
    token
        .issue_by_partition(&ctx_at(admin(), 1), PartitionId::DEFAULT, alice, Amount(2), vec![])
        .unwrap();

    let check =
        token.can_redeem_by_partition(&ctx_at(alice, 2), &PartitionId::DEFAULT, &alice, Amount(5));
    assert!(!check.allowed);
    assert_eq!(check.code, TransferCheckCode::InsufficientBalance);
    assert!(matches!(
        token
            .redeem_by_partition(&ctx_at(alice, 2), PartitionId::DEFAULT, Amount(5), vec![])
            .unwrap_err(),
        TokenError::InsufficientBalance { .. }
    ));

    token
        .redeem_by_partition(&ctx_at(alice, 3), PartitionId::DEFAULT, Amount(2), vec![])
        .unwrap();
    assert_eq!(token.total_supply(), Amount::ZERO);
}

#[test]
fn documents_are_role_gated_and_evented() {
    let mut token = single_partition_token();
    let outsider = account("outsider");
    assert!(matches!(
        token
            .set_document(&ctx_at(outsider, 1), "terms", "ipfs://terms", vec![1])
            .unwrap_err(),
        TokenError::AccountHasNoRole { .. }
    ));

    token
        .set_document(&ctx_at(admin(), 2), "terms", "ipfs://terms", vec![1, 2])
        .unwrap();
    assert_eq!(token.get_document("terms").unwrap().uri, "ipfs://terms");
    assert_eq!(token.document_names(), ["terms".to_string()]);

    token.remove_document(&ctx_at(admin(), 3), "terms").unwrap();
    assert_eq!(token.document_count(), 0);
    assert!(token.events().iter().any(|e| matches!(
        e,
        TokenEvent::DocumentRemoved { hash, .. } if hash == &vec![1, 2]
    )));
}

#[test]
fn role_grants_flow_through_admin() {
    let mut token = single_partition_token();
    let issuer = account("issuer");
    let alice = account("alice");

    token
        .grant_role(&ctx_at(admin(), 1), Role::Issuer, issuer)
        .unwrap();
    token
        .issue_by_partition(&ctx_at(issuer, 2), PartitionId::DEFAULT, alice, Amount(1), vec![])
        .unwrap();

    token
        .revoke_role(&ctx_at(admin(), 3), Role::Issuer, &issuer)
        .unwrap();
    assert!(matches!(
        token
            .issue_by_partition(&ctx_at(issuer, 4), PartitionId::DEFAULT, alice, Amount(1), vec![])
            .unwrap_err(),
        TokenError::AccountHasNoRole { .. }
    ));

    // A non-admin cannot hand out roles.
    assert!(matches!(
        token
            .grant_role(&ctx_at(issuer, 5), Role::Pauser, issuer)
            .unwrap_err(),
        TokenError::AccountHasNoRole { .. }
    ));
}
