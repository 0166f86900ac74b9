//! End-to-end ledger flows: admission, transfer, destruction, withdrawal.

use lib_ledger::policy::DEFAULT_FEE;
use lib_ledger::{
    FundsTransfer, LedgerConfig, LedgerError, LedgerResult, RecordLedger,
};
use lib_types::{Address, Amount, RecordId};

fn addr(id: u8) -> Address {
    Address::new([id; 32])
}

const OWNER: Address = Address::new([1u8; 32]);
const NOW: u64 = 1_700_000_000;

fn new_ledger() -> RecordLedger {
    RecordLedger::new(OWNER, LedgerConfig::default())
}

fn mint_as(
    ledger: &mut RecordLedger,
    caller: Address,
    paid: Amount,
    content: &[u8],
) -> LedgerResult<RecordId> {
    ledger.mint(
        caller,
        paid,
        NOW,
        content.to_vec(),
        "title".to_string(),
        "description".to_string(),
        "ref://meta".to_string(),
    )
}

/// Transfer sink that records calls and can be told to fail
struct MockTransfer {
    calls: Vec<(Address, Amount)>,
    fail: bool,
}

impl MockTransfer {
    fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail: false,
        }
    }
}

impl FundsTransfer for MockTransfer {
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), String> {
        if self.fail {
            return Err("rejected".to_string());
        }
        self.calls.push((*to, amount));
        Ok(())
    }
}

// ============================================================================
// Uniqueness
// ============================================================================

#[test]
fn mint_hello_then_duplicate_fails_for_any_caller() {
    let mut ledger = new_ledger();

    // Exact-fee mint succeeds and returns id 1
    let id = mint_as(&mut ledger, addr(2), 10, b"hello").unwrap();
    assert_eq!(id, 1);
    assert!(ledger.content_exists(b"hello"));
    assert_eq!(ledger.stats().live_supply, 1);

    // Same content again, any payment, any caller: DuplicateContent
    let err = mint_as(&mut ledger, addr(2), 1_000, b"hello").unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateContent(_)));
    let err = mint_as(&mut ledger, addr(3), 1_000, b"hello").unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateContent(_)));

    // Duplicate inside a later batch also fails
    let err = ledger
        .batch_mint(
            addr(4),
            DEFAULT_FEE * 2,
            NOW,
            vec![b"fresh".to_vec(), b"hello".to_vec()],
            vec!["t1".to_string(), "t2".to_string()],
            vec![String::new(), String::new()],
            vec!["m1".to_string(), "m2".to_string()],
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateContent(_)));
    assert_eq!(ledger.stats().live_supply, 1);
}

// ============================================================================
// Supply bound
// ============================================================================

#[test]
fn live_supply_never_exceeds_max() {
    let mut ledger = new_ledger();
    ledger.set_max_supply(OWNER, 3).unwrap();

    for i in 0..3u8 {
        mint_as(&mut ledger, addr(2), DEFAULT_FEE, &[i]).unwrap();
    }
    let err = mint_as(&mut ledger, addr(2), DEFAULT_FEE, b"fourth").unwrap_err();
    assert_eq!(
        err,
        LedgerError::SupplyExceeded {
            max: 3,
            would_have: 4
        }
    );
    assert_eq!(ledger.stats().live_supply, 3);

    // Lowering below the live count is refused
    assert_eq!(
        ledger.set_max_supply(OWNER, 2).unwrap_err(),
        LedgerError::SupplyTooLow { live: 3, requested: 2 }
    );

    // Destroying one frees headroom under the same cap
    ledger.destroy(addr(2), 1).unwrap();
    mint_as(&mut ledger, addr(2), DEFAULT_FEE, b"fourth").unwrap();
    assert_eq!(ledger.stats().live_supply, 3);
}

// ============================================================================
// Holding bound
// ============================================================================

#[test]
fn third_mint_exceeds_holding_cap_of_two() {
    let mut ledger = new_ledger();
    ledger.set_max_holding_per_holder(OWNER, 2).unwrap();

    let holder = addr(7);
    mint_as(&mut ledger, holder, DEFAULT_FEE, b"one").unwrap();
    mint_as(&mut ledger, holder, DEFAULT_FEE, b"two").unwrap();

    let err = mint_as(&mut ledger, holder, DEFAULT_FEE, b"three").unwrap_err();
    assert_eq!(
        err,
        LedgerError::HoldingExceeded {
            max: 2,
            would_have: 3
        }
    );
    assert_eq!(ledger.get_by_holder(holder).unwrap().len(), 2);

    // Transferring one out restores headroom
    ledger.transfer(holder, 1, addr(8)).unwrap();
    mint_as(&mut ledger, holder, DEFAULT_FEE, b"three").unwrap();
}

// ============================================================================
// Batch atomicity
// ============================================================================

#[test]
fn failing_batch_leaves_state_untouched() {
    let mut ledger = new_ledger();
    mint_as(&mut ledger, addr(2), DEFAULT_FEE, b"existing").unwrap();
    ledger.take_events();

    let stats_before = ledger.stats();
    let held_before = ledger.get_by_holder(addr(3)).unwrap();

    // Item 3 collides with existing content; items 1-2 are valid
    let err = ledger
        .batch_mint(
            addr(3),
            DEFAULT_FEE * 3,
            NOW,
            vec![b"a".to_vec(), b"b".to_vec(), b"existing".to_vec()],
            vec!["t".to_string(); 3],
            vec![String::new(); 3],
            vec!["m".to_string(); 3],
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateContent(_)));

    // Zero new records, zero new fingerprints, unchanged counts, no events
    assert_eq!(ledger.stats(), stats_before);
    assert_eq!(ledger.get_by_holder(addr(3)).unwrap(), held_before);
    assert!(!ledger.content_exists(b"a"));
    assert!(!ledger.content_exists(b"b"));
    assert!(ledger.take_events().is_empty());

    // The valid items mint fine on their own afterwards
    let ids = ledger
        .batch_mint(
            addr(3),
            DEFAULT_FEE * 2,
            NOW,
            vec![b"a".to_vec(), b"b".to_vec()],
            vec!["t".to_string(); 2],
            vec![String::new(); 2],
            vec!["m".to_string(); 2],
        )
        .unwrap();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn batch_with_internal_duplicate_is_rejected_whole() {
    let mut ledger = new_ledger();
    let err = ledger
        .batch_mint(
            addr(3),
            DEFAULT_FEE * 2,
            NOW,
            vec![b"same".to_vec(), b"same".to_vec()],
            vec!["t".to_string(); 2],
            vec![String::new(); 2],
            vec!["m".to_string(); 2],
        )
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateContent(_)));
    assert_eq!(ledger.stats().live_supply, 0);
    assert!(!ledger.content_exists(b"same"));
}

#[test]
fn batch_input_shape_is_validated() {
    let mut ledger = new_ledger();

    let err = ledger
        .batch_mint(
            addr(3),
            DEFAULT_FEE,
            NOW,
            vec![b"a".to_vec()],
            vec!["t".to_string(), "extra".to_string()],
            vec![String::new()],
            vec!["m".to_string()],
        )
        .unwrap_err();
    assert_eq!(err, LedgerError::ArrayLengthMismatch);

    let err = ledger
        .batch_mint(addr(3), 0, NOW, vec![], vec![], vec![], vec![])
        .unwrap_err();
    assert_eq!(err, LedgerError::EmptyBatch);

    ledger.set_max_batch_size(OWNER, 2).unwrap();
    let err = ledger
        .batch_mint(
            addr(3),
            DEFAULT_FEE * 3,
            NOW,
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()],
            vec!["t".to_string(); 3],
            vec![String::new(); 3],
            vec!["m".to_string(); 3],
        )
        .unwrap_err();
    assert_eq!(err, LedgerError::BatchTooLarge { len: 3, max: 2 });
}

#[test]
fn batch_payment_is_checked_against_fee_times_n() {
    let mut ledger = new_ledger();
    let err = ledger
        .batch_mint(
            addr(3),
            DEFAULT_FEE * 2 - 1,
            NOW,
            vec![b"a".to_vec(), b"b".to_vec()],
            vec!["t".to_string(); 2],
            vec![String::new(); 2],
            vec!["m".to_string(); 2],
        )
        .unwrap_err();
    assert_eq!(
        err,
        LedgerError::InsufficientPayment {
            paid: DEFAULT_FEE * 2 - 1,
            required: DEFAULT_FEE * 2
        }
    );
}

#[test]
fn batch_event_fee_shares_sum_to_vaulted_payment() {
    let mut ledger = new_ledger();

    // Overpay an odd amount so the integer split leaves a remainder
    let paid = DEFAULT_FEE * 2 + 5;
    ledger
        .batch_mint(
            addr(3),
            paid,
            NOW,
            vec![b"a".to_vec(), b"b".to_vec()],
            vec!["t".to_string(); 2],
            vec![String::new(); 2],
            vec!["m".to_string(); 2],
        )
        .unwrap();

    let shares: Vec<Amount> = ledger
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            lib_ledger::LedgerEvent::RecordMinted { fee_paid, .. } => Some(fee_paid),
            _ => None,
        })
        .collect();
    assert_eq!(shares.len(), 2);
    assert_eq!(shares.iter().sum::<Amount>(), paid);
    // The first record carries the remainder of the split
    assert_eq!(shares[0], paid - shares[1]);
    assert_eq!(ledger.stats().vault_balance, paid);
}

// ============================================================================
// View monotonicity
// ============================================================================

#[test]
fn view_counts_run_one_to_n_without_gaps() {
    let mut ledger = new_ledger();
    let id = mint_as(&mut ledger, addr(2), DEFAULT_FEE, b"viewme").unwrap();
    ledger.take_events();

    let n = 10;
    for _ in 0..n {
        let content = ledger.get_content(id).unwrap();
        assert_eq!(content, b"viewme");
    }

    let views: Vec<u64> = ledger
        .take_events()
        .into_iter()
        .filter_map(|e| match e {
            lib_ledger::LedgerEvent::ContentViewed { views, .. } => Some(views),
            _ => None,
        })
        .collect();
    assert_eq!(views, (1..=n).collect::<Vec<u64>>());
    assert_eq!(ledger.get_record(id).unwrap().views, n);
}

// ============================================================================
// Transfer consistency
// ============================================================================

#[test]
fn transfer_updates_held_sets_and_preserves_created_sets() {
    let mut ledger = new_ledger();
    let a = addr(2);
    let b = addr(3);

    let id1 = mint_as(&mut ledger, a, DEFAULT_FEE, b"one").unwrap();
    let id2 = mint_as(&mut ledger, a, DEFAULT_FEE, b"two").unwrap();

    ledger.transfer(a, id1, b).unwrap();

    assert_eq!(ledger.get_by_holder(a).unwrap(), vec![id2]);
    assert_eq!(ledger.get_by_holder(b).unwrap(), vec![id1]);
    // Creator enumeration is unchanged by the transfer
    assert_eq!(ledger.get_by_creator(a).unwrap(), vec![id1, id2]);
    assert_eq!(ledger.get_by_creator(b).unwrap(), Vec::<RecordId>::new());

    // Only the current holder may transfer
    assert_eq!(
        ledger.transfer(a, id1, addr(4)).unwrap_err(),
        LedgerError::NotOwner(id1)
    );
}

#[test]
fn transfer_into_full_holder_is_rejected() {
    let mut ledger = new_ledger();
    ledger.set_max_holding_per_holder(OWNER, 1).unwrap();

    let a = addr(2);
    let b = addr(3);
    let id = mint_as(&mut ledger, a, DEFAULT_FEE, b"one").unwrap();
    mint_as(&mut ledger, b, DEFAULT_FEE, b"two").unwrap();

    // The holding bound holds at all times: b is already at the cap
    assert_eq!(
        ledger.transfer(a, id, b).unwrap_err(),
        LedgerError::HoldingExceeded {
            max: 1,
            would_have: 2
        }
    );
    assert_eq!(ledger.get_by_holder(a).unwrap(), vec![id]);

    // Authorization wins over capacity: a non-holder attempting the same
    // transfer is told NotOwner, not HoldingExceeded
    assert_eq!(
        ledger.transfer(addr(4), id, b).unwrap_err(),
        LedgerError::NotOwner(id)
    );
}

#[test]
fn enumeration_rejects_zero_identity() {
    let ledger = new_ledger();
    assert_eq!(
        ledger.get_by_holder(Address::zero()).unwrap_err(),
        LedgerError::InvalidAddress
    );
    assert_eq!(
        ledger.get_by_creator(Address::zero()).unwrap_err(),
        LedgerError::InvalidAddress
    );
}

// ============================================================================
// Pause gate
// ============================================================================

#[test]
fn pause_blocks_mutations_and_unpause_restores_them() {
    let mut ledger = new_ledger();
    let id = mint_as(&mut ledger, addr(2), DEFAULT_FEE, b"before").unwrap();

    ledger.pause(OWNER).unwrap();
    assert_eq!(
        mint_as(&mut ledger, addr(2), DEFAULT_FEE, b"during").unwrap_err(),
        LedgerError::ContractPaused
    );
    assert_eq!(
        ledger.transfer(addr(2), id, addr(3)).unwrap_err(),
        LedgerError::ContractPaused
    );
    assert_eq!(
        ledger
            .batch_mint(
                addr(2),
                DEFAULT_FEE,
                NOW,
                vec![b"during".to_vec()],
                vec!["t".to_string()],
                vec![String::new()],
                vec!["m".to_string()],
            )
            .unwrap_err(),
        LedgerError::ContractPaused
    );

    // Read-only queries stay available while paused
    assert!(ledger.content_exists(b"before"));
    assert_eq!(ledger.get_record(id).unwrap().id, id);
    assert_eq!(ledger.get_by_holder(addr(2)).unwrap(), vec![id]);

    ledger.unpause(OWNER).unwrap();
    mint_as(&mut ledger, addr(2), DEFAULT_FEE, b"after").unwrap();
}

#[test]
fn pause_transitions_are_strict_and_owner_only() {
    let mut ledger = new_ledger();
    assert_eq!(ledger.pause(addr(2)).unwrap_err(), LedgerError::NotAuthorized);
    assert_eq!(ledger.unpause(OWNER).unwrap_err(), LedgerError::NotPaused);
    ledger.pause(OWNER).unwrap();
    assert_eq!(ledger.pause(OWNER).unwrap_err(), LedgerError::AlreadyPaused);
}

// ============================================================================
// Destroy semantics
// ============================================================================

#[test]
fn destroy_frees_original_content_for_reminting() {
    let mut ledger = new_ledger();
    let holder = addr(2);
    let id = mint_as(&mut ledger, holder, DEFAULT_FEE, b"phoenix").unwrap();

    ledger.destroy(holder, id).unwrap();

    // The record is gone and the TRUE content fingerprint is freed;
    // destruction must not have freed the fingerprint of empty content
    assert!(matches!(
        ledger.get_record(id),
        Err(LedgerError::NotFound(_))
    ));
    assert!(!ledger.content_exists(b"phoenix"));
    assert!(!ledger.content_exists(b""));

    let reborn = mint_as(&mut ledger, holder, DEFAULT_FEE, b"phoenix").unwrap();
    assert_ne!(reborn, id, "destroyed id must never be reused");
    assert!(ledger.content_exists(b"phoenix"));
}

#[test]
fn destroy_excludes_record_from_creator_enumeration() {
    let mut ledger = new_ledger();
    let creator = addr(2);
    let id1 = mint_as(&mut ledger, creator, DEFAULT_FEE, b"one").unwrap();
    let id2 = mint_as(&mut ledger, creator, DEFAULT_FEE, b"two").unwrap();

    ledger.destroy(creator, id1).unwrap();

    assert_eq!(ledger.get_by_creator(creator).unwrap(), vec![id2]);
    assert_eq!(ledger.get_by_holder(creator).unwrap(), vec![id2]);
    assert_eq!(ledger.stats().live_supply, 1);
    assert_eq!(ledger.stats().total_issued, 2);
}

#[test]
fn destroy_requires_holder_or_owner() {
    let mut ledger = new_ledger();
    let id = mint_as(&mut ledger, addr(2), DEFAULT_FEE, b"guarded").unwrap();

    assert_eq!(
        ledger.destroy(addr(3), id).unwrap_err(),
        LedgerError::NotAuthorized
    );
    // The contract owner may destroy any record
    ledger.destroy(OWNER, id).unwrap();
}

// ============================================================================
// Vault
// ============================================================================

#[test]
fn withdraw_moves_accumulated_fees_to_target() {
    let mut ledger = new_ledger();
    mint_as(&mut ledger, addr(2), DEFAULT_FEE, b"a").unwrap();
    mint_as(&mut ledger, addr(3), DEFAULT_FEE * 2, b"b").unwrap(); // overpaid
    assert_eq!(ledger.stats().vault_balance, DEFAULT_FEE * 3);

    let mut funds = MockTransfer::new();
    let moved = ledger.withdraw(OWNER, addr(9), &mut funds, NOW).unwrap();
    assert_eq!(moved, DEFAULT_FEE * 3);
    assert_eq!(funds.calls, vec![(addr(9), DEFAULT_FEE * 3)]);
    assert_eq!(ledger.stats().vault_balance, 0);

    // Empty vault refuses a second withdrawal
    assert_eq!(
        ledger.withdraw(OWNER, addr(9), &mut funds, NOW).unwrap_err(),
        LedgerError::NothingToWithdraw
    );
}

#[test]
fn withdraw_is_owner_only() {
    let mut ledger = new_ledger();
    mint_as(&mut ledger, addr(2), DEFAULT_FEE, b"a").unwrap();
    let mut funds = MockTransfer::new();
    assert_eq!(
        ledger.withdraw(addr(2), addr(9), &mut funds, NOW).unwrap_err(),
        LedgerError::NotAuthorized
    );
}

#[test]
fn failed_transfer_aborts_withdrawal_and_keeps_balance() {
    let mut ledger = new_ledger();
    mint_as(&mut ledger, addr(2), DEFAULT_FEE, b"a").unwrap();

    let mut funds = MockTransfer::new();
    funds.fail = true;
    let err = ledger.withdraw(OWNER, addr(9), &mut funds, NOW).unwrap_err();
    assert!(matches!(err, LedgerError::WithdrawalFailed(_)));
    assert_eq!(ledger.stats().vault_balance, DEFAULT_FEE);
}

#[test]
fn emergency_withdraw_takes_partial_balance() {
    let mut ledger = new_ledger();
    mint_as(&mut ledger, addr(2), DEFAULT_FEE * 5, b"a").unwrap();

    let mut funds = MockTransfer::new();
    let moved = ledger
        .emergency_withdraw(OWNER, addr(9), DEFAULT_FEE * 2, &mut funds, NOW)
        .unwrap();
    assert_eq!(moved, DEFAULT_FEE * 2);
    assert_eq!(ledger.stats().vault_balance, DEFAULT_FEE * 3);

    assert_eq!(
        ledger
            .emergency_withdraw(OWNER, addr(9), 0, &mut funds, NOW)
            .unwrap_err(),
        LedgerError::AmountMustBePositive
    );
    assert_eq!(
        ledger
            .emergency_withdraw(OWNER, addr(9), DEFAULT_FEE * 100, &mut funds, NOW)
            .unwrap_err(),
        LedgerError::InsufficientBalance {
            have: DEFAULT_FEE * 3,
            need: DEFAULT_FEE * 100
        }
    );
}
