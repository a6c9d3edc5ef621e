//! Escrow & Settlement Hardening Tests
//!
//! Adversarial and property-based testing of the engine surface:
//! - Value conservation at settlement (payout + burn == pot)
//! - Custody invariant across interleaved arenas sharing one pool
//! - Failed operations leave zero state or balance change
//! - Pause semantics for every caller
//! - Reentrancy guard release on success and failure paths
//! - Membership index consistency under random churn

use contracts::arena::{ArenaEngine, WinnerRole};
use contracts::errors::{ArenaError, StateError};
use contracts::membership::MembershipIndex;
use contracts::token::TokenLedger;
use contracts::CONTRACT_ABI_VERSION;
use types::address::Address;
use types::ids::ArenaId;
use types::numeric::{Amount, Bps};

fn addr(s: &str) -> Address {
    Address::new(s)
}

fn id(v: u64) -> ArenaId {
    ArenaId::new(v)
}

fn setup(min_bid: Amount) -> (TokenLedger, ArenaEngine) {
    let ledger = TokenLedger::new(addr("dnd-token"));
    let engine = ArenaEngine::new(
        addr("owner"),
        addr("arena-engine"),
        addr("dnd-token"),
        min_bid,
        Bps::new(ArenaEngine::DEFAULT_BURN_RATE_BPS).unwrap(),
    )
    .unwrap();
    (ledger, engine)
}

fn fund(ledger: &mut TokenLedger, engine: &ArenaEngine, who: &Address, amount: Amount) {
    ledger.mint(who, amount).unwrap();
    ledger.approve(who, engine.address(), amount);
}

/// Custody implied by the registry: Σ bid × (1 pending, 2 accepted,
/// 0 resolved) over all live records.
fn implied_custody(engine: &ArenaEngine) -> Amount {
    (0..engine.current_arena_id())
        .filter_map(|i| engine.arena(id(i)))
        .map(|arena| {
            if arena.is_resolved() {
                0
            } else if arena.is_accepted() {
                arena.bid_amount * 2
            } else {
                arena.bid_amount
            }
        })
        .sum()
}

// ═══════════════════════════════════════════════════════════════════
// Value Conservation
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_reference_scenario_conserves_value() {
    // min_bid 100, stakes 150/150, 1 % burn: burn 3, payout 297.
    let (mut ledger, mut engine) = setup(100);
    fund(&mut ledger, &engine, &addr("a"), 150);
    fund(&mut ledger, &engine, &addr("b"), 150);

    engine.create_arena(&mut ledger, &addr("a"), 150).unwrap();
    assert_eq!(ledger.balance_of(engine.address()), 150);

    engine.accept_arena(&mut ledger, &addr("b"), id(0)).unwrap();
    assert_eq!(ledger.balance_of(engine.address()), 300);

    engine
        .set_winner(&mut ledger, &addr("owner"), id(0), &addr("b"))
        .unwrap();

    assert_eq!(ledger.balance_of(&addr("b")), 297);
    assert_eq!(ledger.balance_of(engine.address()), 0);
    assert_eq!(ledger.total_supply(), 300 - 3);
}

#[test]
fn test_concurrent_arenas_share_one_pool() {
    let (mut ledger, mut engine) = setup(100);
    for who in ["alice", "bob", "carol"] {
        fund(&mut ledger, &engine, &addr(who), 1_000);
    }

    engine.create_arena(&mut ledger, &addr("alice"), 150).unwrap(); // 0
    engine.create_arena(&mut ledger, &addr("alice"), 100).unwrap(); // 1
    engine.create_arena(&mut ledger, &addr("bob"), 100).unwrap(); // 2

    engine.accept_arena(&mut ledger, &addr("bob"), id(1)).unwrap();
    engine.accept_arena(&mut ledger, &addr("carol"), id(0)).unwrap();
    engine.accept_arena(&mut ledger, &addr("carol"), id(2)).unwrap();

    assert_eq!(ledger.balance_of(engine.address()), implied_custody(&engine));

    engine
        .set_winner(&mut ledger, &addr("owner"), id(0), &addr("carol"))
        .unwrap();
    engine
        .set_winner(&mut ledger, &addr("owner"), id(1), &addr("alice"))
        .unwrap();

    // Arena 2 (200 in custody) must be untouched by the two settlements.
    assert_eq!(ledger.balance_of(engine.address()), 200);
    assert_eq!(ledger.balance_of(engine.address()), implied_custody(&engine));

    // 1 % of each resolved pot burned: 3 + 2.
    assert_eq!(ledger.total_supply(), 3_000 - 5);
}

// ═══════════════════════════════════════════════════════════════════
// Atomicity — failed calls change nothing
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_failed_create_changes_nothing() {
    let (mut ledger, mut engine) = setup(100);
    fund(&mut ledger, &engine, &addr("alice"), 500);

    let before = ledger.clone();
    assert!(engine.create_arena(&mut ledger, &addr("alice"), 99).is_err());
    assert_eq!(ledger.balance_of(&addr("alice")), before.balance_of(&addr("alice")));
    assert_eq!(engine.current_arena_id(), 0);
    assert!(engine.events().is_empty());
}

#[test]
fn test_failed_set_winner_changes_nothing() {
    let (mut ledger, mut engine) = setup(100);
    fund(&mut ledger, &engine, &addr("alice"), 200);
    fund(&mut ledger, &engine, &addr("bob"), 200);

    engine.create_arena(&mut ledger, &addr("alice"), 200).unwrap();
    engine.accept_arena(&mut ledger, &addr("bob"), id(0)).unwrap();

    let supply = ledger.total_supply();
    let custody = ledger.balance_of(engine.address());

    // Winner matching neither participant.
    assert!(engine
        .set_winner(&mut ledger, &addr("owner"), id(0), &addr("mallory"))
        .is_err());
    // Non-owner caller.
    assert!(engine
        .set_winner(&mut ledger, &addr("bob"), id(0), &addr("bob"))
        .is_err());

    assert_eq!(ledger.total_supply(), supply);
    assert_eq!(ledger.balance_of(engine.address()), custody);
    assert_eq!(engine.arena(id(0)).unwrap().winner_role, WinnerRole::Unset);
}

#[test]
fn test_resolution_is_terminal() {
    let (mut ledger, mut engine) = setup(100);
    fund(&mut ledger, &engine, &addr("alice"), 100);
    fund(&mut ledger, &engine, &addr("bob"), 100);

    engine.create_arena(&mut ledger, &addr("alice"), 100).unwrap();
    engine.accept_arena(&mut ledger, &addr("bob"), id(0)).unwrap();
    engine
        .set_winner(&mut ledger, &addr("owner"), id(0), &addr("alice"))
        .unwrap();

    let snapshot = ledger.clone();
    let err = engine
        .set_winner(&mut ledger, &addr("owner"), id(0), &addr("bob"))
        .unwrap_err();
    assert_eq!(
        err,
        ArenaError::State(StateError::WinnerAlreadySet { id: id(0) })
    );
    assert_eq!(ledger.total_supply(), snapshot.total_supply());
    assert_eq!(
        ledger.balance_of(&addr("alice")),
        snapshot.balance_of(&addr("alice"))
    );
}

// ═══════════════════════════════════════════════════════════════════
// Pause semantics
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_pause_blocks_every_caller() {
    let (mut ledger, mut engine) = setup(100);
    fund(&mut ledger, &engine, &addr("alice"), 500);
    fund(&mut ledger, &engine, &addr("bob"), 500);

    engine.create_arena(&mut ledger, &addr("alice"), 200).unwrap();
    engine.pause(&addr("owner")).unwrap();

    for caller in ["alice", "bob", "owner"] {
        assert_eq!(
            engine.create_arena(&mut ledger, &addr(caller), 200),
            Err(ArenaError::Paused)
        );
        assert_eq!(
            engine.accept_arena(&mut ledger, &addr(caller), id(0)),
            Err(ArenaError::Paused)
        );
        assert_eq!(
            engine.cancel_arena(&mut ledger, &addr(caller), id(0)),
            Err(ArenaError::Paused)
        );
    }
    assert_eq!(
        engine.set_winner(&mut ledger, &addr("owner"), id(0), &addr("alice")),
        Err(ArenaError::Paused)
    );

    // Unpause restores prior behavior exactly.
    engine.unpause(&addr("owner")).unwrap();
    engine.accept_arena(&mut ledger, &addr("bob"), id(0)).unwrap();
    engine
        .set_winner(&mut ledger, &addr("owner"), id(0), &addr("bob"))
        .unwrap();
}

// ═══════════════════════════════════════════════════════════════════
// Reentrancy guard release
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_engine_usable_after_failed_operations() {
    let (mut ledger, mut engine) = setup(100);
    fund(&mut ledger, &engine, &addr("alice"), 300);

    // A ledger-level failure inside the guarded section must release
    // the guard for the next call.
    assert!(engine.create_arena(&mut ledger, &addr("bob"), 150).is_err());
    assert!(engine.create_arena(&mut ledger, &addr("alice"), 150).is_ok());

    assert!(engine.accept_arena(&mut ledger, &addr("carol"), id(0)).is_err());
    fund(&mut ledger, &engine, &addr("carol"), 150);
    assert!(engine.accept_arena(&mut ledger, &addr("carol"), id(0)).is_ok());
}

// ═══════════════════════════════════════════════════════════════════
// Surface freeze
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_abi_version_frozen() {
    assert_eq!(CONTRACT_ABI_VERSION, "1.0.0");
}

// ═══════════════════════════════════════════════════════════════════
// Property-based tests
// ═══════════════════════════════════════════════════════════════════

mod properties {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Action {
        Create { user: usize, amount: Amount },
        Accept { user: usize, arena: u64 },
        Cancel { user: usize, arena: u64 },
        Resolve { winner: usize, arena: u64 },
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0..3usize, 100u128..1_000).prop_map(|(user, amount)| Action::Create { user, amount }),
            (0..3usize, 0..12u64).prop_map(|(user, arena)| Action::Accept { user, arena }),
            (0..3usize, 0..12u64).prop_map(|(user, arena)| Action::Cancel { user, arena }),
            (0..3usize, 0..12u64).prop_map(|(winner, arena)| Action::Resolve { winner, arena }),
        ]
    }

    const USERS: [&str; 3] = ["alice", "bob", "carol"];

    proptest! {
        /// payout + burn == 2 × bid, exactly, for any stake.
        #[test]
        fn prop_settlement_conserves_pot(bid in 100u128..1_000_000_000) {
            let (mut ledger, mut engine) = setup(100);
            fund(&mut ledger, &engine, &addr("a"), bid);
            fund(&mut ledger, &engine, &addr("b"), bid);
            let supply = ledger.total_supply();

            engine.create_arena(&mut ledger, &addr("a"), bid).unwrap();
            engine.accept_arena(&mut ledger, &addr("b"), id(0)).unwrap();
            engine.set_winner(&mut ledger, &addr("owner"), id(0), &addr("b")).unwrap();

            let pot = bid * 2;
            let burn = pot / 100; // 1 % floor
            let payout = pot - burn;

            prop_assert_eq!(ledger.balance_of(&addr("b")), payout);
            prop_assert_eq!(ledger.total_supply(), supply - burn);
            prop_assert_eq!(ledger.balance_of(engine.address()), 0);
        }

        /// Custody equals the sum of live stakes after any interleaving
        /// of operations, successful or failed.
        #[test]
        fn prop_custody_matches_live_stakes(actions in prop::collection::vec(action_strategy(), 1..60)) {
            let (mut ledger, mut engine) = setup(100);
            for user in USERS {
                fund(&mut ledger, &engine, &addr(user), 1_000_000);
            }

            for action in actions {
                // Errors are expected for arbitrary interleavings; the
                // invariant must hold either way.
                let _ = match action {
                    Action::Create { user, amount } => engine
                        .create_arena(&mut ledger, &addr(USERS[user]), amount)
                        .map(|_| ()),
                    Action::Accept { user, arena } => {
                        engine.accept_arena(&mut ledger, &addr(USERS[user]), id(arena))
                    }
                    Action::Cancel { user, arena } => {
                        engine.cancel_arena(&mut ledger, &addr(USERS[user]), id(arena))
                    }
                    Action::Resolve { winner, arena } => engine.set_winner(
                        &mut ledger,
                        &addr("owner"),
                        id(arena),
                        &addr(USERS[winner]),
                    ),
                };
                prop_assert_eq!(
                    ledger.balance_of(engine.address()),
                    implied_custody(&engine)
                );
            }
        }

        /// The membership index stays consistent with a model set under
        /// random churn, and listing order follows swap-pop.
        #[test]
        fn prop_membership_matches_model(ops in prop::collection::vec((any::<bool>(), 0..20u64), 1..80)) {
            use std::collections::HashSet;

            let mut index = MembershipIndex::new();
            let mut model: HashSet<u64> = HashSet::new();
            let owner = addr("alice");

            for (insert, raw) in ops {
                if insert {
                    if model.insert(raw) {
                        index.append(&owner, id(raw));
                    }
                } else {
                    let was_member = model.remove(&raw);
                    prop_assert_eq!(index.remove(&owner, id(raw)), was_member);
                }

                let listed: HashSet<u64> =
                    index.list(&owner).iter().map(|i| i.value()).collect();
                prop_assert_eq!(index.list(&owner).len(), model.len());
                prop_assert_eq!(&listed, &model);
            }
        }
    }
}
