//! Arena Registry & Escrow State Machine
//!
//! Two parties escrow equal stakes in an arena; a designated resolver
//! (the owner) declares a winner who receives the pooled stake minus a
//! protocol fee that is permanently burned.
//!
//! Lifecycle: `Pending` (created, no opponent) → `Accepted` (opponent
//! set) → `Resolved` (terminal, record persists); alternate terminal
//! `Cancelled`, reachable only from `Pending` (tombstoned, id dead).
//!
//! All state-changing operations check, in order:
//! 1. Ledger identity (configured token)
//! 2. Pause state
//! 3. State-machine preconditions (no mutation on failure)
//! 4. Reentrancy guard around the mutation + transfer section
//!
//! Registry and index mutations are ordered before outbound transfers,
//! so authoritative state reflects the new arena state before control
//! could re-enter the engine via a token side effect.

use serde::{Deserialize, Serialize};

use types::address::Address;
use types::ids::ArenaId;
use types::numeric::{Amount, Bps};

use crate::errors::{ArenaError, LedgerError, StateError, ValidationError};
use crate::events::{ArenaAccepted, ArenaCanceled, ArenaCreated, ContractEvent, WinnerSet};
use crate::membership::MembershipIndex;
use crate::security::{AccessControl, PauseGuard, ReentrancyGuard};
use crate::token::TokenLedger;

/// Which side of the duel won.
///
/// Stored as a role rather than a raw address, so "winner is one of
/// the two participants" is a storage-level invariant. Transitions
/// `Unset → {Creator | Opponent}` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinnerRole {
    Unset,
    Creator,
    Opponent,
}

/// One proposed or in-progress duel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    /// Address that opened the arena.
    pub creator: Address,
    /// Stake required from both sides, token base units.
    pub bid_amount: Amount,
    /// Address that accepted, or the zero sentinel while pending.
    pub opponent: Address,
    /// Resolution state.
    pub winner_role: WinnerRole,
}

impl Arena {
    /// Whether an opponent has matched the arena.
    pub fn is_accepted(&self) -> bool {
        !self.opponent.is_zero()
    }

    /// Whether the resolver has declared a winner.
    pub fn is_resolved(&self) -> bool {
        self.winner_role != WinnerRole::Unset
    }
}

/// Escrow engine: id-indexed arena registry, per-address membership
/// index, and the settlement state machine.
///
/// Pooled stakes are custodied under the engine's own ledger address;
/// no per-arena sub-account exists. The correctness anchor is
/// `custody balance == Σ bid_amount × (1 if pending, 2 if accepted
/// and unresolved)` over all live records.
#[derive(Debug)]
pub struct ArenaEngine {
    /// The engine's custody account in the ledger.
    address: Address,
    /// Identity of the token ledger being escrowed.
    token: Address,
    /// Minimum stake to open an arena.
    min_bid: Amount,
    /// Protocol fee fraction burned at settlement (1 % by default).
    burn_rate: Bps,
    /// Monotonic id counter; mutated only inside `create_arena`.
    next_arena_id: u64,
    /// Registry: id-indexed records, `None` = tombstoned.
    arenas: Vec<Option<Arena>>,
    /// Per-address membership index.
    memberships: MembershipIndex,
    /// Security: single-owner gate.
    access_control: AccessControl,
    /// Security: emergency stop.
    pause_guard: PauseGuard,
    /// Security: reentrancy guard.
    reentrancy_guard: ReentrancyGuard,
    /// Emitted events log (append-only).
    events: Vec<ContractEvent>,
}

impl ArenaEngine {
    /// The protocol burn fraction: 1 % of the pot.
    pub const DEFAULT_BURN_RATE_BPS: u32 = 100;

    /// Create an engine.
    ///
    /// `address` is the engine's custody account in the ledger; `token`
    /// is the ledger identity it escrows. Zero addresses and a zero
    /// minimum bid are rejected.
    pub fn new(
        owner: Address,
        address: Address,
        token: Address,
        min_bid: Amount,
        burn_rate: Bps,
    ) -> Result<Self, ArenaError> {
        if owner.is_zero() || address.is_zero() || token.is_zero() {
            return Err(ValidationError::ZeroAddress.into());
        }
        if min_bid == 0 {
            return Err(ValidationError::ZeroMinBid.into());
        }
        Ok(Self {
            address,
            token,
            min_bid,
            burn_rate,
            next_arena_id: 0,
            arenas: Vec::new(),
            memberships: MembershipIndex::new(),
            access_control: AccessControl::new(owner),
            pause_guard: PauseGuard::new(),
            reentrancy_guard: ReentrancyGuard::new(),
            events: Vec::new(),
        })
    }

    // ───────────────────────── Escrow operations ─────────────────────────

    /// Open an arena, escrowing `amount` from the caller.
    ///
    /// Returns the newly allocated sequential id and emits
    /// `ArenaCreated`.
    pub fn create_arena(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
        amount: Amount,
    ) -> Result<ArenaId, ArenaError> {
        self.check_token(ledger)?;
        self.check_not_paused()?;
        if caller.is_zero() {
            return Err(ValidationError::ZeroAddress.into());
        }
        if amount < self.min_bid {
            return Err(ValidationError::BidBelowMinimum {
                amount,
                min_bid: self.min_bid,
            }
            .into());
        }

        self.check_reentrancy()?;
        let result = self.create_arena_inner(ledger, caller, amount);
        self.reentrancy_guard.release();
        result
    }

    fn create_arena_inner(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
        amount: Amount,
    ) -> Result<ArenaId, ArenaError> {
        // Pull the stake first: a failed pull leaves the registry
        // untouched, and an inbound transfer cannot observe stale state.
        ledger.transfer_from(&self.address, caller, &self.address, amount)?;

        let id = ArenaId::new(self.next_arena_id);
        self.next_arena_id += 1;
        self.arenas.push(Some(Arena {
            creator: caller.clone(),
            bid_amount: amount,
            opponent: Address::zero(),
            winner_role: WinnerRole::Unset,
        }));
        self.memberships.append(caller, id);

        self.events.push(ContractEvent::ArenaCreated(ArenaCreated {
            id,
            creator: caller.clone(),
            amount,
        }));
        Ok(id)
    }

    /// Match a pending arena, escrowing the equal stake from the caller.
    pub fn accept_arena(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
        id: ArenaId,
    ) -> Result<(), ArenaError> {
        self.check_token(ledger)?;
        self.check_not_paused()?;
        if caller.is_zero() {
            return Err(ValidationError::ZeroAddress.into());
        }

        let bid_amount = {
            let arena = self.live_arena(id)?;
            if arena.is_accepted() {
                return Err(StateError::AlreadyAccepted { id }.into());
            }
            if arena.creator == *caller {
                return Err(StateError::SelfAccept {
                    id,
                    caller: caller.clone(),
                }
                .into());
            }
            arena.bid_amount
        };

        self.check_reentrancy()?;
        let result = self.accept_arena_inner(ledger, caller, id, bid_amount);
        self.reentrancy_guard.release();
        result
    }

    fn accept_arena_inner(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
        id: ArenaId,
        bid_amount: Amount,
    ) -> Result<(), ArenaError> {
        ledger.transfer_from(&self.address, caller, &self.address, bid_amount)?;

        let arena = self
            .arenas
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(StateError::ArenaNotFound { id })?;
        arena.opponent = caller.clone();
        self.memberships.append(caller, id);

        self.events.push(ContractEvent::ArenaAccepted(ArenaAccepted {
            id,
            opponent: caller.clone(),
        }));
        Ok(())
    }

    /// Withdraw an unmatched arena, refunding the creator's stake.
    ///
    /// Legal solely while no opponent is set; the record is tombstoned
    /// and its id never revived.
    pub fn cancel_arena(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
        id: ArenaId,
    ) -> Result<(), ArenaError> {
        self.check_token(ledger)?;
        self.check_not_paused()?;

        {
            let arena = self.live_arena(id)?;
            if arena.creator != *caller {
                return Err(StateError::NotCreator {
                    id,
                    caller: caller.clone(),
                }
                .into());
            }
            if arena.is_accepted() {
                return Err(StateError::AlreadyAccepted { id }.into());
            }
        }

        self.check_reentrancy()?;
        let result = self.cancel_arena_inner(ledger, caller, id);
        self.reentrancy_guard.release();
        result
    }

    fn cancel_arena_inner(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
        id: ArenaId,
    ) -> Result<(), ArenaError> {
        // Tombstone and drop the creator's index entry before the
        // refund leaves custody.
        let Some(arena) = self.arenas.get_mut(id.index()).and_then(Option::take) else {
            return Err(StateError::ArenaNotFound { id }.into());
        };
        self.memberships.remove(caller, id);

        // The custody invariant guarantees the refund is covered.
        ledger.transfer(&self.address, caller, arena.bid_amount)?;

        self.events
            .push(ContractEvent::ArenaCanceled(ArenaCanceled { id }));
        Ok(())
    }

    /// Resolve an accepted arena. Owner-only.
    ///
    /// `proposed_winner` must match the stored creator or opponent;
    /// the pot (`2 × bid`) is split into an exact-conservation pair
    /// `payout + burn`, the payout transferred to the winner and the
    /// burn destroyed from circulating supply. The record persists for
    /// history; membership is untouched.
    pub fn set_winner(
        &mut self,
        ledger: &mut TokenLedger,
        caller: &Address,
        id: ArenaId,
        proposed_winner: &Address,
    ) -> Result<(), ArenaError> {
        if !self.access_control.is_owner(caller) {
            return Err(ArenaError::Authorization {
                caller: caller.clone(),
            });
        }
        self.check_token(ledger)?;
        self.check_not_paused()?;

        let (role, pot) = {
            let arena = self.live_arena(id)?;
            if !arena.is_accepted() {
                return Err(StateError::NotAccepted { id }.into());
            }
            if arena.is_resolved() {
                return Err(StateError::WinnerAlreadySet { id }.into());
            }
            // Creator checked first; unambiguous because creator and
            // opponent are distinct by the accept precondition.
            let role = if *proposed_winner == arena.creator {
                WinnerRole::Creator
            } else if *proposed_winner == arena.opponent {
                WinnerRole::Opponent
            } else {
                return Err(ValidationError::InvalidWinner {
                    id,
                    address: proposed_winner.clone(),
                }
                .into());
            };
            let pot = arena
                .bid_amount
                .checked_mul(2)
                .ok_or(LedgerError::Overflow)?;
            (role, pot)
        };

        self.check_reentrancy()?;
        let result = self.set_winner_inner(ledger, id, role, proposed_winner, pot);
        self.reentrancy_guard.release();
        result
    }

    fn set_winner_inner(
        &mut self,
        ledger: &mut TokenLedger,
        id: ArenaId,
        role: WinnerRole,
        winner: &Address,
        pot: Amount,
    ) -> Result<(), ArenaError> {
        let burn = self.burn_rate.apply(pot);
        let payout = pot - burn;

        // Record the terminal state before any value leaves custody.
        self.arenas
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(StateError::ArenaNotFound { id })?
            .winner_role = role;

        ledger.transfer(&self.address, winner, payout)?;
        ledger.burn(&self.address, burn)?;

        self.events.push(ContractEvent::WinnerSet(WinnerSet {
            id,
            winner: winner.clone(),
        }));
        Ok(())
    }

    // ───────────────────────── Admin operations ─────────────────────────

    /// Change which ledger token is escrowed. Owner-only.
    pub fn set_token(&mut self, caller: &Address, token: Address) -> Result<(), ArenaError> {
        self.check_owner(caller)?;
        if token.is_zero() {
            return Err(ValidationError::ZeroAddress.into());
        }
        self.token = token;
        Ok(())
    }

    /// Change the minimum stake. Owner-only; zero rejected.
    pub fn set_min_bid(&mut self, caller: &Address, amount: Amount) -> Result<(), ArenaError> {
        self.check_owner(caller)?;
        if amount == 0 {
            return Err(ValidationError::ZeroMinBid.into());
        }
        self.min_bid = amount;
        Ok(())
    }

    /// Freeze all economic operations. Owner-only.
    pub fn pause(&mut self, caller: &Address) -> Result<(), ArenaError> {
        self.check_owner(caller)?;
        self.pause_guard.pause();
        Ok(())
    }

    /// Restore economic operations. Owner-only; callable while paused.
    pub fn unpause(&mut self, caller: &Address) -> Result<(), ArenaError> {
        self.check_owner(caller)?;
        self.pause_guard.unpause();
        Ok(())
    }

    /// Hand the resolver/administrator role to a new address. Owner-only.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), ArenaError> {
        if new_owner.is_zero() {
            return Err(ValidationError::ZeroAddress.into());
        }
        if !self.access_control.transfer_ownership(caller, new_owner) {
            return Err(ArenaError::Authorization {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    // ───────────────────────── Read surface ─────────────────────────

    /// Look up an arena record; `None` for unallocated or tombstoned ids.
    pub fn arena(&self, id: ArenaId) -> Option<&Arena> {
        self.arenas.get(id.index()).and_then(Option::as_ref)
    }

    /// Current minimum stake.
    pub fn min_bid(&self) -> Amount {
        self.min_bid
    }

    /// Next id to be allocated (equals the number of arenas ever created).
    pub fn current_arena_id(&self) -> u64 {
        self.next_arena_id
    }

    /// Ids of all non-cancelled arenas the address participates in.
    pub fn user_arena_ids(&self, address: &Address) -> &[ArenaId] {
        self.memberships.list(address)
    }

    /// Records of all non-cancelled arenas the address participates in,
    /// in membership-index order.
    pub fn user_arenas(&self, address: &Address) -> Vec<&Arena> {
        self.memberships
            .list(address)
            .iter()
            .filter_map(|id| self.arena(*id))
            .collect()
    }

    /// Whether economic operations are frozen.
    pub fn is_paused(&self) -> bool {
        self.pause_guard.is_paused()
    }

    /// The administrator/resolver identity.
    pub fn owner(&self) -> &Address {
        self.access_control.owner()
    }

    /// The configured token ledger identity.
    pub fn token(&self) -> &Address {
        &self.token
    }

    /// The engine's custody address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The settlement burn fraction.
    pub fn burn_rate(&self) -> Bps {
        self.burn_rate
    }

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal guards ─────────────────────────

    fn live_arena(&self, id: ArenaId) -> Result<&Arena, StateError> {
        self.arenas
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(StateError::ArenaNotFound { id })
    }

    fn check_owner(&self, caller: &Address) -> Result<(), ArenaError> {
        if !self.access_control.is_owner(caller) {
            return Err(ArenaError::Authorization {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    fn check_token(&self, ledger: &TokenLedger) -> Result<(), ArenaError> {
        if *ledger.address() != self.token {
            return Err(ValidationError::TokenMismatch {
                expected: self.token.clone(),
                actual: ledger.address().clone(),
            }
            .into());
        }
        Ok(())
    }

    fn check_not_paused(&self) -> Result<(), ArenaError> {
        if self.pause_guard.is_paused() {
            return Err(ArenaError::Paused);
        }
        Ok(())
    }

    fn check_reentrancy(&mut self) -> Result<(), ArenaError> {
        if !self.reentrancy_guard.acquire() {
            return Err(ArenaError::Reentrancy);
        }
        Ok(())
    }
}
