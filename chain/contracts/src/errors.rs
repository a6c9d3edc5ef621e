//! Contract-specific error types
//!
//! The taxonomy separates five failure kinds: validation (bad inputs),
//! state (illegal lifecycle transition), authorization (caller is not
//! the owner), ledger (balance/allowance failures surfaced unchanged
//! from the token collaborator), and lifecycle (paused). Variants carry
//! the offending identifiers so clients can diagnose without any
//! contract-side logging.

use thiserror::Error;
use types::address::Address;
use types::ids::ArenaId;
use types::numeric::Amount;

/// Token ledger errors, surfaced unchanged through consuming components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        account: Address,
        required: Amount,
        available: Amount,
    },

    #[error(
        "insufficient allowance from {owner} to {spender}: required {required}, available {available}"
    )]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        required: Amount,
        available: Amount,
    },

    #[error("arithmetic overflow in ledger bookkeeping")]
    Overflow,
}

/// Input-validation failures (bad addresses, bad amounts, bad winner).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("zero address is not allowed")]
    ZeroAddress,

    #[error("minimum bid must be above zero")]
    ZeroMinBid,

    #[error("amount must be above zero")]
    ZeroAmount,

    #[error("bid {amount} is below the minimum bid {min_bid}")]
    BidBelowMinimum { amount: Amount, min_bid: Amount },

    #[error("{address} is neither creator nor opponent of arena {id}")]
    InvalidWinner { id: ArenaId, address: Address },

    #[error("ledger {actual} is not the configured token {expected}")]
    TokenMismatch { expected: Address, actual: Address },
}

/// Illegal lifecycle transitions on an arena record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("arena {id} does not exist")]
    ArenaNotFound { id: ArenaId },

    #[error("arena {id} has already been accepted")]
    AlreadyAccepted { id: ArenaId },

    #[error("arena {id} has not been accepted yet")]
    NotAccepted { id: ArenaId },

    #[error("{caller} cannot accept their own arena {id}")]
    SelfAccept { id: ArenaId, caller: Address },

    #[error("{caller} is not the creator of arena {id}")]
    NotCreator { id: ArenaId, caller: Address },

    #[error("winner of arena {id} is already set")]
    WinnerAlreadySet { id: ArenaId },
}

/// Escrow engine errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid arena state: {0}")]
    State(#[from] StateError),

    #[error("unauthorized: {caller} is not the owner")]
    Authorization { caller: Address },

    #[error("economic operations are paused")]
    Paused,

    #[error("reentrant call detected")]
    Reentrancy,

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Character generation fee-router errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("unauthorized: {caller} is not the owner")]
    Authorization { caller: Address },

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Staking rewards errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakingError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("insufficient staked balance for {staker}: requested {requested}, staked {staked}")]
    InsufficientStake {
        staker: Address,
        requested: Amount,
        staked: Amount,
    },

    #[error("rewards pool cannot cover {owed}, available {available}")]
    InsufficientRewardsPool { owed: Amount, available: Amount },

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
