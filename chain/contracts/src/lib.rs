//! Escrow, Settlement & Fee-Routing Logic for the Arena Protocol
//!
//! This crate implements the contract layer of the arena protocol:
//! two-party stake escrow with resolver settlement and fee burn, the
//! character generation fee router, and the staking rewards pool.
//!
//! # Modules
//! - `errors`: Error taxonomy (validation / state / authorization / ledger / lifecycle)
//! - `events`: Contract events emitted by successful operations
//! - `security`: Shared security primitives (reentrancy guard, access control, pause)
//! - `token`: Token Ledger collaborator (balances, allowances, supply, burn)
//! - `membership`: Per-address sparse-set membership index
//! - `arena`: Arena registry and escrow/settlement state machine
//! - `generation`: Character generation fee router (treasury/staking split)
//! - `staking`: Time-linear staking rewards pool

pub mod arena;
pub mod errors;
pub mod events;
pub mod generation;
pub mod membership;
pub mod security;
pub mod staking;
pub mod token;

/// Contract surface version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
