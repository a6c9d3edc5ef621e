//! Shared security primitives for contract modules
//!
//! Provides the access/pause gate and reentrancy guard used by the
//! escrow engine and the fee router.

use types::address::Address;

/// Reentrancy guard preventing nested calls into protected functions.
///
/// A contract function acquires the guard before executing state-changing
/// logic and releases it on completion. Any nested call attempt fails.
#[derive(Debug, Clone)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    /// Create a new unlocked guard.
    pub fn new() -> Self {
        Self { locked: false }
    }

    /// Acquire the guard. Returns `true` if successfully acquired.
    /// Returns `false` if already locked (reentrancy attempt).
    pub fn acquire(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    /// Release the guard.
    pub fn release(&mut self) {
        self.locked = false;
    }

    /// Check if currently locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-owner access control.
///
/// The protocol has exactly one administrator identity, which authorizes
/// token/parameter changes, pausing, and settlement. Ownership can be
/// handed over but never held by the zero address.
#[derive(Debug, Clone)]
pub struct AccessControl {
    owner: Address,
}

impl AccessControl {
    /// Create access control with an initial owner.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// Check if a caller is the owner.
    pub fn is_owner(&self, caller: &Address) -> bool {
        *caller == self.owner
    }

    /// Transfer ownership to a new address. Only the current owner may
    /// transfer, and the zero address is rejected.
    pub fn transfer_ownership(&mut self, current_owner: &Address, new_owner: Address) -> bool {
        if !self.is_owner(current_owner) || new_owner.is_zero() {
            return false;
        }
        self.owner = new_owner;
        true
    }

    /// Get the current owner identifier.
    pub fn owner(&self) -> &Address {
        &self.owner
    }
}

/// Composable pause modifier.
///
/// When paused, protected operations must be rejected.
#[derive(Debug, Clone)]
pub struct PauseGuard {
    paused: bool,
}

impl PauseGuard {
    /// Create a new unpaused guard.
    pub fn new() -> Self {
        Self { paused: false }
    }

    /// Pause operations.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Unpause operations.
    pub fn unpause(&mut self) {
        self.paused = false;
    }

    /// Check if currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for PauseGuard {
    fn default() -> Self {
        Self::new()
    }
}
