//! Unique identifier types for protocol entities
//!
//! Arena ids are allocated sequentially by the registry, starting at 0,
//! and are never reused — a cancelled arena's id stays dead forever.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an arena.
///
/// Sequential `u64` assigned by the registry's single allocation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Create from a raw counter value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Index into an id-ordered registry.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ArenaId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}
