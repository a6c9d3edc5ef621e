//! Account addresses
//!
//! Addresses are opaque strings assigned off-chain. The empty string is
//! the reserved zero sentinel: it never holds a balance and marks "no
//! participant" slots such as an arena awaiting an opponent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An account address.
///
/// Comparison, hashing, and ordering are byte-wise on the underlying
/// string, so addresses are usable as map keys throughout the ledger
/// and registries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address from its string form.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The reserved zero address.
    pub fn zero() -> Self {
        Self(String::new())
    }

    /// Whether this is the reserved zero address.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// The underlying string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            write!(f, "0x0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self(address.to_owned())
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self(address)
    }
}
