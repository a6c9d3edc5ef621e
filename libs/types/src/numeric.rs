//! Integer amount and fraction types
//!
//! All token quantities are integer base units (`u128`), matching the
//! ledger's own bookkeeping — no floating point, no decimal scaling.
//! Protocol fractions (the settlement burn, the generation fee split)
//! are expressed in basis points and applied with exact floor division,
//! so `value == apply(value) + remainder(value)` always holds.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Token quantity in base units.
pub type Amount = u128;

/// Basis points in a full unit: 10 000 bps = 100 %.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Error raised when constructing a fraction above 100 %.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("basis points out of range: {bps} > {max}", max = BPS_DENOMINATOR)]
pub struct BpsOutOfRange {
    pub bps: u32,
}

/// A fraction expressed in basis points (1 bps = 0.01 %).
///
/// Capped at 10 000 (100 %), so `apply` can never produce more than its
/// input and the complementary share never underflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bps(u32);

impl Bps {
    /// 0 %.
    pub const ZERO: Bps = Bps(0);
    /// 100 %.
    pub const ONE_HUNDRED_PERCENT: Bps = Bps(BPS_DENOMINATOR as u32);

    /// Create a fraction, rejecting values above 100 %.
    pub fn new(bps: u32) -> Result<Self, BpsOutOfRange> {
        if u128::from(bps) > BPS_DENOMINATOR {
            return Err(BpsOutOfRange { bps });
        }
        Ok(Self(bps))
    }

    /// Raw basis-point value.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Apply the fraction to an amount, flooring: `⌊amount * bps / 10_000⌋`.
    ///
    /// Split into quotient and remainder terms so the intermediate
    /// products fit in `u128` for every possible `amount`.
    pub fn apply(&self, amount: Amount) -> Amount {
        amount / BPS_DENOMINATOR * u128::from(self.0)
            + amount % BPS_DENOMINATOR * u128::from(self.0) / BPS_DENOMINATOR
    }

    /// The complementary share: `amount - apply(amount)`.
    pub fn remainder(&self, amount: Amount) -> Amount {
        amount - self.apply(amount)
    }
}

impl fmt::Display for Bps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}
