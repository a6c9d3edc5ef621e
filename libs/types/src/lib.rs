//! Types library for the arena escrow protocol
//!
//! This library provides the core type definitions shared across the
//! protocol crates, ensuring type safety and deterministic arithmetic.
//!
//! # Modules
//! - `address`: Account addresses with the reserved zero sentinel
//! - `ids`: Sequential arena identifiers
//! - `numeric`: Integer base-unit amounts and basis-point fractions

// Public modules
pub mod address;
pub mod ids;
pub mod numeric;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::address::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
}
