//! Types library for the token-swap escrow
//!
//! Shared type definitions used by the escrow program, the in-memory ledger
//! and client tooling.
//!
//! # Modules
//! - `ids`: 32-byte addresses and offer identifiers
//! - `programs`: Well-known program addresses
//! - `errors`: Parse errors for identifiers

pub mod ids;
pub mod programs;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::programs::*;
    pub use crate::errors::*;
}
