//! Two-party token swap escrow
//!
//! A maker locks asset A in a program-controlled vault and states how much of
//! asset B it wants. Any taker may fill the offer in one atomic step, or the
//! maker may cancel it for a full refund.
//!
//! # Modules
//! - `derivation`: Program-derived addresses for offers, vaults and holdings
//! - `accounts`: Account store, staging overlay, lamport operations
//! - `token`: Mints, holdings, checked transfers
//! - `state`: Offer record
//! - `instructions`: `make_offer`, `take_offer`, `cancel_offer`
//! - `processor`: Instruction dispatch and read-only queries
//! - `transaction`: Signed messages
//! - `ledger`: Transaction execution, fees, genesis helpers, shared handle
//! - `sdk`: Client-side instruction builders
//! - `events`, `errors`, `security`, `config`

pub mod accounts;
pub mod config;
pub mod derivation;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod processor;
pub mod sdk;
pub mod security;
pub mod state;
pub mod token;
pub mod transaction;

/// Program ABI version, frozen after release
pub const SWAP_ABI_VERSION: &str = "1.0.0";
