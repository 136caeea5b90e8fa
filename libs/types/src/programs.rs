//! Well-known program addresses
//!
//! Program ids are fixed labels rather than keys: programs never sign, they
//! authorise through address derivation.

use crate::ids::Address;

/// Owner of plain wallet accounts.
pub const SYSTEM_PROGRAM_ID: Address = Address::from_label(b"system_program");

/// Owner of mints and token holdings.
pub const TOKEN_PROGRAM_ID: Address = Address::from_label(b"token_program");

/// Namespace for associated token holdings (one per owner and mint).
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Address = Address::from_label(b"associated_token_program");

/// The escrow program; owns offer records and, through them, vaults.
pub const SWAP_PROGRAM_ID: Address = Address::from_label(b"swap_program");
