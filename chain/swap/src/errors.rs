//! Escrow error types
//!
//! One enum per layer: address derivation, ledger accounts, the token
//! subsystem, the escrow program itself, and whole transactions. Callers always
//! receive a specific kind so they can tell "retry is pointless" from
//! "state changed, re-query" from "fund the account and retry".

use swap_types::ids::Address;
use thiserror::Error;

/// Address derivation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    #[error("Seed too long: {len} bytes exceeds the 32 byte limit")]
    MaxSeedLengthExceeded { len: usize },

    #[error("Too many seeds: {count} exceeds the limit of 16")]
    TooManySeeds { count: usize },

    #[error("Derived address lies on the Ed25519 curve")]
    OnCurve,

    #[error("No bump seed yields an off-curve address")]
    NoViableBump,
}

/// Ledger account errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Account not found: {address}")]
    NotFound { address: Address },

    #[error("Account already exists: {address}")]
    AlreadyExists { address: Address },

    #[error("Insufficient lamports in {account}: required {required}, available {available}")]
    InsufficientLamports {
        account: Address,
        required: u64,
        available: u64,
    },

    #[error("Account {address} is not a {expected} account")]
    InvalidData {
        address: Address,
        expected: &'static str,
    },

    #[error("Arithmetic overflow in lamport balance")]
    Overflow,
}

/// Token subsystem errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    #[error("Token account {account} does not hold the expected mint")]
    MintMismatch { account: Address },

    #[error("Authority does not own token account {account}")]
    OwnerMismatch { account: Address },

    #[error("Mint decimals mismatch: expected {expected}, got {actual}")]
    DecimalsMismatch { expected: u8, actual: u8 },

    #[error("Insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: Address,
        required: u64,
        available: u64,
    },

    #[error("Cannot close token account {account} holding {amount}")]
    NonZeroBalance { account: Address, amount: u64 },

    #[error("Arithmetic overflow in token balance")]
    Overflow,
}

/// Escrow program errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: Address,
        required: u64,
        available: u64,
    },

    #[error("Offer already exists: {offer}")]
    OfferAlreadyExists { offer: Address },

    #[error("Offer not found: {offer}")]
    OfferNotFound { offer: Address },

    #[error("Invalid vault: expected {expected}, got {actual}")]
    InvalidVault { expected: Address, actual: Address },

    #[error("Unauthorized: caller does not hold the required role")]
    Unauthorized,

    #[error("Invalid offer address: expected {expected}, got {actual}")]
    InvalidOfferAddress { expected: Address, actual: Address },

    #[error("Invalid maker: maker does not match the offer")]
    InvalidMaker,

    #[error("Invalid mint: {mint}")]
    InvalidMint { mint: Address },

    #[error("Invalid token account: {account}")]
    InvalidTokenAccount { account: Address },

    #[error("Derivation error: {0}")]
    Derivation(#[from] DerivationError),

    #[error("Account error: {0}")]
    Account(AccountError),

    #[error("Token error: {0}")]
    Token(TokenError),
}

impl From<AccountError> for SwapError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InsufficientLamports {
                account,
                required,
                available,
            } => SwapError::InsufficientFunds {
                account,
                required,
                available,
            },
            other => SwapError::Account(other),
        }
    }
}

impl From<TokenError> for SwapError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InsufficientFunds {
                account,
                required,
                available,
            } => SwapError::InsufficientFunds {
                account,
                required,
                available,
            },
            TokenError::Account(inner) => inner.into(),
            other => SwapError::Token(other),
        }
    }
}

/// Transaction-level errors raised by the ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Invalid signature for transaction")]
    InvalidSignature,

    #[error("Transaction already processed: {signature}")]
    DuplicateSignature { signature: String },

    #[error("Fee payer not found: {address}")]
    FeePayerNotFound { address: Address },

    #[error("Insufficient funds for fee: required {required}, available {available}")]
    InsufficientFundsForFee { required: u64, available: u64 },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Ledger clock exhausted at slot {slot}")]
    ClockOverflow { slot: u64 },

    #[error("Instruction failed: {0}")]
    Instruction(#[from] SwapError),
}

impl TransactionError {
    /// The program error, if the instruction itself failed.
    pub fn instruction_error(&self) -> Option<&SwapError> {
        match self {
            TransactionError::Instruction(err) => Some(err),
            _ => None,
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse ledger config: {0}")]
    Parse(String),

    #[error("Invalid ledger config: {0}")]
    Invalid(String),
}
