//! Token subsystem: mints, holdings, and checked transfers
//!
//! A minimal trusted value-transfer primitive in the shape of an SPL-style
//! token program:
//! - Mints record decimals and supply
//! - Token accounts hold an amount of one mint on behalf of an owner
//! - Transfers require the owner's [`Authority`] and matching decimals
//! - Only empty token accounts can be closed

use serde::{Deserialize, Serialize};
use swap_types::ids::Address;
use swap_types::programs::TOKEN_PROGRAM_ID;

use crate::accounts::{self, AccountData, AccountsOverlay};
use crate::errors::{AccountError, TokenError};
use crate::security::Authority;

/// Asset definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mint {
    pub mint_authority: Address,
    pub decimals: u8,
    pub supply: u64,
}

/// A holding of one mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub mint: Address,
    /// Authority allowed to move funds out
    pub owner: Address,
    pub amount: u64,
}

// ───────────────────────── Loaders ─────────────────────────

/// Load a mint owned by the token program.
pub fn load_mint(accounts: &AccountsOverlay<'_>, address: &Address) -> Result<Mint, TokenError> {
    let account = accounts
        .get(address)
        .ok_or(AccountError::NotFound { address: *address })?;
    match (&account.data, account.owner == TOKEN_PROGRAM_ID) {
        (AccountData::Mint(mint), true) => Ok(*mint),
        _ => Err(AccountError::InvalidData {
            address: *address,
            expected: "mint",
        }
        .into()),
    }
}

/// Load a token account owned by the token program.
pub fn load_token_account(
    accounts: &AccountsOverlay<'_>,
    address: &Address,
) -> Result<TokenAccount, TokenError> {
    let account = accounts
        .get(address)
        .ok_or(AccountError::NotFound { address: *address })?;
    match (&account.data, account.owner == TOKEN_PROGRAM_ID) {
        (AccountData::Token(token), true) => Ok(*token),
        _ => Err(AccountError::InvalidData {
            address: *address,
            expected: "token",
        }
        .into()),
    }
}

fn token_account_mut<'o>(
    accounts: &'o mut AccountsOverlay<'_>,
    address: &Address,
) -> Result<&'o mut TokenAccount, TokenError> {
    let account = accounts
        .get_mut(address)
        .ok_or(AccountError::NotFound { address: *address })?;
    match &mut account.data {
        AccountData::Token(token) => Ok(token),
        _ => Err(AccountError::InvalidData {
            address: *address,
            expected: "token",
        }
        .into()),
    }
}

// ───────────────────────── Instructions ─────────────────────────

/// Create a mint at `address`, paid by `payer`.
pub fn initialize_mint(
    accounts: &mut AccountsOverlay<'_>,
    payer: &Address,
    address: &Address,
    mint_authority: &Address,
    decimals: u8,
    deposit: u64,
) -> Result<(), TokenError> {
    let mint = Mint {
        mint_authority: *mint_authority,
        decimals,
        supply: 0,
    };
    accounts::create_account(
        accounts,
        payer,
        address,
        TOKEN_PROGRAM_ID,
        AccountData::Mint(mint),
        deposit,
    )?;
    Ok(())
}

/// Create an empty token account for `mint` owned by `owner`.
pub fn initialize_account(
    accounts: &mut AccountsOverlay<'_>,
    payer: &Address,
    address: &Address,
    mint: &Address,
    owner: &Address,
    deposit: u64,
) -> Result<(), TokenError> {
    load_mint(accounts, mint)?;
    let holding = TokenAccount {
        mint: *mint,
        owner: *owner,
        amount: 0,
    };
    accounts::create_account(
        accounts,
        payer,
        address,
        TOKEN_PROGRAM_ID,
        AccountData::Token(holding),
        deposit,
    )?;
    Ok(())
}

/// Move `amount` of `mint` from `from` to `to`.
///
/// `authority` must own `from`; `decimals` must match the mint.
pub fn transfer_checked(
    accounts: &mut AccountsOverlay<'_>,
    from: &Address,
    mint: &Address,
    to: &Address,
    authority: &Authority,
    amount: u64,
    decimals: u8,
) -> Result<(), TokenError> {
    let mint_state = load_mint(accounts, mint)?;
    if mint_state.decimals != decimals {
        return Err(TokenError::DecimalsMismatch {
            expected: mint_state.decimals,
            actual: decimals,
        });
    }

    let source = load_token_account(accounts, from)?;
    let destination = load_token_account(accounts, to)?;
    if source.mint != *mint {
        return Err(TokenError::MintMismatch { account: *from });
    }
    if destination.mint != *mint {
        return Err(TokenError::MintMismatch { account: *to });
    }
    if !authority.is(&source.owner) {
        return Err(TokenError::OwnerMismatch { account: *from });
    }
    if source.amount < amount {
        return Err(TokenError::InsufficientFunds {
            account: *from,
            required: amount,
            available: source.amount,
        });
    }
    if from == to {
        return Ok(());
    }

    let credited = destination
        .amount
        .checked_add(amount)
        .ok_or(TokenError::Overflow)?;
    token_account_mut(accounts, from)?.amount = source.amount - amount;
    token_account_mut(accounts, to)?.amount = credited;
    Ok(())
}

/// Close an empty token account, returning its deposit to `destination`.
pub fn close_account(
    accounts: &mut AccountsOverlay<'_>,
    account: &Address,
    destination: &Address,
    authority: &Authority,
) -> Result<u64, TokenError> {
    let holding = load_token_account(accounts, account)?;
    if !authority.is(&holding.owner) {
        return Err(TokenError::OwnerMismatch { account: *account });
    }
    if holding.amount != 0 {
        return Err(TokenError::NonZeroBalance {
            account: *account,
            amount: holding.amount,
        });
    }
    Ok(accounts::close_account(accounts, account, destination)?)
}

/// Issue new units of `mint` into `to`.
pub fn mint_to(
    accounts: &mut AccountsOverlay<'_>,
    mint: &Address,
    to: &Address,
    authority: &Authority,
    amount: u64,
) -> Result<(), TokenError> {
    let mint_state = load_mint(accounts, mint)?;
    if !authority.is(&mint_state.mint_authority) {
        return Err(TokenError::OwnerMismatch { account: *mint });
    }
    let holding = load_token_account(accounts, to)?;
    if holding.mint != *mint {
        return Err(TokenError::MintMismatch { account: *to });
    }

    let supply = mint_state
        .supply
        .checked_add(amount)
        .ok_or(TokenError::Overflow)?;
    let balance = holding.amount.checked_add(amount).ok_or(TokenError::Overflow)?;

    token_account_mut(accounts, to)?.amount = balance;
    if let Some(account) = accounts.get_mut(mint) {
        if let AccountData::Mint(m) = &mut account.data {
            m.supply = supply;
        }
    }
    Ok(())
}
