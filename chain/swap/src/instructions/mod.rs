//! Escrow instructions
//!
//! Each instruction names every account it touches; the program re-derives
//! and validates each reference before moving any funds.

pub mod cancel_offer;
pub mod make_offer;
pub mod take_offer;

use serde::{Deserialize, Serialize};
use swap_types::ids::{Address, OfferId};

use crate::derivation;
use crate::errors::SwapError;
use crate::processor::InvokeContext;
use crate::state::Offer;
use crate::token::{self, TokenAccount};

/// Accounts for `make_offer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeOfferAccounts {
    pub maker: Address,
    pub token_mint_a: Address,
    pub token_mint_b: Address,
    pub maker_token_account_a: Address,
    pub offer: Address,
    pub vault: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeOfferArgs {
    pub id: OfferId,
    pub token_a_offered_amount: u64,
    pub token_b_wanted_amount: u64,
}

/// Accounts for `take_offer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TakeOfferAccounts {
    pub taker: Address,
    pub maker: Address,
    pub token_mint_a: Address,
    pub token_mint_b: Address,
    pub taker_token_account_a: Address,
    pub taker_token_account_b: Address,
    pub maker_token_account_b: Address,
    pub offer: Address,
    pub vault: Address,
}

/// Accounts for `cancel_offer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOfferAccounts {
    pub maker: Address,
    pub token_mint_a: Address,
    pub maker_token_account_a: Address,
    pub offer: Address,
    pub vault: Address,
}

/// Program entry points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapInstruction {
    MakeOffer {
        accounts: MakeOfferAccounts,
        args: MakeOfferArgs,
    },
    TakeOffer {
        accounts: TakeOfferAccounts,
    },
    CancelOffer {
        accounts: CancelOfferAccounts,
    },
}

impl SwapInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            SwapInstruction::MakeOffer { .. } => "make_offer",
            SwapInstruction::TakeOffer { .. } => "take_offer",
            SwapInstruction::CancelOffer { .. } => "cancel_offer",
        }
    }
}

// ───────────────────────── Shared checks ─────────────────────────

/// Verify `vault` is the token account bound to `offer` and return it.
pub(crate) fn load_vault(
    ctx: &InvokeContext<'_>,
    offer_address: &Address,
    offer: &Offer,
    vault: &Address,
) -> Result<TokenAccount, SwapError> {
    let expected = offer.vault_address(offer_address)?;
    let invalid = || SwapError::InvalidVault {
        expected,
        actual: *vault,
    };
    if expected != *vault {
        return Err(invalid());
    }

    let holding = token::load_token_account(&ctx.accounts, vault).map_err(|_| invalid())?;
    if holding.mint != offer.token_mint_a || holding.owner != *offer_address {
        return Err(invalid());
    }
    Ok(holding)
}

/// Verify an existing holding of `mint` owned by `owner`.
pub(crate) fn load_holding(
    ctx: &InvokeContext<'_>,
    address: &Address,
    mint: &Address,
    owner: &Address,
) -> Result<TokenAccount, SwapError> {
    let invalid = || SwapError::InvalidTokenAccount { account: *address };
    let holding = token::load_token_account(&ctx.accounts, address).map_err(|_| invalid())?;
    if holding.mint != *mint || holding.owner != *owner {
        return Err(invalid());
    }
    Ok(holding)
}

/// Use an existing holding, or create the associated holding paid by `payer`.
///
/// Only the associated address may be created on demand.
pub(crate) fn ensure_holding(
    ctx: &mut InvokeContext<'_>,
    payer: &Address,
    address: &Address,
    mint: &Address,
    owner: &Address,
) -> Result<(), SwapError> {
    if ctx.accounts.exists(address) {
        load_holding(ctx, address, mint, owner)?;
        return Ok(());
    }

    let associated = derivation::associated_token_address(owner, mint)?;
    if associated != *address {
        return Err(SwapError::InvalidTokenAccount { account: *address });
    }
    let deposit = ctx.config.account_deposit;
    token::initialize_account(&mut ctx.accounts, payer, address, mint, owner, deposit)?;
    Ok(())
}
