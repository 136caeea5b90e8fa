//! `take_offer`: fulfil an open offer
//!
//! Asset B moves taker → maker, the vault's asset A moves vault → taker, then
//! the vault and the record are closed. All four effects commit together or
//! not at all.

use tracing::info;

use super::{ensure_holding, load_holding, load_vault, TakeOfferAccounts};
use crate::accounts;
use crate::errors::SwapError;
use crate::events::{OfferTaken, SwapEvent};
use crate::processor::InvokeContext;
use crate::state;
use crate::token;

pub fn handler(
    ctx: &mut InvokeContext<'_>,
    accounts: &TakeOfferAccounts,
) -> Result<SwapEvent, SwapError> {
    if !ctx.signer.is(&accounts.taker) {
        return Err(SwapError::Unauthorized);
    }

    let offer = state::load_offer(&ctx.accounts, &accounts.offer)?;
    if offer.maker != accounts.maker {
        return Err(SwapError::InvalidMaker);
    }
    if offer.token_mint_a != accounts.token_mint_a {
        return Err(SwapError::InvalidMint {
            mint: accounts.token_mint_a,
        });
    }
    if offer.token_mint_b != accounts.token_mint_b {
        return Err(SwapError::InvalidMint {
            mint: accounts.token_mint_b,
        });
    }

    let offer_authority = offer.authority()?;
    if !offer_authority.is(&accounts.offer) {
        return Err(SwapError::InvalidOfferAddress {
            expected: *offer_authority.address(),
            actual: accounts.offer,
        });
    }
    let vault = load_vault(ctx, &accounts.offer, &offer, &accounts.vault)?;

    let mint_a = token::load_mint(&ctx.accounts, &accounts.token_mint_a)?;
    let mint_b = token::load_mint(&ctx.accounts, &accounts.token_mint_b)?;

    let taker_b = load_holding(
        ctx,
        &accounts.taker_token_account_b,
        &accounts.token_mint_b,
        &accounts.taker,
    )?;
    if taker_b.amount < offer.token_b_wanted_amount {
        return Err(SwapError::InsufficientFunds {
            account: accounts.taker_token_account_b,
            required: offer.token_b_wanted_amount,
            available: taker_b.amount,
        });
    }

    // Receiving holdings are created on demand, paid by the taker
    ensure_holding(
        ctx,
        &accounts.taker,
        &accounts.taker_token_account_a,
        &accounts.token_mint_a,
        &accounts.taker,
    )?;
    ensure_holding(
        ctx,
        &accounts.taker,
        &accounts.maker_token_account_b,
        &accounts.token_mint_b,
        &accounts.maker,
    )?;

    token::transfer_checked(
        &mut ctx.accounts,
        &accounts.taker_token_account_b,
        &accounts.token_mint_b,
        &accounts.maker_token_account_b,
        &ctx.signer,
        offer.token_b_wanted_amount,
        mint_b.decimals,
    )?;
    token::transfer_checked(
        &mut ctx.accounts,
        &accounts.vault,
        &accounts.token_mint_a,
        &accounts.taker_token_account_a,
        &offer_authority,
        vault.amount,
        mint_a.decimals,
    )?;
    token::close_account(
        &mut ctx.accounts,
        &accounts.vault,
        &accounts.maker,
        &offer_authority,
    )?;
    accounts::close_account(&mut ctx.accounts, &accounts.offer, &accounts.maker)?;

    info!(
        offer = %accounts.offer,
        maker = %accounts.maker,
        taker = %accounts.taker,
        token_a_amount = vault.amount,
        token_b_amount = offer.token_b_wanted_amount,
        "Offer taken"
    );

    Ok(SwapEvent::OfferTaken(OfferTaken {
        offer: accounts.offer,
        id: offer.id,
        maker: offer.maker,
        taker: accounts.taker,
        token_a_amount: vault.amount,
        token_b_amount: offer.token_b_wanted_amount,
        slot: ctx.clock.slot,
        timestamp: ctx.clock.unix_timestamp,
    }))
}
