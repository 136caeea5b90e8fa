//! `cancel_offer`: maker withdraws an unfilled offer

use tracing::info;

use super::{ensure_holding, load_vault, CancelOfferAccounts};
use crate::accounts;
use crate::errors::SwapError;
use crate::events::{OfferCancelled, SwapEvent};
use crate::processor::InvokeContext;
use crate::state;
use crate::token;

pub fn handler(
    ctx: &mut InvokeContext<'_>,
    accounts: &CancelOfferAccounts,
) -> Result<SwapEvent, SwapError> {
    let offer = state::load_offer(&ctx.accounts, &accounts.offer)?;
    if !ctx.signer.is(&offer.maker) {
        return Err(SwapError::Unauthorized);
    }
    if accounts.maker != offer.maker {
        return Err(SwapError::InvalidMaker);
    }
    if accounts.token_mint_a != offer.token_mint_a {
        return Err(SwapError::InvalidMint {
            mint: accounts.token_mint_a,
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

    ensure_holding(
        ctx,
        &accounts.maker,
        &accounts.maker_token_account_a,
        &accounts.token_mint_a,
        &accounts.maker,
    )?;

    token::transfer_checked(
        &mut ctx.accounts,
        &accounts.vault,
        &accounts.token_mint_a,
        &accounts.maker_token_account_a,
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
        token_a_refunded = vault.amount,
        "Offer cancelled"
    );

    Ok(SwapEvent::OfferCancelled(OfferCancelled {
        offer: accounts.offer,
        id: offer.id,
        maker: offer.maker,
        token_a_refunded: vault.amount,
        slot: ctx.clock.slot,
        timestamp: ctx.clock.unix_timestamp,
    }))
}
