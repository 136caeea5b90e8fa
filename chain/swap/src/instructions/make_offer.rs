//! `make_offer`: open an offer and move asset A into custody

use swap_types::programs::SWAP_PROGRAM_ID;
use tracing::info;

use super::{load_holding, MakeOfferAccounts, MakeOfferArgs};
use crate::accounts::{self, AccountData};
use crate::derivation;
use crate::errors::SwapError;
use crate::events::{OfferMade, SwapEvent};
use crate::processor::InvokeContext;
use crate::state::Offer;
use crate::token;

pub fn handler(
    ctx: &mut InvokeContext<'_>,
    accounts: &MakeOfferAccounts,
    args: &MakeOfferArgs,
) -> Result<SwapEvent, SwapError> {
    if !ctx.signer.is(&accounts.maker) {
        return Err(SwapError::Unauthorized);
    }
    if args.token_a_offered_amount == 0 || args.token_b_wanted_amount == 0 {
        return Err(SwapError::InvalidAmount);
    }

    let mint_a = token::load_mint(&ctx.accounts, &accounts.token_mint_a).map_err(|_| {
        SwapError::InvalidMint {
            mint: accounts.token_mint_a,
        }
    })?;
    token::load_mint(&ctx.accounts, &accounts.token_mint_b).map_err(|_| SwapError::InvalidMint {
        mint: accounts.token_mint_b,
    })?;

    let (expected_offer, bump) = derivation::offer_address(&accounts.maker, args.id)?;
    if expected_offer != accounts.offer {
        return Err(SwapError::InvalidOfferAddress {
            expected: expected_offer,
            actual: accounts.offer,
        });
    }
    let (expected_vault, vault_bump) =
        derivation::vault_address(&accounts.offer, &accounts.token_mint_a)?;
    if expected_vault != accounts.vault {
        return Err(SwapError::InvalidVault {
            expected: expected_vault,
            actual: accounts.vault,
        });
    }

    // Fail loudly on collision, never overwrite
    if ctx.accounts.exists(&accounts.offer) || ctx.accounts.exists(&accounts.vault) {
        return Err(SwapError::OfferAlreadyExists {
            offer: accounts.offer,
        });
    }

    let holding = load_holding(
        ctx,
        &accounts.maker_token_account_a,
        &accounts.token_mint_a,
        &accounts.maker,
    )?;
    if holding.amount < args.token_a_offered_amount {
        return Err(SwapError::InsufficientFunds {
            account: accounts.maker_token_account_a,
            required: args.token_a_offered_amount,
            available: holding.amount,
        });
    }

    let deposit = ctx.config.account_deposit;

    // Vault is a token account whose authority is the offer record address
    token::initialize_account(
        &mut ctx.accounts,
        &accounts.maker,
        &accounts.vault,
        &accounts.token_mint_a,
        &accounts.offer,
        deposit,
    )?;
    token::transfer_checked(
        &mut ctx.accounts,
        &accounts.maker_token_account_a,
        &accounts.token_mint_a,
        &accounts.vault,
        &ctx.signer,
        args.token_a_offered_amount,
        mint_a.decimals,
    )?;

    let offer = Offer {
        id: args.id,
        maker: accounts.maker,
        token_mint_a: accounts.token_mint_a,
        token_mint_b: accounts.token_mint_b,
        token_b_wanted_amount: args.token_b_wanted_amount,
        bump,
        vault_bump,
    };
    accounts::create_account(
        &mut ctx.accounts,
        &accounts.maker,
        &accounts.offer,
        SWAP_PROGRAM_ID,
        AccountData::Offer(offer),
        deposit,
    )?;

    info!(
        offer = %accounts.offer,
        maker = %accounts.maker,
        id = %args.id,
        token_a_offered_amount = args.token_a_offered_amount,
        token_b_wanted_amount = args.token_b_wanted_amount,
        "Offer made"
    );

    Ok(SwapEvent::OfferMade(OfferMade {
        offer: accounts.offer,
        id: args.id,
        maker: accounts.maker,
        vault: accounts.vault,
        token_mint_a: accounts.token_mint_a,
        token_mint_b: accounts.token_mint_b,
        token_a_offered_amount: args.token_a_offered_amount,
        token_b_wanted_amount: args.token_b_wanted_amount,
        slot: ctx.clock.slot,
        timestamp: ctx.clock.unix_timestamp,
    }))
}
