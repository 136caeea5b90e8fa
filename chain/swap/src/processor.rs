//! Program dispatch and read-only queries

use swap_types::ids::Address;
use tracing::debug;

use crate::accounts::AccountsOverlay;
use crate::config::LedgerConfig;
use crate::errors::{SwapError, TokenError};
use crate::events::SwapEvent;
use crate::instructions::{cancel_offer, make_offer, take_offer, SwapInstruction};
use crate::ledger::Clock;
use crate::security::Authority;
use crate::state::{self, Offer};
use crate::token;

/// Everything an instruction may see or touch while it runs.
#[derive(Debug)]
pub struct InvokeContext<'a> {
    /// Staged view of the ledger; discarded unless the instruction succeeds
    pub accounts: AccountsOverlay<'a>,
    pub config: &'a LedgerConfig,
    pub clock: Clock,
    /// The verified transaction signer
    pub signer: Authority,
}

/// Route an instruction to its handler.
pub fn process_instruction(
    ctx: &mut InvokeContext<'_>,
    instruction: &SwapInstruction,
) -> Result<SwapEvent, SwapError> {
    debug!(
        instruction = instruction.name(),
        signer = %ctx.signer.address(),
        slot = ctx.clock.slot,
        "Processing instruction"
    );

    match instruction {
        SwapInstruction::MakeOffer { accounts, args } => make_offer::handler(ctx, accounts, args),
        SwapInstruction::TakeOffer { accounts } => take_offer::handler(ctx, accounts),
        SwapInstruction::CancelOffer { accounts } => cancel_offer::handler(ctx, accounts),
    }
}

// ───────────────────────── Queries ─────────────────────────

/// Fetch the offer record at `address`.
pub fn fetch_offer(accounts: &AccountsOverlay<'_>, address: &Address) -> Result<Offer, SwapError> {
    state::load_offer(accounts, address)
}

/// Balance of the vault at `address`.
///
/// Only holdings whose authority is a program-derived address qualify.
pub fn vault_balance(accounts: &AccountsOverlay<'_>, address: &Address) -> Result<u64, TokenError> {
    let vault = token::load_token_account(accounts, address)?;
    if vault.owner.is_on_curve() {
        return Err(TokenError::OwnerMismatch { account: *address });
    }
    Ok(vault.amount)
}
