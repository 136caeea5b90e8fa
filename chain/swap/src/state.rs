//! Offer record: the persistent state of an open offer
//!
//! Created by `make_offer`, read and destroyed by exactly one of `take_offer`
//! or `cancel_offer`. There is no update path.

use serde::{Deserialize, Serialize};
use swap_types::ids::{Address, OfferId};
use swap_types::programs::SWAP_PROGRAM_ID;

use crate::accounts::{AccountData, AccountsOverlay};
use crate::derivation::{self, OFFER_SEED};
use crate::errors::{DerivationError, SwapError};
use crate::security::Authority;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub maker: Address,
    pub token_mint_a: Address,
    pub token_mint_b: Address,
    pub token_b_wanted_amount: u64,
    /// Bump of the record address
    pub bump: u8,
    /// Bump of the vault address
    pub vault_bump: u8,
}

impl Offer {
    /// Re-derive the record address from the stored seeds.
    pub fn address(&self) -> Result<Address, DerivationError> {
        derivation::offer_address_with_bump(&self.maker, self.id, self.bump)
    }

    /// Program authority over the record address, used to move vault funds.
    pub fn authority(&self) -> Result<Authority, DerivationError> {
        let id = self.id.to_le_bytes();
        Authority::derived(
            &[OFFER_SEED, self.maker.as_ref(), &id, &[self.bump]],
            &SWAP_PROGRAM_ID,
        )
    }

    /// Re-derive the vault address bound to this record.
    pub fn vault_address(&self, offer: &Address) -> Result<Address, DerivationError> {
        derivation::vault_address_with_bump(offer, &self.token_mint_a, self.vault_bump)
    }
}

/// Load the offer record stored at `address`.
///
/// Anything that is not a swap-program-owned offer counts as absent.
pub fn load_offer(accounts: &AccountsOverlay<'_>, address: &Address) -> Result<Offer, SwapError> {
    match accounts.get(address) {
        Some(account) if account.owner == SWAP_PROGRAM_ID => match &account.data {
            AccountData::Offer(offer) => Ok(offer.clone()),
            _ => Err(SwapError::OfferNotFound { offer: *address }),
        },
        _ => Err(SwapError::OfferNotFound { offer: *address }),
    }
}
