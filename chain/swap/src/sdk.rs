//! Client-side helpers
//!
//! Build and sign escrow instructions with every account reference filled in.
//! Receiving holdings are always the owner's associated holdings.

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rand::Rng;
use swap_types::ids::{Address, OfferId};

use crate::derivation;
use crate::errors::{DerivationError, TransactionError};
use crate::instructions::{
    CancelOfferAccounts, MakeOfferAccounts, MakeOfferArgs, SwapInstruction, TakeOfferAccounts,
};
use crate::transaction::{Message, Transaction};

/// A fresh random offer id.
pub fn random_offer_id() -> OfferId {
    let bytes: [u8; 8] = OsRng.gen();
    OfferId::new(u64::from_le_bytes(bytes))
}

/// A fresh wallet keypair and its address.
pub fn generate_keypair() -> (SigningKey, Address) {
    let key = SigningKey::generate(&mut OsRng);
    let address = Address::from(key.verifying_key());
    (key, address)
}

/// Addresses an offer occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferAddresses {
    pub offer: Address,
    pub vault: Address,
}

pub fn derive_offer_addresses(
    maker: &Address,
    id: OfferId,
    token_mint_a: &Address,
) -> Result<OfferAddresses, DerivationError> {
    let (offer, _) = derivation::offer_address(maker, id)?;
    let (vault, _) = derivation::vault_address(&offer, token_mint_a)?;
    Ok(OfferAddresses { offer, vault })
}

pub fn make_offer_instruction(
    maker: &Address,
    token_mint_a: &Address,
    token_mint_b: &Address,
    id: OfferId,
    token_a_offered_amount: u64,
    token_b_wanted_amount: u64,
) -> Result<SwapInstruction, DerivationError> {
    let addresses = derive_offer_addresses(maker, id, token_mint_a)?;
    Ok(SwapInstruction::MakeOffer {
        accounts: MakeOfferAccounts {
            maker: *maker,
            token_mint_a: *token_mint_a,
            token_mint_b: *token_mint_b,
            maker_token_account_a: derivation::associated_token_address(maker, token_mint_a)?,
            offer: addresses.offer,
            vault: addresses.vault,
        },
        args: MakeOfferArgs {
            id,
            token_a_offered_amount,
            token_b_wanted_amount,
        },
    })
}

pub fn take_offer_instruction(
    taker: &Address,
    maker: &Address,
    token_mint_a: &Address,
    token_mint_b: &Address,
    id: OfferId,
) -> Result<SwapInstruction, DerivationError> {
    let addresses = derive_offer_addresses(maker, id, token_mint_a)?;
    Ok(SwapInstruction::TakeOffer {
        accounts: TakeOfferAccounts {
            taker: *taker,
            maker: *maker,
            token_mint_a: *token_mint_a,
            token_mint_b: *token_mint_b,
            taker_token_account_a: derivation::associated_token_address(taker, token_mint_a)?,
            taker_token_account_b: derivation::associated_token_address(taker, token_mint_b)?,
            maker_token_account_b: derivation::associated_token_address(maker, token_mint_b)?,
            offer: addresses.offer,
            vault: addresses.vault,
        },
    })
}

pub fn cancel_offer_instruction(
    maker: &Address,
    token_mint_a: &Address,
    id: OfferId,
) -> Result<SwapInstruction, DerivationError> {
    let addresses = derive_offer_addresses(maker, id, token_mint_a)?;
    Ok(SwapInstruction::CancelOffer {
        accounts: CancelOfferAccounts {
            maker: *maker,
            token_mint_a: *token_mint_a,
            maker_token_account_a: derivation::associated_token_address(maker, token_mint_a)?,
            offer: addresses.offer,
            vault: addresses.vault,
        },
    })
}

/// Sign `instruction` under a random nonce.
pub fn sign(instruction: SwapInstruction, key: &SigningKey) -> Result<Transaction, TransactionError> {
    let nonce: u64 = OsRng.gen();
    Transaction::sign(Message::new(instruction, nonce), key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_ids_differ() {
        assert_ne!(random_offer_id(), random_offer_id());
    }

    #[test]
    fn test_take_references_match_make() {
        let (_, maker) = generate_keypair();
        let (_, taker) = generate_keypair();
        let mint_a = Address::new_from_array([0x0A; 32]);
        let mint_b = Address::new_from_array([0x0B; 32]);
        let id = OfferId::new(7);

        let make = make_offer_instruction(&maker, &mint_a, &mint_b, id, 10, 20).unwrap();
        let take = take_offer_instruction(&taker, &maker, &mint_a, &mint_b, id).unwrap();
        let (SwapInstruction::MakeOffer { accounts: m, .. }, SwapInstruction::TakeOffer { accounts: t }) =
            (make, take)
        else {
            panic!("unexpected instruction kinds");
        };
        assert_eq!(m.offer, t.offer);
        assert_eq!(m.vault, t.vault);
        assert_ne!(t.taker_token_account_a, t.taker_token_account_b);
    }

    #[test]
    fn test_signed_transactions_get_distinct_signatures() {
        let (key, maker) = generate_keypair();
        let mint = Address::new_from_array([0x0C; 32]);
        let ix = cancel_offer_instruction(&maker, &mint, OfferId::new(1)).unwrap();
        let a = sign(ix.clone(), &key).unwrap();
        let b = sign(ix, &key).unwrap();
        assert!(a.verify().is_ok());
        assert_ne!(a.signature, b.signature);
    }
}
