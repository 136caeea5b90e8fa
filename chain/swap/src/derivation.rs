//! Deterministic address derivation
//!
//! Program-derived addresses are SHA-256 digests of
//! `seeds ‖ program_id ‖ "ProgramDerivedAddress"` that do not decode as an
//! Ed25519 point, so no signing key can exist for them. Only the owning program
//! can authorise movements out of such an address, by re-deriving it from its
//! seeds.
//!
//! Layout used by the escrow:
//! - offer record: `["offer", maker, offer_id (le)]` under the swap program
//! - vault: `["vault", offer record, mint A]` under the swap program
//! - associated holding: `[owner, token program, mint]` under the
//!   associated-token program

use sha2::{Digest, Sha256};
use swap_types::ids::{Address, OfferId};
use swap_types::programs::{ASSOCIATED_TOKEN_PROGRAM_ID, SWAP_PROGRAM_ID, TOKEN_PROGRAM_ID};

use crate::errors::DerivationError;

/// Namespace tag for offer records.
pub const OFFER_SEED: &[u8] = b"offer";

/// Namespace tag for vaults.
pub const VAULT_SEED: &[u8] = b"vault";

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds, bump included.
pub const MAX_SEEDS: usize = 16;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Derive an address from the full seed list (bump included).
///
/// Fails with [`DerivationError::OnCurve`] when the digest is a usable
/// public key; such an address must never be used for custody.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<Address, DerivationError> {
    if seeds.len() > MAX_SEEDS {
        return Err(DerivationError::TooManySeeds { count: seeds.len() });
    }
    if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(DerivationError::MaxSeedLengthExceeded { len: seed.len() });
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);
    let digest: [u8; 32] = hasher.finalize().into();

    let address = Address::new_from_array(digest);
    if address.is_on_curve() {
        return Err(DerivationError::OnCurve);
    }
    Ok(address)
}

/// Find the canonical off-curve address for `seeds`, searching bumps from 255 down.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), DerivationError> {
    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        with_bump.extend_from_slice(seeds);
        with_bump.push(&bump_seed);

        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(DerivationError::OnCurve) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(DerivationError::NoViableBump)
}

/// Offer record address for `(maker, offer_id)`.
pub fn offer_address(maker: &Address, offer_id: OfferId) -> Result<(Address, u8), DerivationError> {
    let id = offer_id.to_le_bytes();
    find_program_address(&[OFFER_SEED, maker.as_ref(), &id], &SWAP_PROGRAM_ID)
}

/// Re-derive an offer record address from its stored bump.
pub fn offer_address_with_bump(
    maker: &Address,
    offer_id: OfferId,
    bump: u8,
) -> Result<Address, DerivationError> {
    let id = offer_id.to_le_bytes();
    create_program_address(&[OFFER_SEED, maker.as_ref(), &id, &[bump]], &SWAP_PROGRAM_ID)
}

/// Vault address, nested under the offer record address.
pub fn vault_address(offer: &Address, token_mint_a: &Address) -> Result<(Address, u8), DerivationError> {
    find_program_address(&[VAULT_SEED, offer.as_ref(), token_mint_a.as_ref()], &SWAP_PROGRAM_ID)
}

/// Re-derive a vault address from its stored bump.
pub fn vault_address_with_bump(
    offer: &Address,
    token_mint_a: &Address,
    bump: u8,
) -> Result<Address, DerivationError> {
    create_program_address(
        &[VAULT_SEED, offer.as_ref(), token_mint_a.as_ref(), &[bump]],
        &SWAP_PROGRAM_ID,
    )
}

/// The associated token holding of `owner` for `mint`.
pub fn associated_token_address(owner: &Address, mint: &Address) -> Result<Address, DerivationError> {
    find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _)| address)
}
