//! Shared security primitives
//!
//! - [`Authority`]: proof that the running transaction may move funds owned by
//!   an address, either because the address signed the transaction or because
//!   the escrow program re-derived it from its seeds.
//! - [`SignatureTracker`]: replay protection for processed transactions.

use std::collections::HashSet;
use swap_types::ids::Address;

use crate::derivation::create_program_address;
use crate::errors::DerivationError;

/// Spending authority over a single address.
///
/// There is no public constructor from a bare address: wallet authorities are
/// minted by the ledger after signature verification, program authorities only
/// by re-deriving the address from seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authority {
    address: Address,
}

impl Authority {
    /// Authority of a verified transaction signer.
    pub(crate) fn signer(address: Address) -> Self {
        Self { address }
    }

    /// Authority of a program-derived address, given its full seed list.
    pub fn derived(seeds: &[&[u8]], program_id: &Address) -> Result<Self, DerivationError> {
        let address = create_program_address(seeds, program_id)?;
        Ok(Self { address })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Whether this authority speaks for `address`.
    pub fn is(&self, address: &Address) -> bool {
        &self.address == address
    }
}

/// Set of processed transaction signatures, keyed on the raw signature bytes.
///
/// Ed25519 signatures are deterministic, so resubmitting an identical signed
/// message yields an identical signature and is rejected here. Entries never
/// expire: the set grows with the ledger's lifetime, which is bounded by the
/// process holding it.
#[derive(Debug, Clone, Default)]
pub struct SignatureTracker {
    processed: HashSet<[u8; 64]>,
}

impl SignatureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_processed(&self, signature: &[u8; 64]) -> bool {
        self.processed.contains(signature)
    }

    /// Record a signature. Returns `false` if it was already recorded.
    pub fn record(&mut self, signature: [u8; 64]) -> bool {
        self.processed.insert(signature)
    }

    pub fn count(&self) -> usize {
        self.processed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::{offer_address, OFFER_SEED};
    use swap_types::ids::OfferId;
    use swap_types::programs::SWAP_PROGRAM_ID;

    #[test]
    fn test_derived_authority_matches_offer_address() {
        let maker = Address::new_from_array([4u8; 32]);
        let id = OfferId::new(11);
        let (offer, bump) = offer_address(&maker, id).unwrap();

        let id_bytes = id.to_le_bytes();
        let authority = Authority::derived(
            &[OFFER_SEED, maker.as_ref(), &id_bytes, &[bump]],
            &SWAP_PROGRAM_ID,
        )
        .unwrap();
        assert!(authority.is(&offer));
    }

    #[test]
    fn test_signature_tracker_rejects_replay() {
        let mut tracker = SignatureTracker::new();
        let sig = [7u8; 64];
        assert!(tracker.record(sig));
        assert!(tracker.is_processed(&sig));
        assert!(!tracker.is_processed(&[8u8; 64]));
        assert!(!tracker.record(sig), "Second record must return false");
        assert_eq!(tracker.count(), 1);
    }
}
