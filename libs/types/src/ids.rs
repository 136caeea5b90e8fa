//! Identifier types for escrow entities
//!
//! Every account on the ledger (wallets, mints, token holdings, offer records,
//! vaults) is located by a 32-byte [`Address`]. Wallet addresses are Ed25519
//! public keys; program-derived addresses are deliberately *off* the curve so
//! that no private key can ever sign for them.

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::AddressError;

/// Length of an address in bytes.
pub const ADDRESS_BYTES: usize = 32;

/// A 32-byte ledger address.
///
/// Serialized as a lowercase hex string so that JSON payloads stay readable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    /// Construct from raw bytes.
    pub const fn new_from_array(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    /// Build an address from a short ASCII label, zero-padded to 32 bytes.
    ///
    /// Labels longer than 32 bytes are truncated.
    pub const fn from_label(label: &[u8]) -> Self {
        let mut bytes = [0u8; ADDRESS_BYTES];
        let mut i = 0;
        while i < label.len() && i < ADDRESS_BYTES {
            bytes[i] = label[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Raw bytes of the address.
    pub fn to_bytes(&self) -> [u8; ADDRESS_BYTES] {
        self.0
    }

    /// Whether the bytes decode as a point on the Ed25519 curve.
    ///
    /// Only on-curve addresses can have a corresponding signing key.
    pub fn is_on_curve(&self) -> bool {
        VerifyingKey::from_bytes(&self.0).is_ok()
    }

    /// Interpret the address as an Ed25519 verifying key.
    pub fn to_verifying_key(&self) -> Result<VerifyingKey, AddressError> {
        VerifyingKey::from_bytes(&self.0).map_err(|_| AddressError::NotOnCurve)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_BYTES]> for Address {
    fn from(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }
}

impl From<VerifyingKey> for Address {
    fn from(key: VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl From<&VerifyingKey> for Address {
    fn from(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        let array: [u8; ADDRESS_BYTES] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| AddressError::InvalidLength { len: b.len() })?;
        Ok(Self(array))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(self.0))
    }
}

/// Caller-chosen offer identifier, unique per maker.
///
/// Clients should source it from 8 random bytes so it does not collide with
/// the maker's other open offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(u64);

impl OfferId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Little-endian seed bytes used by address derivation.
    pub fn to_le_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl From<u64> for OfferId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hex_round_trip() {
        let address = Address::new_from_array([7u8; 32]);
        let parsed: Address = address.to_string().parse().unwrap();
        assert_eq!(address, parsed);
    }

    #[test]
    fn test_address_parse_wrong_length() {
        let result = "abcd".parse::<Address>();
        assert_eq!(result, Err(AddressError::InvalidLength { len: 2 }));
    }

    #[test]
    fn test_address_parse_bad_hex() {
        let result = "zz".parse::<Address>();
        assert!(matches!(result, Err(AddressError::InvalidHex(_))));
    }

    #[test]
    fn test_address_serializes_as_hex_string() {
        let address = Address::new_from_array([1u8; 32]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));

        let deserialized: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(address, deserialized);
    }

    #[test]
    fn test_from_label_pads_with_zeroes() {
        let address = Address::from_label(b"abc");
        let bytes = address.to_bytes();
        assert_eq!(&bytes[..3], b"abc");
        assert!(bytes[3..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_basepoint_is_on_curve() {
        // Compressed Ed25519 basepoint
        let mut bytes = [0x66u8; 32];
        bytes[0] = 0x58;
        assert!(Address::new_from_array(bytes).is_on_curve());
    }

    #[test]
    fn test_offer_id_le_bytes() {
        let id = OfferId::new(0x0102);
        assert_eq!(id.to_le_bytes(), [0x02, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(serde_json::to_string(&id).unwrap(), "258");
    }

    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Any 32 bytes survive the hex text form.
            #[test]
            fn fuzz_address_text_form(bytes in any::<[u8; 32]>()) {
                let address = Address::new_from_array(bytes);
                prop_assert_eq!(address.to_string().parse::<Address>(), Ok(address));
            }
        }
    }
}
