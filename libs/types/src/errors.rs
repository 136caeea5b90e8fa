//! Error types for identifier parsing

use thiserror::Error;

/// Errors raised while decoding an [`Address`](crate::ids::Address).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid address length: expected 32 bytes, got {len}")]
    InvalidLength { len: usize },

    #[error("Address is not a valid Ed25519 public key")]
    NotOnCurve,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_length_display() {
        let err = AddressError::InvalidLength { len: 31 };
        assert_eq!(
            err.to_string(),
            "Invalid address length: expected 32 bytes, got 31"
        );
    }
}
