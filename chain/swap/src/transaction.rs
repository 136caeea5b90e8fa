//! Signed transactions
//!
//! A transaction carries one instruction and a client nonce. The signer signs
//! the SHA-256 of the message's canonical JSON bytes with Ed25519; the signer's
//! address is its public key.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use swap_types::ids::Address;

use crate::errors::TransactionError;
use crate::instructions::SwapInstruction;

/// Signed payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub instruction: SwapInstruction,
    /// Distinguishes otherwise identical submissions
    pub nonce: u64,
}

impl Message {
    pub fn new(instruction: SwapInstruction, nonce: u64) -> Self {
        Self { instruction, nonce }
    }

    /// Canonical JSON bytes.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        serde_json::to_vec(self).map_err(|e| TransactionError::Serialization(e.to_string()))
    }

    /// SHA-256 of the canonical bytes.
    pub fn hash(&self) -> Result<[u8; 32], TransactionError> {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_bytes()?);
        Ok(hasher.finalize().into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub message: Message,
    pub signer: Address,
    /// Ed25519 signature as hex string
    pub signature: String,
}

impl Transaction {
    /// Sign `message` with `key`.
    pub fn sign(message: Message, key: &SigningKey) -> Result<Self, TransactionError> {
        let hash = message.hash()?;
        let signature = key.sign(&hash);
        Ok(Self {
            message,
            signer: Address::from(key.verifying_key()),
            signature: hex::encode(signature.to_bytes()),
        })
    }

    /// Raw signature bytes. Only the lowercase hex spelling is accepted, so
    /// each signature has exactly one text form.
    pub fn signature_bytes(&self) -> Result<[u8; 64], TransactionError> {
        let bytes: [u8; 64] = hex::decode(&self.signature)
            .map_err(|_| TransactionError::InvalidSignature)?
            .try_into()
            .map_err(|_| TransactionError::InvalidSignature)?;
        if hex::encode(bytes) != self.signature {
            return Err(TransactionError::InvalidSignature);
        }
        Ok(bytes)
    }

    /// Check the signature against the signer's public key.
    pub fn verify(&self) -> Result<(), TransactionError> {
        let verifying_key = self
            .signer
            .to_verifying_key()
            .map_err(|_| TransactionError::InvalidSignature)?;
        let signature = Signature::from_bytes(&self.signature_bytes()?);

        let hash = self.message.hash()?;
        verifying_key
            .verify(&hash, &signature)
            .map_err(|_| TransactionError::InvalidSignature)
    }
}
