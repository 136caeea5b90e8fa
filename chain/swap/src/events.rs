//! Escrow events
//!
//! Immutable records emitted by each successful instruction and appended to
//! the ledger's event log.

use serde::{Deserialize, Serialize};
use swap_types::ids::{Address, OfferId};

/// Offer opened and asset A moved into the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferMade {
    pub offer: Address,
    pub id: OfferId,
    pub maker: Address,
    pub vault: Address,
    pub token_mint_a: Address,
    pub token_mint_b: Address,
    pub token_a_offered_amount: u64,
    pub token_b_wanted_amount: u64,
    pub slot: u64,
    pub timestamp: i64,
}

/// Offer fulfilled by a taker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTaken {
    pub offer: Address,
    pub id: OfferId,
    pub maker: Address,
    pub taker: Address,
    /// Asset A released from the vault to the taker
    pub token_a_amount: u64,
    /// Asset B delivered to the maker
    pub token_b_amount: u64,
    pub slot: u64,
    pub timestamp: i64,
}

/// Offer withdrawn by its maker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferCancelled {
    pub offer: Address,
    pub id: OfferId,
    pub maker: Address,
    pub token_a_refunded: u64,
    pub slot: u64,
    pub timestamp: i64,
}

/// Enum wrapper for all escrow events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SwapEvent {
    OfferMade(OfferMade),
    OfferTaken(OfferTaken),
    OfferCancelled(OfferCancelled),
}

impl SwapEvent {
    /// Address of the offer the event concerns.
    pub fn offer(&self) -> &Address {
        match self {
            SwapEvent::OfferMade(e) => &e.offer,
            SwapEvent::OfferTaken(e) => &e.offer,
            SwapEvent::OfferCancelled(e) => &e.offer,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SwapEvent::OfferMade(_) => "OfferMade",
            SwapEvent::OfferTaken(_) => "OfferTaken",
            SwapEvent::OfferCancelled(_) => "OfferCancelled",
        }
    }
}
