//! Shared fixture: one maker holding asset A, one taker holding asset B.

#![allow(dead_code)]

use ed25519_dalek::SigningKey;
use swap::derivation;
use swap::errors::{SwapError, TransactionError};
use swap::instructions::SwapInstruction;
use swap::ledger::{Ledger, TransactionReceipt};
use swap::sdk::{self, OfferAddresses};
use swap_types::ids::{Address, OfferId};

pub const STARTING_BALANCE: u64 = 1_000_000_000;
pub const WALLET_LAMPORTS: u64 = 10_000_000_000;
pub const DECIMALS: u8 = 6;

pub struct Fixture {
    pub ledger: Ledger,
    pub maker_key: SigningKey,
    pub maker: Address,
    pub taker_key: SigningKey,
    pub taker: Address,
    pub mint_authority: Address,
    pub mint_a: Address,
    pub mint_b: Address,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_ledger(Ledger::with_default_config())
    }

    pub fn with_ledger(mut ledger: Ledger) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let (maker_key, maker) = sdk::generate_keypair();
        let (taker_key, taker) = sdk::generate_keypair();
        let (_, mint_authority) = sdk::generate_keypair();
        let (_, mint_a) = sdk::generate_keypair();
        let (_, mint_b) = sdk::generate_keypair();

        for wallet in [&maker, &taker, &mint_authority] {
            ledger.airdrop(wallet, WALLET_LAMPORTS).unwrap();
        }
        ledger.create_mint(&mint_a, &mint_authority, DECIMALS).unwrap();
        ledger.create_mint(&mint_b, &mint_authority, DECIMALS).unwrap();
        ledger
            .mint_to(&mint_a, &mint_authority, &maker, STARTING_BALANCE)
            .unwrap();
        ledger
            .mint_to(&mint_b, &mint_authority, &taker, STARTING_BALANCE)
            .unwrap();

        Self {
            ledger,
            maker_key,
            maker,
            taker_key,
            taker,
            mint_authority,
            mint_a,
            mint_b,
        }
    }

    /// A second funded taker holding asset B.
    pub fn add_taker(&mut self) -> (SigningKey, Address) {
        let (key, taker) = sdk::generate_keypair();
        self.ledger.airdrop(&taker, WALLET_LAMPORTS).unwrap();
        self.ledger
            .mint_to(&self.mint_b, &self.mint_authority, &taker, STARTING_BALANCE)
            .unwrap();
        (key, taker)
    }

    pub fn ata(&self, owner: &Address, mint: &Address) -> Address {
        derivation::associated_token_address(owner, mint).unwrap()
    }

    /// Balance of `owner`'s associated holding, zero when it does not exist.
    pub fn balance(&self, owner: &Address, mint: &Address) -> u64 {
        self.ledger
            .token_balance(&self.ata(owner, mint))
            .unwrap_or(0)
    }

    pub fn addresses(&self, id: OfferId) -> OfferAddresses {
        sdk::derive_offer_addresses(&self.maker, id, &self.mint_a).unwrap()
    }

    pub fn submit(
        &mut self,
        key: &SigningKey,
        instruction: SwapInstruction,
    ) -> Result<TransactionReceipt, TransactionError> {
        let tx = sdk::sign(instruction, key).unwrap();
        self.ledger.process_transaction(&tx)
    }

    pub fn make_offer(
        &mut self,
        id: OfferId,
        offered: u64,
        wanted: u64,
    ) -> Result<TransactionReceipt, TransactionError> {
        let ix = sdk::make_offer_instruction(
            &self.maker,
            &self.mint_a,
            &self.mint_b,
            id,
            offered,
            wanted,
        )
        .unwrap();
        let key = self.maker_key.clone();
        self.submit(&key, ix)
    }

    pub fn take_offer(&mut self, id: OfferId) -> Result<TransactionReceipt, TransactionError> {
        let ix = self.take_instruction(&self.taker.clone(), id);
        let key = self.taker_key.clone();
        self.submit(&key, ix)
    }

    pub fn take_instruction(&self, taker: &Address, id: OfferId) -> SwapInstruction {
        sdk::take_offer_instruction(taker, &self.maker, &self.mint_a, &self.mint_b, id).unwrap()
    }

    pub fn cancel_offer(&mut self, id: OfferId) -> Result<TransactionReceipt, TransactionError> {
        let ix = sdk::cancel_offer_instruction(&self.maker, &self.mint_a, id).unwrap();
        let key = self.maker_key.clone();
        self.submit(&key, ix)
    }

    /// Balances and lamports of every party, for before/after comparisons.
    pub fn snapshot(&self) -> Vec<u64> {
        let mut values = Vec::new();
        for owner in [&self.maker, &self.taker] {
            values.push(self.ledger.lamports(owner));
            values.push(self.balance(owner, &self.mint_a));
            values.push(self.balance(owner, &self.mint_b));
        }
        values.push(self.ledger.transaction_count() as u64);
        values
    }
}

/// The program error behind a failed transaction.
pub fn swap_error(result: Result<TransactionReceipt, TransactionError>) -> SwapError {
    match result {
        Err(TransactionError::Instruction(err)) => err,
        other => panic!("expected an instruction error, got {:?}", other),
    }
}
