//! Ledger: in-memory settlement environment
//!
//! Applies signed transactions one at a time, all-or-nothing:
//! - Signature verification and replay protection
//! - Fee charged to the signer, only on success
//! - Instruction executed against a staging overlay, committed on success
//! - Event log and read-only queries over committed state
//!
//! [`SharedLedger`] serializes transactions from many threads; the escrow
//! program itself never locks.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use swap_types::ids::Address;
use tracing::{info, warn};

use crate::accounts::{self, Account, AccountsDb, AccountsOverlay};
use crate::config::LedgerConfig;
use crate::derivation;
use crate::errors::{AccountError, ConfigError, SwapError, TokenError, TransactionError};
use crate::events::SwapEvent;
use crate::processor::{self, InvokeContext};
use crate::security::{Authority, SignatureTracker};
use crate::state::Offer;
use crate::token::{self, Mint, TokenAccount};
use crate::transaction::Transaction;

/// Ledger time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    pub slot: u64,
    pub unix_timestamp: i64,
}

impl Clock {
    pub fn new(slot: u64) -> Self {
        Self {
            slot,
            unix_timestamp: Utc::now().timestamp(),
        }
    }

    /// The clock for the next transaction; timestamps never go backwards.
    fn next(&self) -> Option<Self> {
        Some(Self {
            slot: self.slot.checked_add(1)?,
            unix_timestamp: Utc::now().timestamp().max(self.unix_timestamp),
        })
    }
}

/// Outcome of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub signature: String,
    pub slot: u64,
    pub fee: u64,
    pub event: SwapEvent,
}

#[derive(Debug)]
pub struct Ledger {
    accounts: AccountsDb,
    config: LedgerConfig,
    clock: Clock,
    signatures: SignatureTracker,
    /// Append-only event log
    events: Vec<SwapEvent>,
}

impl Ledger {
    /// Build a ledger from a validated configuration.
    pub fn new(config: LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    pub fn with_default_config() -> Self {
        Self::build(LedgerConfig::default())
    }

    fn build(config: LedgerConfig) -> Self {
        info!(
            lamports_per_signature = config.lamports_per_signature,
            account_deposit = config.account_deposit,
            starting_slot = config.starting_slot,
            "Ledger initialized"
        );

        Self {
            accounts: AccountsDb::new(),
            clock: Clock::new(config.starting_slot),
            config,
            signatures: SignatureTracker::new(),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Transactions ─────────────────────────

    /// Verify, execute and commit a transaction.
    ///
    /// On error nothing changes: no fee, no balances, no records.
    pub fn process_transaction(
        &mut self,
        tx: &Transaction,
    ) -> Result<TransactionReceipt, TransactionError> {
        let result = self.execute(tx);
        match &result {
            Ok(receipt) => info!(
                signature = %receipt.signature,
                slot = receipt.slot,
                event = receipt.event.label(),
                offer = %receipt.event.offer(),
                "Transaction committed"
            ),
            Err(err) => warn!(
                signature = %tx.signature,
                instruction = tx.message.instruction.name(),
                error = %err,
                "Transaction rejected"
            ),
        }
        result
    }

    fn execute(&mut self, tx: &Transaction) -> Result<TransactionReceipt, TransactionError> {
        tx.verify()?;
        let signature = tx.signature_bytes()?;
        if self.signatures.is_processed(&signature) {
            return Err(TransactionError::DuplicateSignature {
                signature: tx.signature.clone(),
            });
        }

        let fee = self.config.lamports_per_signature;
        let clock = self.clock.next().ok_or(TransactionError::ClockOverflow {
            slot: self.clock.slot,
        })?;

        let (writes, event) = {
            let mut ctx = InvokeContext {
                accounts: AccountsOverlay::new(&self.accounts),
                config: &self.config,
                clock,
                signer: Authority::signer(tx.signer),
            };
            accounts::debit_lamports(&mut ctx.accounts, &tx.signer, fee).map_err(|e| match e {
                AccountError::NotFound { address } => TransactionError::FeePayerNotFound { address },
                AccountError::InsufficientLamports {
                    required,
                    available,
                    ..
                } => TransactionError::InsufficientFundsForFee {
                    required,
                    available,
                },
                other => TransactionError::Instruction(other.into()),
            })?;

            let event = processor::process_instruction(&mut ctx, &tx.message.instruction)?;
            (ctx.accounts.into_writes(), event)
        };

        accounts::commit(&mut self.accounts, writes);
        self.clock = clock;
        self.signatures.record(signature);
        self.events.push(event.clone());

        Ok(TransactionReceipt {
            signature: tx.signature.clone(),
            slot: clock.slot,
            fee,
            event,
        })
    }

    // ───────────────────────── Genesis ─────────────────────────
    //
    // Trusted setup helpers: no signature, but still all-or-nothing.

    fn apply<T, E>(
        &mut self,
        f: impl FnOnce(&mut AccountsOverlay<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let (value, writes) = {
            let mut overlay = AccountsOverlay::new(&self.accounts);
            let value = f(&mut overlay)?;
            (value, overlay.into_writes())
        };
        accounts::commit(&mut self.accounts, writes);
        Ok(value)
    }

    /// Credit lamports to a wallet, creating it if needed.
    ///
    /// Only wallet keys qualify; program-derived addresses are refused so an
    /// airdrop cannot squat on a future offer or vault.
    pub fn airdrop(&mut self, to: &Address, lamports: u64) -> Result<(), AccountError> {
        if !to.is_on_curve() {
            return Err(AccountError::InvalidData {
                address: *to,
                expected: "wallet",
            });
        }
        self.apply(|overlay| accounts::credit_lamports(overlay, to, lamports))
    }

    /// Create a mint at `mint`, paid by `mint_authority`.
    pub fn create_mint(
        &mut self,
        mint: &Address,
        mint_authority: &Address,
        decimals: u8,
    ) -> Result<(), TokenError> {
        let deposit = self.config.account_deposit;
        self.apply(|overlay| {
            token::initialize_mint(overlay, mint_authority, mint, mint_authority, decimals, deposit)
        })
    }

    /// Create the associated holding of `owner` for `mint`, paid by `payer`.
    pub fn create_associated_token_account(
        &mut self,
        payer: &Address,
        owner: &Address,
        mint: &Address,
    ) -> Result<Address, SwapError> {
        let address = derivation::associated_token_address(owner, mint)?;
        let deposit = self.config.account_deposit;
        self.apply(|overlay| {
            token::initialize_account(overlay, payer, &address, mint, owner, deposit)
        })?;
        Ok(address)
    }

    /// Mint `amount` into `owner`'s associated holding, creating it if needed.
    ///
    /// The mint authority pays for any account it creates.
    pub fn mint_to(
        &mut self,
        mint: &Address,
        mint_authority: &Address,
        owner: &Address,
        amount: u64,
    ) -> Result<Address, SwapError> {
        let address = derivation::associated_token_address(owner, mint)?;
        let deposit = self.config.account_deposit;
        self.apply(|overlay| -> Result<(), SwapError> {
            if !overlay.exists(&address) {
                token::initialize_account(overlay, mint_authority, &address, mint, owner, deposit)?;
            }
            token::mint_to(overlay, mint, &address, &Authority::signer(*mint_authority), amount)?;
            Ok(())
        })?;
        Ok(address)
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn lamports(&self, address: &Address) -> u64 {
        self.accounts.get(address).map_or(0, |a| a.lamports)
    }

    pub fn mint(&self, address: &Address) -> Result<Mint, TokenError> {
        token::load_mint(&self.view(), address)
    }

    pub fn token_account(&self, address: &Address) -> Result<TokenAccount, TokenError> {
        token::load_token_account(&self.view(), address)
    }

    pub fn token_balance(&self, address: &Address) -> Result<u64, TokenError> {
        self.token_account(address).map(|holding| holding.amount)
    }

    /// Fetch the offer record at `address`.
    pub fn fetch_offer(&self, address: &Address) -> Result<Offer, SwapError> {
        processor::fetch_offer(&self.view(), address)
    }

    /// Fetch the balance of the vault at `address`.
    pub fn vault_balance(&self, address: &Address) -> Result<u64, TokenError> {
        processor::vault_balance(&self.view(), address)
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn events(&self) -> &[SwapEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<SwapEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of committed transactions.
    pub fn transaction_count(&self) -> usize {
        self.signatures.count()
    }

    fn view(&self) -> AccountsOverlay<'_> {
        AccountsOverlay::new(&self.accounts)
    }
}

/// Thread-safe handle that serializes access to one ledger.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        // A panicking reader cannot leave staged writes behind
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn process_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<TransactionReceipt, TransactionError> {
        self.lock().process_transaction(tx)
    }

    /// Run a read-only closure against the ledger.
    pub fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.lock())
    }

    /// Run a mutating closure against the ledger.
    pub fn write<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SwapError;
    use crate::instructions::{CancelOfferAccounts, SwapInstruction};
    use crate::transaction::Message;
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;
    use swap_types::ids::OfferId;

    fn keypair() -> (SigningKey, Address) {
        let key = SigningKey::generate(&mut OsRng);
        let address = Address::from(key.verifying_key());
        (key, address)
    }

    fn cancel_missing_offer(signer: &Address, nonce: u64) -> Message {
        let missing = Address::new_from_array([0xAA; 32]);
        Message::new(
            SwapInstruction::CancelOffer {
                accounts: CancelOfferAccounts {
                    maker: *signer,
                    token_mint_a: missing,
                    maker_token_account_a: missing,
                    offer: missing,
                    vault: missing,
                },
            },
            nonce,
        )
    }

    #[test]
    fn test_airdrop_creates_wallet() {
        let mut ledger = Ledger::with_default_config();
        let (_, wallet) = keypair();
        ledger.airdrop(&wallet, 1_000).unwrap();
        ledger.airdrop(&wallet, 500).unwrap();
        assert_eq!(ledger.lamports(&wallet), 1_500);
    }

    #[test]
    fn test_mint_to_creates_associated_holding() {
        let mut ledger = Ledger::with_default_config();
        let (_, authority) = keypair();
        let (_, owner) = keypair();
        let mint = Address::new_from_array([0x11; 32]);
        ledger.airdrop(&authority, 1_000_000_000).unwrap();
        ledger.create_mint(&mint, &authority, 6).unwrap();

        let holding = ledger.mint_to(&mint, &authority, &owner, 250).unwrap();
        assert_eq!(
            holding,
            derivation::associated_token_address(&owner, &mint).unwrap()
        );
        assert_eq!(ledger.token_balance(&holding).unwrap(), 250);
        assert_eq!(ledger.mint(&mint).unwrap().supply, 250);
    }

    #[test]
    fn test_failed_genesis_step_rolls_back() {
        let mut ledger = Ledger::with_default_config();
        let (_, authority) = keypair();
        let (_, owner) = keypair();
        let mint = Address::new_from_array([0x12; 32]);
        ledger.airdrop(&authority, 1_000_000_000).unwrap();
        ledger.create_mint(&mint, &authority, 6).unwrap();

        let (_, impostor) = keypair();
        ledger.airdrop(&impostor, 1_000_000_000).unwrap();
        let result = ledger.mint_to(&mint, &impostor, &owner, 1);
        assert!(result.is_err());

        // The holding created before the failing mint_to step was not kept
        let holding = derivation::associated_token_address(&owner, &mint).unwrap();
        assert!(ledger.account(&holding).is_none());
        assert_eq!(ledger.lamports(&impostor), 1_000_000_000);
    }

    #[test]
    fn test_failed_instruction_charges_no_fee() {
        let mut ledger = Ledger::with_default_config();
        let (key, wallet) = keypair();
        ledger.airdrop(&wallet, 1_000_000).unwrap();

        let tx = Transaction::sign(cancel_missing_offer(&wallet, 1), &key).unwrap();
        let err = ledger.process_transaction(&tx).unwrap_err();
        assert!(matches!(
            err.instruction_error(),
            Some(SwapError::OfferNotFound { .. })
        ));
        assert_eq!(ledger.lamports(&wallet), 1_000_000);
        assert_eq!(ledger.transaction_count(), 0);
        assert_eq!(ledger.clock().slot, 0);
    }

    #[test]
    fn test_unknown_fee_payer_rejected() {
        let mut ledger = Ledger::with_default_config();
        let (key, wallet) = keypair();
        let tx = Transaction::sign(cancel_missing_offer(&wallet, 1), &key).unwrap();
        assert_eq!(
            ledger.process_transaction(&tx),
            Err(TransactionError::FeePayerNotFound { address: wallet })
        );
    }

    #[test]
    fn test_fee_payer_too_poor() {
        let mut ledger = Ledger::with_default_config();
        let (key, wallet) = keypair();
        ledger.airdrop(&wallet, 10).unwrap();
        let tx = Transaction::sign(cancel_missing_offer(&wallet, 1), &key).unwrap();
        assert_eq!(
            ledger.process_transaction(&tx),
            Err(TransactionError::InsufficientFundsForFee {
                required: 5_000,
                available: 10,
            })
        );
    }

    #[test]
    fn test_forged_signature_rejected() {
        let mut ledger = Ledger::with_default_config();
        let (key, _) = keypair();
        let (_, victim) = keypair();
        ledger.airdrop(&victim, 1_000_000).unwrap();

        let mut tx = Transaction::sign(cancel_missing_offer(&victim, 1), &key).unwrap();
        tx.signer = victim;
        assert_eq!(
            ledger.process_transaction(&tx),
            Err(TransactionError::InvalidSignature)
        );
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = Clock::new(5);
        let next = clock.next().unwrap();
        assert_eq!(next.slot, 6);
        assert!(next.unix_timestamp >= clock.unix_timestamp);
    }

    #[test]
    fn test_clock_stops_at_last_slot() {
        assert!(Clock::new(u64::MAX).next().is_none());
        assert_eq!(Clock::new(u64::MAX - 1).next().unwrap().slot, u64::MAX);
    }

    #[test]
    fn test_new_validates_config() {
        let last_slot = LedgerConfig {
            starting_slot: u64::MAX,
            ..LedgerConfig::default()
        };
        assert!(matches!(Ledger::new(last_slot), Err(ConfigError::Invalid(_))));

        let no_deposit = LedgerConfig {
            account_deposit: 0,
            ..LedgerConfig::default()
        };
        assert!(matches!(Ledger::new(no_deposit), Err(ConfigError::Invalid(_))));

        let ledger = Ledger::new(LedgerConfig {
            starting_slot: 40,
            ..LedgerConfig::default()
        })
        .unwrap();
        assert_eq!(ledger.clock().slot, 40);
    }

    #[test]
    fn test_airdrop_refuses_derived_address() {
        let mut ledger = Ledger::with_default_config();
        let (_, maker) = keypair();
        let (offer, _) = derivation::offer_address(&maker, OfferId::new(1)).unwrap();
        assert_eq!(
            ledger.airdrop(&offer, 1),
            Err(AccountError::InvalidData {
                address: offer,
                expected: "wallet",
            })
        );
        assert!(ledger.account(&offer).is_none());
    }

    #[test]
    fn test_shared_ledger_read_write() {
        let shared = SharedLedger::new(Ledger::with_default_config());
        let (_, wallet) = keypair();
        shared.write(|ledger| ledger.airdrop(&wallet, 42)).unwrap();
        assert_eq!(shared.read(|ledger| ledger.lamports(&wallet)), 42);
    }
}
