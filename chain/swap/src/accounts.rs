//! Ledger accounts and the transactional staging buffer
//!
//! Every transaction executes against an [`AccountsOverlay`]: reads fall
//! through to committed state, writes are staged in the overlay. The ledger
//! applies the staged writes only when the whole instruction succeeds, so a
//! failed transaction leaves no trace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use swap_types::ids::Address;
use swap_types::programs::SYSTEM_PROGRAM_ID;

use crate::errors::AccountError;
use crate::state::Offer;
use crate::token::{Mint, TokenAccount};

/// Committed account storage.
pub type AccountsDb = BTreeMap<Address, Account>;

/// Typed account payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountData {
    /// Plain wallet holding only lamports
    System,
    Mint(Mint),
    Token(TokenAccount),
    Offer(Offer),
}

/// A single ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Native balance, including any refundable account deposit
    pub lamports: u64,
    /// Program allowed to mutate `data`
    pub owner: Address,
    pub data: AccountData,
}

impl Account {
    /// A wallet account owned by the system program.
    pub fn system(lamports: u64) -> Self {
        Self {
            lamports,
            owner: SYSTEM_PROGRAM_ID,
            data: AccountData::System,
        }
    }
}

/// Copy-on-write view over committed accounts.
#[derive(Debug)]
pub struct AccountsOverlay<'a> {
    base: &'a AccountsDb,
    /// `None` marks an account closed by this transaction
    writes: BTreeMap<Address, Option<Account>>,
}

impl<'a> AccountsOverlay<'a> {
    pub fn new(base: &'a AccountsDb) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
        }
    }

    /// Current view of an account.
    pub fn get(&self, address: &Address) -> Option<&Account> {
        match self.writes.get(address) {
            Some(staged) => staged.as_ref(),
            None => self.base.get(address),
        }
    }

    pub fn exists(&self, address: &Address) -> bool {
        self.get(address).is_some()
    }

    /// Mutable access, copying the committed account into the overlay first.
    pub fn get_mut(&mut self, address: &Address) -> Option<&mut Account> {
        if !self.writes.contains_key(address) {
            let committed = self.base.get(address)?.clone();
            self.writes.insert(*address, Some(committed));
        }
        self.writes.get_mut(address).and_then(|staged| staged.as_mut())
    }

    /// Stage a new or replaced account.
    pub fn put(&mut self, address: Address, account: Account) {
        self.writes.insert(address, Some(account));
    }

    /// Stage removal; returns the account as it was.
    pub fn remove(&mut self, address: &Address) -> Option<Account> {
        let current = self.get(address).cloned();
        if current.is_some() {
            self.writes.insert(*address, None);
        }
        current
    }

    /// Lamports held by an account, zero if absent.
    pub fn lamports(&self, address: &Address) -> u64 {
        self.get(address).map_or(0, |a| a.lamports)
    }

    /// Number of staged writes.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Consume the overlay, yielding the staged writes.
    pub fn into_writes(self) -> BTreeMap<Address, Option<Account>> {
        self.writes
    }
}

/// Apply staged writes to committed storage.
pub fn commit(db: &mut AccountsDb, writes: BTreeMap<Address, Option<Account>>) {
    for (address, staged) in writes {
        match staged {
            Some(account) => {
                db.insert(address, account);
            }
            None => {
                db.remove(&address);
            }
        }
    }
}

// ───────────────────────── System operations ─────────────────────────

/// Debit lamports from an account.
pub fn debit_lamports(
    accounts: &mut AccountsOverlay<'_>,
    address: &Address,
    amount: u64,
) -> Result<(), AccountError> {
    let account = accounts
        .get_mut(address)
        .ok_or(AccountError::NotFound { address: *address })?;

    if account.lamports < amount {
        return Err(AccountError::InsufficientLamports {
            account: *address,
            required: amount,
            available: account.lamports,
        });
    }
    account.lamports -= amount;
    Ok(())
}

/// Credit lamports, creating a wallet account if none exists.
pub fn credit_lamports(
    accounts: &mut AccountsOverlay<'_>,
    address: &Address,
    amount: u64,
) -> Result<(), AccountError> {
    match accounts.get_mut(address) {
        Some(account) => {
            account.lamports = account
                .lamports
                .checked_add(amount)
                .ok_or(AccountError::Overflow)?;
        }
        None => accounts.put(*address, Account::system(amount)),
    }
    Ok(())
}

/// Create an account funded by `payer` with a refundable deposit.
pub fn create_account(
    accounts: &mut AccountsOverlay<'_>,
    payer: &Address,
    address: &Address,
    owner: Address,
    data: AccountData,
    deposit: u64,
) -> Result<(), AccountError> {
    if accounts.exists(address) {
        return Err(AccountError::AlreadyExists { address: *address });
    }
    debit_lamports(accounts, payer, deposit)?;
    accounts.put(
        *address,
        Account {
            lamports: deposit,
            owner,
            data,
        },
    );
    Ok(())
}

/// Remove an account, returning its lamports to `destination`.
pub fn close_account(
    accounts: &mut AccountsOverlay<'_>,
    address: &Address,
    destination: &Address,
) -> Result<u64, AccountError> {
    let closed = accounts
        .remove(address)
        .ok_or(AccountError::NotFound { address: *address })?;
    credit_lamports(accounts, destination, closed.lamports)?;
    Ok(closed.lamports)
}
