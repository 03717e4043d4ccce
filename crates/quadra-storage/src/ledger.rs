//! Address-keyed account ledger.
//!
//! Accounts are stored under their (usually derived) address. The only way to
//! allocate an account is `LedgerTransaction::create`, which fails when the
//! address is already occupied; that create-if-absent check is the ledger's
//! mutual-exclusion primitive.
//!
//! A `LedgerTransaction` holds the ledger's write lock for its whole lifetime, so
//! transactions are serialized. Writes are staged and become visible only on
//! `commit`; dropping the transaction discards them.

use crate::{Account, Database, StorageError};
use parking_lot::{RwLock, RwLockWriteGuard};
use quadra_types::Pubkey;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

const ACCOUNTS_COLUMN: &str = "accounts";

pub struct Ledger {
    accounts: RwLock<HashMap<Pubkey, Account>>,
    db: Option<Database>,
}

impl Ledger {
    /// Create an empty, memory-only ledger.
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            db: None,
        }
    }

    /// Open a ledger persisted under `path`, loading any existing accounts.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = Database::new(path)?;

        let mut accounts = HashMap::new();
        for (key, value) in db.iter(ACCOUNTS_COLUMN)? {
            let address = Pubkey::from_slice(&key)?;
            let account: Account = borsh::from_slice(&value)
                .map_err(|e| StorageError::Deserialization(e.to_string()))?;
            accounts.insert(address, account);
        }
        info!("Loaded {} accounts from {}", accounts.len(), path.display());

        Ok(Self {
            accounts: RwLock::new(accounts),
            db: Some(db),
        })
    }

    pub fn get(&self, address: &Pubkey) -> Option<Account> {
        self.accounts.read().get(address).cloned()
    }

    pub fn contains(&self, address: &Pubkey) -> bool {
        self.accounts.read().contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// All accounts owned by `owner`, ordered by address.
    pub fn accounts_owned_by(&self, owner: &Pubkey) -> Vec<(Pubkey, Account)> {
        let mut out: Vec<(Pubkey, Account)> = self
            .accounts
            .read()
            .iter()
            .filter(|(_, account)| account.is_owned_by(owner))
            .map(|(address, account)| (*address, account.clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Start an atomic unit of work. Blocks until no other transaction is open.
    pub fn begin(&self) -> LedgerTransaction<'_> {
        LedgerTransaction {
            accounts: self.accounts.write(),
            staged: BTreeMap::new(),
            db: self.db.as_ref(),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Staged writes against a locked ledger.
pub struct LedgerTransaction<'a> {
    accounts: RwLockWriteGuard<'a, HashMap<Pubkey, Account>>,
    staged: BTreeMap<Pubkey, Account>,
    db: Option<&'a Database>,
}

impl<'a> LedgerTransaction<'a> {
    /// Read an account, seeing this transaction's own staged writes.
    pub fn get(&self, address: &Pubkey) -> Option<&Account> {
        self.staged.get(address).or_else(|| self.accounts.get(address))
    }

    pub fn exists(&self, address: &Pubkey) -> bool {
        self.get(address).is_some()
    }

    /// Allocate a new account at `address`. Fails if the address is occupied.
    pub fn create(&mut self, address: Pubkey, account: Account) -> Result<(), StorageError> {
        if self.exists(&address) {
            return Err(StorageError::AddressInUse(address));
        }
        debug!(%address, owner = %account.owner, "staging account creation");
        self.staged.insert(address, account);
        Ok(())
    }

    /// Replace the data of an existing account, keeping its owner.
    pub fn write_data(&mut self, address: &Pubkey, data: Vec<u8>) -> Result<(), StorageError> {
        let owner = self
            .get(address)
            .map(|account| account.owner)
            .ok_or(StorageError::AccountNotFound(*address))?;
        self.staged.insert(*address, Account::new(owner, data));
        Ok(())
    }

    /// Number of accounts written so far.
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Apply all staged writes. Persistence, when configured, happens first, so a
    /// failed flush leaves the ledger exactly as it was.
    pub fn commit(mut self) -> Result<usize, StorageError> {
        let staged = std::mem::take(&mut self.staged);
        if staged.is_empty() {
            return Ok(0);
        }

        if let Some(db) = self.db {
            let mut entries = Vec::with_capacity(staged.len());
            for (address, account) in &staged {
                let bytes = borsh::to_vec(account)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                entries.push((address.as_bytes().to_vec(), bytes));
            }
            db.put_batch(ACCOUNTS_COLUMN, &entries)?;
        }

        let written = staged.len();
        self.accounts.extend(staged);
        debug!(written, "ledger transaction committed");
        Ok(written)
    }
}
