//! Token balances consumed by the vote processor.
//!
//! Token custody is external to governance; votes only need a read-only view
//! of who holds how much of which token.

use parking_lot::RwLock;
use quadra_types::Pubkey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A holder's balance of one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

/// Read-only balance lookup.
pub trait TokenLedger: Send + Sync {
    fn token_account(&self, address: &Pubkey) -> Option<TokenAccount>;
}

/// A token account together with its address, as stored in snapshot files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccountEntry {
    pub address: Pubkey,
    #[serde(flatten)]
    pub account: TokenAccount,
}

/// Token balances held in memory.
#[derive(Debug, Default)]
pub struct InMemoryTokenLedger {
    accounts: RwLock<HashMap<Pubkey, TokenAccount>>,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = TokenAccountEntry>) -> Self {
        let accounts = entries
            .into_iter()
            .map(|entry| (entry.address, entry.account))
            .collect();
        Self {
            accounts: RwLock::new(accounts),
        }
    }

    pub fn insert(&self, address: Pubkey, account: TokenAccount) {
        self.accounts.write().insert(address, account);
    }

    /// Change the balance of an existing account. Returns false if it does not exist.
    pub fn set_amount(&self, address: &Pubkey, amount: u64) -> bool {
        match self.accounts.write().get_mut(address) {
            Some(account) => {
                account.amount = amount;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn token_account(&self, address: &Pubkey) -> Option<TokenAccount> {
        self.accounts.read().get(address).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::from_bytes([n; 32])
    }

    #[test]
    fn test_insert_and_lookup() {
        let tokens = InMemoryTokenLedger::new();
        assert!(tokens.is_empty());

        let account = TokenAccount { owner: key(1), mint: key(2), amount: 500 };
        tokens.insert(key(3), account.clone());
        assert_eq!(tokens.token_account(&key(3)), Some(account));
        assert_eq!(tokens.token_account(&key(4)), None);
    }

    #[test]
    fn test_set_amount() {
        let tokens = InMemoryTokenLedger::new();
        tokens.insert(key(3), TokenAccount { owner: key(1), mint: key(2), amount: 500 });

        assert!(tokens.set_amount(&key(3), 7));
        assert_eq!(tokens.token_account(&key(3)).unwrap().amount, 7);
        assert!(!tokens.set_amount(&key(4), 7));
    }

    #[test]
    fn test_snapshot_json() {
        let entry = TokenAccountEntry {
            address: key(3),
            account: TokenAccount { owner: key(1), mint: key(2), amount: 42 },
        };
        let json = serde_json::to_string(&vec![entry.clone()]).unwrap();
        assert!(json.contains("\"amount\":42"));

        let entries: Vec<TokenAccountEntry> = serde_json::from_str(&json).unwrap();
        let tokens = InMemoryTokenLedger::from_entries(entries);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.token_account(&key(3)), Some(entry.account));
    }
}
