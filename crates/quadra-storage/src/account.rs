use borsh::{BorshDeserialize, BorshSerialize};
use quadra_types::Pubkey;

/// A ledger account: opaque record bytes plus the program that owns them.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Account {
    /// Program allowed to write this account
    pub owner: Pubkey,
    /// Record bytes, interpreted by the owner
    pub data: Vec<u8>,
}

impl Account {
    pub fn new(owner: Pubkey, data: Vec<u8>) -> Self {
        Self { owner, data }
    }

    pub fn is_owned_by(&self, program_id: &Pubkey) -> bool {
        &self.owner == program_id
    }
}
