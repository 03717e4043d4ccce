//! Typed record access inside one ledger transaction.

use crate::config::GovernanceConfig;
use crate::error::GovernanceError;
use crate::state::AccountRecord;
use quadra_storage::{Account, LedgerTransaction};
use quadra_types::Pubkey;

/// Everything an operation may read or stage while it runs.
pub struct InstructionContext<'a, 'l> {
    pub config: &'a GovernanceConfig,
    /// Verified transaction signer
    pub signer: Pubkey,
    tx: &'a mut LedgerTransaction<'l>,
}

impl<'a, 'l> InstructionContext<'a, 'l> {
    pub fn new(config: &'a GovernanceConfig, signer: Pubkey, tx: &'a mut LedgerTransaction<'l>) -> Self {
        Self { config, signer, tx }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.config.program_id
    }

    pub fn exists(&self, address: &Pubkey) -> bool {
        self.tx.exists(address)
    }

    /// Decode the record at `address`. Accounts owned by another program are rejected.
    pub fn load<R: AccountRecord>(&self, address: &Pubkey) -> Result<R, GovernanceError> {
        let account = self
            .tx
            .get(address)
            .ok_or(GovernanceError::AccountNotFound(*address))?;
        if !account.is_owned_by(self.program_id()) {
            return Err(GovernanceError::InvalidAccountData(format!(
                "account {} is owned by {}",
                address, account.owner
            )));
        }
        R::from_account_data(&account.data)
    }

    /// Allocate `address` for `record`. Fails with `AddressAlreadyInUse` if occupied.
    pub fn create<R: AccountRecord>(&mut self, address: Pubkey, record: &R) -> Result<(), GovernanceError> {
        let data = record.to_account_data()?;
        let owner = *self.program_id();
        self.tx.create(address, Account::new(owner, data))?;
        Ok(())
    }

    /// Overwrite an existing record.
    pub fn store<R: AccountRecord>(&mut self, address: &Pubkey, record: &R) -> Result<(), GovernanceError> {
        let data = record.to_account_data()?;
        self.tx.write_data(address, data)?;
        Ok(())
    }
}
