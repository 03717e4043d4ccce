//! Governance records as stored in ledger accounts.
//!
//! Each record is written as an 8-byte discriminator followed by its borsh
//! encoding. The discriminator is `blake3("account:<Name>")[..8]`.

use crate::error::GovernanceError;
use borsh::{BorshDeserialize, BorshSerialize};
use quadra_types::{Hash, Pubkey};
use serde::{Deserialize, Serialize};

/// Length of the record-kind tag at the start of every account.
pub const DISCRIMINATOR_LEN: usize = 8;

/// A record type that can live in a governance-owned account.
pub trait AccountRecord: BorshSerialize + BorshDeserialize {
    const NAME: &'static str;

    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        Hash::compute(format!("account:{}", Self::NAME).as_bytes()).prefix()
    }

    fn to_account_data(&self) -> Result<Vec<u8>, GovernanceError> {
        let mut data = Self::discriminator().to_vec();
        BorshSerialize::serialize(self, &mut data)
            .map_err(|e| GovernanceError::InvalidAccountData(e.to_string()))?;
        Ok(data)
    }

    fn from_account_data(data: &[u8]) -> Result<Self, GovernanceError> {
        if data.len() < DISCRIMINATOR_LEN || data[..DISCRIMINATOR_LEN] != Self::discriminator() {
            return Err(GovernanceError::InvalidAccountData(format!(
                "account does not hold a {}",
                Self::NAME
            )));
        }
        borsh::from_slice(&data[DISCRIMINATOR_LEN..])
            .map_err(|e| GovernanceError::InvalidAccountData(e.to_string()))
    }
}

/// A governed organization.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Dao {
    /// Creator; the only identity allowed to open proposals
    pub authority: Pubkey,
    /// Token whose balances are converted into voting credits
    pub mint: Pubkey,
    pub name: String,
    /// Index the next proposal will be created under
    pub proposal_count: u64,
    pub bump: u8,
}

impl Dao {
    /// Advance the proposal counter, returning the index that was consumed.
    pub fn advance_proposal_count(&mut self) -> Result<u64, GovernanceError> {
        let index = self.proposal_count;
        self.proposal_count = index
            .checked_add(1)
            .ok_or(GovernanceError::ArithmeticOverflow)?;
        Ok(index)
    }
}

impl AccountRecord for Dao {
    const NAME: &'static str = "Dao";
}

/// One item put to a vote within a DAO.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Proposal {
    pub dao: Pubkey,
    pub index: u64,
    pub subject: String,
    pub metadata: String,
    /// Credited author; may differ from the DAO authority that created it
    pub proposer: Pubkey,
    pub yes_vote_count: u64,
    pub no_vote_count: u64,
    pub bump: u8,
}

impl Proposal {
    /// Count one more voter on `choice`.
    pub fn record_vote(&mut self, choice: VoteChoice) -> Result<(), GovernanceError> {
        let counter = match choice {
            VoteChoice::Yes => &mut self.yes_vote_count,
            VoteChoice::No => &mut self.no_vote_count,
        };
        *counter = counter
            .checked_add(1)
            .ok_or(GovernanceError::ArithmeticOverflow)?;
        Ok(())
    }
}

impl AccountRecord for Proposal {
    const NAME: &'static str = "Proposal";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Yes,
    No,
}

/// A voter's single, immutable ballot on a proposal.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Vote {
    pub authority: Pubkey,
    pub proposal: Pubkey,
    /// floor(sqrt(balance)) at cast time; never recomputed
    pub vote_credits: u64,
    pub choice: VoteChoice,
    pub bump: u8,
}

impl AccountRecord for Vote {
    const NAME: &'static str = "Vote";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dao() -> Dao {
        Dao {
            authority: Pubkey::from_bytes([1u8; 32]),
            mint: Pubkey::from_bytes([2u8; 32]),
            name: "TestDAO".to_string(),
            proposal_count: 0,
            bump: 254,
        }
    }

    #[test]
    fn test_discriminators_differ() {
        assert_ne!(Dao::discriminator(), Proposal::discriminator());
        assert_ne!(Proposal::discriminator(), Vote::discriminator());
        assert_ne!(Dao::discriminator(), Vote::discriminator());
    }

    #[test]
    fn test_record_decodes_only_as_its_own_kind() {
        let data = sample_dao().to_account_data().unwrap();
        assert_eq!(&data[..DISCRIMINATOR_LEN], &Dao::discriminator());
        assert_eq!(Dao::from_account_data(&data).unwrap(), sample_dao());

        assert!(matches!(
            Vote::from_account_data(&data),
            Err(GovernanceError::InvalidAccountData(_))
        ));
        assert!(Dao::from_account_data(&data[..4]).is_err());
    }

    #[test]
    fn test_advance_proposal_count() {
        let mut dao = sample_dao();
        assert_eq!(dao.advance_proposal_count().unwrap(), 0);
        assert_eq!(dao.advance_proposal_count().unwrap(), 1);
        assert_eq!(dao.proposal_count, 2);

        dao.proposal_count = u64::MAX;
        assert_eq!(dao.advance_proposal_count(), Err(GovernanceError::ArithmeticOverflow));
        assert_eq!(dao.proposal_count, u64::MAX);
    }

    #[test]
    fn test_record_vote_counts_voters() {
        let mut proposal = Proposal {
            dao: Pubkey::from_bytes([3u8; 32]),
            index: 0,
            subject: "Test Proposal".into(),
            metadata: String::new(),
            proposer: Pubkey::from_bytes([1u8; 32]),
            yes_vote_count: 0,
            no_vote_count: u64::MAX,
            bump: 255,
        };

        proposal.record_vote(VoteChoice::Yes).unwrap();
        assert_eq!(proposal.yes_vote_count, 1);

        assert_eq!(proposal.record_vote(VoteChoice::No), Err(GovernanceError::ArithmeticOverflow));
        assert_eq!(proposal.no_vote_count, u64::MAX);
    }
}
