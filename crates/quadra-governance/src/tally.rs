//! Credit-weighted results.
//!
//! Proposals count voters. This query sums the credits behind each side
//! without writing anything.

use crate::error::GovernanceError;
use crate::state::{AccountRecord, Vote, VoteChoice, DISCRIMINATOR_LEN};
use quadra_storage::Ledger;
use quadra_types::Pubkey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedTally {
    pub proposal: Pubkey,
    pub yes_credits: u64,
    pub no_credits: u64,
    pub voters: u64,
}

impl WeightedTally {
    fn add(&mut self, vote: &Vote) -> Result<(), GovernanceError> {
        let side = match vote.choice {
            VoteChoice::Yes => &mut self.yes_credits,
            VoteChoice::No => &mut self.no_credits,
        };
        *side = side
            .checked_add(vote.vote_credits)
            .ok_or(GovernanceError::ArithmeticOverflow)?;
        self.voters = self
            .voters
            .checked_add(1)
            .ok_or(GovernanceError::ArithmeticOverflow)?;
        Ok(())
    }
}

/// Sum the credits of every vote cast on `proposal`.
pub fn weighted_tally(
    ledger: &Ledger,
    program_id: &Pubkey,
    proposal: &Pubkey,
) -> Result<WeightedTally, GovernanceError> {
    let mut tally = WeightedTally {
        proposal: *proposal,
        ..Default::default()
    };

    let discriminator = Vote::discriminator();
    for (_, account) in ledger.accounts_owned_by(program_id) {
        if account.data.len() < DISCRIMINATOR_LEN || account.data[..DISCRIMINATOR_LEN] != discriminator {
            continue;
        }
        let vote = Vote::from_account_data(&account.data)?;
        if vote.proposal == *proposal {
            tally.add(&vote)?;
        }
    }

    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadra_storage::Account;

    fn key(n: u8) -> Pubkey {
        Pubkey::from_bytes([n; 32])
    }

    fn store_vote(ledger: &Ledger, owner: Pubkey, at: u8, proposal: Pubkey, credits: u64, choice: VoteChoice) {
        let vote = Vote {
            authority: key(at),
            proposal,
            vote_credits: credits,
            choice,
            bump: 255,
        };
        let mut tx = ledger.begin();
        tx.create(key(at), Account::new(owner, vote.to_account_data().unwrap())).unwrap();
        tx.commit().unwrap();
    }

    #[test]
    fn test_weighted_tally_sums_credits() {
        let program = key(0xaa);
        let ledger = Ledger::new();
        store_vote(&ledger, program, 1, key(50), 10, VoteChoice::Yes);
        store_vote(&ledger, program, 2, key(50), 3, VoteChoice::Yes);
        store_vote(&ledger, program, 3, key(50), 7, VoteChoice::No);
        store_vote(&ledger, program, 4, key(51), 100, VoteChoice::Yes);
        store_vote(&ledger, key(0xbb), 5, key(50), 100, VoteChoice::Yes);

        let tally = weighted_tally(&ledger, &program, &key(50)).unwrap();
        assert_eq!(tally.yes_credits, 13);
        assert_eq!(tally.no_credits, 7);
        assert_eq!(tally.voters, 3);
    }

    #[test]
    fn test_weighted_tally_overflow() {
        let program = key(0xaa);
        let ledger = Ledger::new();
        store_vote(&ledger, program, 1, key(50), u64::MAX, VoteChoice::Yes);
        store_vote(&ledger, program, 2, key(50), 1, VoteChoice::Yes);

        assert_eq!(
            weighted_tally(&ledger, &program, &key(50)),
            Err(GovernanceError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_weighted_tally_empty() {
        let tally = weighted_tally(&Ledger::new(), &key(0xaa), &key(50)).unwrap();
        assert_eq!(tally, WeightedTally { proposal: key(50), ..Default::default() });
    }
}
