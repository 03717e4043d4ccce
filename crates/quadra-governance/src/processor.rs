//! The governance program: verifies, dispatches and commits transactions.

use crate::config::GovernanceConfig;
use crate::context::InstructionContext;
use crate::dao::initialize_dao;
use crate::error::GovernanceError;
use crate::instruction::{Instruction, Transaction};
use crate::proposal::{initialize_proposal, NewProposal};
use crate::state::{AccountRecord, Dao, Proposal, Vote};
use crate::tally::{weighted_tally, WeightedTally};
use crate::token::TokenLedger;
use crate::voting::{vote, CastVote};
use quadra_storage::Ledger;
use quadra_types::Pubkey;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// What a successful transaction created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InstructionOutcome {
    DaoInitialized { dao: Pubkey },
    ProposalInitialized { proposal: Pubkey, index: u64 },
    VoteCast { vote: Pubkey, vote_credits: u64 },
}

/// The governance program bound to a ledger and a token balance source.
///
/// `process` holds the ledger's write lock from its first read to commit, so
/// concurrent callers are serialized.
pub struct GovernanceProgram<T: TokenLedger> {
    config: GovernanceConfig,
    ledger: Arc<Ledger>,
    tokens: Arc<T>,
}

impl<T: TokenLedger> GovernanceProgram<T> {
    pub fn new(config: GovernanceConfig, ledger: Arc<Ledger>, tokens: Arc<T>) -> Result<Self, GovernanceError> {
        config.validate()?;
        Ok(Self { config, ledger, tokens })
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.config.program_id
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    pub fn tokens(&self) -> &Arc<T> {
        &self.tokens
    }

    /// Apply one signed transaction. On any error the ledger is left untouched.
    pub fn process(&self, transaction: &Transaction) -> Result<InstructionOutcome, GovernanceError> {
        let kind = transaction.instruction.name();
        match self.execute(transaction) {
            Ok(outcome) => {
                info!(instruction = kind, signer = %transaction.signer, ?outcome, "transaction applied");
                Ok(outcome)
            }
            Err(e) => {
                warn!(instruction = kind, signer = %transaction.signer, code = e.code(), error = %e, "transaction rejected");
                Err(e)
            }
        }
    }

    fn execute(&self, transaction: &Transaction) -> Result<InstructionOutcome, GovernanceError> {
        transaction.verify(self.program_id())?;

        let mut tx = self.ledger.begin();
        let mut ctx = InstructionContext::new(&self.config, transaction.signer, &mut tx);

        let outcome = match &transaction.instruction {
            Instruction::InitializeDao { name, mint } => {
                let dao = initialize_dao(&mut ctx, transaction.signer, name, *mint)?;
                InstructionOutcome::DaoInitialized { dao }
            }
            Instruction::InitializeProposal {
                dao,
                proposal,
                subject,
                metadata,
                proposer,
            } => {
                let (proposal, index) = initialize_proposal(
                    &mut ctx,
                    NewProposal {
                        dao: *dao,
                        proposal: *proposal,
                        subject,
                        metadata,
                        proposer: *proposer,
                    },
                )?;
                InstructionOutcome::ProposalInitialized { proposal, index }
            }
            Instruction::Vote {
                dao,
                proposal,
                choice,
                token_account,
            } => {
                let (vote, vote_credits) = vote(
                    &mut ctx,
                    self.tokens.as_ref(),
                    CastVote {
                        dao: *dao,
                        proposal: *proposal,
                        choice: *choice,
                        token_account: *token_account,
                    },
                )?;
                InstructionOutcome::VoteCast { vote, vote_credits }
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    pub fn dao(&self, address: &Pubkey) -> Option<Dao> {
        self.record(address)
    }

    pub fn proposal(&self, address: &Pubkey) -> Option<Proposal> {
        self.record(address)
    }

    pub fn vote(&self, address: &Pubkey) -> Option<Vote> {
        self.record(address)
    }

    pub fn weighted_tally(&self, proposal: &Pubkey) -> Result<WeightedTally, GovernanceError> {
        weighted_tally(&self.ledger, self.program_id(), proposal)
    }

    fn record<R: AccountRecord>(&self, address: &Pubkey) -> Option<R> {
        self.ledger
            .get(address)
            .filter(|account| account.is_owned_by(self.program_id()))
            .and_then(|account| R::from_account_data(&account.data).ok())
    }
}
