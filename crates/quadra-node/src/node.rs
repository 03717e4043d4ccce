//! Governance host: a persistent ledger plus a token snapshot.

use crate::config::NodeConfig;
use quadra_governance::seeds::{dao_address, proposal_address, vote_address};
use quadra_governance::{
    Dao, GovernanceProgram, InMemoryTokenLedger, InstructionOutcome, Proposal, TokenAccountEntry,
    Transaction, Vote, WeightedTally,
};
use quadra_storage::Ledger;
use quadra_types::Pubkey;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Result of one transaction in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionReport {
    pub position: usize,
    pub signer: Pubkey,
    pub instruction: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<InstructionOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub applied: usize,
    pub rejected: usize,
    pub transactions: Vec<TransactionReport>,
}

/// The Quadra governance node.
pub struct QuadraNode {
    config: NodeConfig,
    program: GovernanceProgram<InMemoryTokenLedger>,
}

impl QuadraNode {
    /// Open the ledger under the data directory and load the token snapshot.
    pub fn open(config: NodeConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let ledger = Ledger::open(&config.ledger_dir())
            .map_err(|e| anyhow::anyhow!("Failed to open ledger '{}': {}", config.ledger_dir().display(), e))?;
        let tokens = match &config.tokens_file {
            Some(path) => load_tokens(path)?,
            None => InMemoryTokenLedger::new(),
        };
        info!(
            accounts = ledger.len(),
            token_accounts = tokens.len(),
            program_id = %config.governance.program_id,
            "node opened"
        );

        let program = GovernanceProgram::new(config.governance.clone(), Arc::new(ledger), Arc::new(tokens))?;
        Ok(Self { config, program })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn program(&self) -> &GovernanceProgram<InMemoryTokenLedger> {
        &self.program
    }

    /// Apply transactions in order. A rejected transaction does not stop the batch.
    pub fn apply(&self, transactions: &[Transaction]) -> BatchReport {
        let mut report = BatchReport::default();
        for (position, transaction) in transactions.iter().enumerate() {
            let mut entry = TransactionReport {
                position,
                signer: transaction.signer,
                instruction: transaction.instruction.name(),
                outcome: None,
                error: None,
                code: None,
            };
            match self.program.process(transaction) {
                Ok(outcome) => {
                    report.applied += 1;
                    entry.outcome = Some(outcome);
                }
                Err(e) => {
                    report.rejected += 1;
                    entry.code = Some(e.code());
                    entry.error = Some(e.to_string());
                }
            }
            report.transactions.push(entry);
        }
        info!(applied = report.applied, rejected = report.rejected, "batch processed");
        report
    }

    /// Apply a JSON array of signed transactions read from `path`.
    pub fn apply_file(&self, path: &Path) -> anyhow::Result<BatchReport> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read transactions '{}': {}", path.display(), e))?;
        let transactions: Vec<Transaction> = serde_json::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse transactions '{}': {}", path.display(), e))?;
        Ok(self.apply(&transactions))
    }

    pub fn dao(&self, authority: &Pubkey, name: &str) -> anyhow::Result<(Pubkey, Option<Dao>)> {
        let (address, _) = dao_address(self.program.program_id(), authority, name)?;
        Ok((address, self.program.dao(&address)))
    }

    pub fn proposal(&self, dao: &Pubkey, index: u64) -> anyhow::Result<(Pubkey, Option<Proposal>)> {
        let (address, _) = proposal_address(self.program.program_id(), dao, index)?;
        Ok((address, self.program.proposal(&address)))
    }

    pub fn vote(&self, proposal: &Pubkey, voter: &Pubkey) -> anyhow::Result<(Pubkey, Option<Vote>)> {
        let (address, _) = vote_address(self.program.program_id(), proposal, voter)?;
        Ok((address, self.program.vote(&address)))
    }

    pub fn tally(&self, proposal: &Pubkey) -> anyhow::Result<WeightedTally> {
        Ok(self.program.weighted_tally(proposal)?)
    }
}

/// Load a JSON array of token accounts.
pub fn load_tokens(path: &Path) -> anyhow::Result<InMemoryTokenLedger> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read token snapshot '{}': {}", path.display(), e))?;
    let entries: Vec<TokenAccountEntry> = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse token snapshot '{}': {}", path.display(), e))?;
    Ok(InMemoryTokenLedger::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadra_crypto::Keypair;
    use quadra_governance::{Instruction, TokenAccount, VoteChoice};
    use tempfile::TempDir;

    fn config_in(dir: &Path, tokens_file: Option<&Path>) -> NodeConfig {
        NodeConfig {
            data_dir: dir.join("data"),
            tokens_file: tokens_file.map(Path::to_path_buf),
            ..Default::default()
        }
    }

    fn write_tokens(dir: &Path, voter: &Keypair, mint: Pubkey, token_account: Pubkey) -> std::path::PathBuf {
        let path = dir.join("tokens.json");
        let entries = vec![TokenAccountEntry {
            address: token_account,
            account: TokenAccount { owner: voter.pubkey(), mint, amount: 100_000_000_000 },
        }];
        std::fs::write(&path, serde_json::to_string_pretty(&entries).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_apply_batch_and_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let authority = Keypair::from_seed(&[1u8; 32]);
        let voter = Keypair::from_seed(&[2u8; 32]);
        let mint = Pubkey::from_bytes([9u8; 32]);
        let token_account = Pubkey::from_bytes([20u8; 32]);
        let tokens_file = write_tokens(temp_dir.path(), &voter, mint, token_account);

        let config = config_in(temp_dir.path(), Some(&tokens_file));
        let program_id = config.governance.program_id;
        let (dao, _) = dao_address(&program_id, &authority.pubkey(), "TestDAO").unwrap();
        let (proposal, _) = proposal_address(&program_id, &dao, 0).unwrap();

        let transactions = vec![
            Transaction::sign(&authority, &program_id, Instruction::InitializeDao { name: "TestDAO".into(), mint })
                .unwrap(),
            Transaction::sign(
                &authority,
                &program_id,
                Instruction::InitializeProposal {
                    dao,
                    proposal,
                    subject: "Test Proposal".into(),
                    metadata: String::new(),
                    proposer: authority.pubkey(),
                },
            )
            .unwrap(),
            Transaction::sign(
                &voter,
                &program_id,
                Instruction::Vote { dao, proposal, choice: VoteChoice::Yes, token_account },
            )
            .unwrap(),
        ];
        let mut with_duplicate = transactions.clone();
        with_duplicate.push(transactions[2].clone());

        let batch_file = temp_dir.path().join("batch.json");
        std::fs::write(&batch_file, serde_json::to_string(&with_duplicate).unwrap()).unwrap();

        {
            let node = QuadraNode::open(config.clone()).unwrap();
            let report = node.apply_file(&batch_file).unwrap();
            assert_eq!(report.applied, 3);
            assert_eq!(report.rejected, 1);
            assert_eq!(report.transactions[3].error.as_deref(), Some("Already voted"));
        }

        let node = QuadraNode::open(config).unwrap();
        let (_, record) = node.dao(&authority.pubkey(), "TestDAO").unwrap();
        assert_eq!(record.unwrap().proposal_count, 1);

        let (_, record) = node.proposal(&dao, 0).unwrap();
        assert_eq!(record.unwrap().yes_vote_count, 1);

        let (_, record) = node.vote(&proposal, &voter.pubkey()).unwrap();
        assert_eq!(record.unwrap().vote_credits, 316_227);

        assert_eq!(node.tally(&proposal).unwrap().yes_credits, 316_227);
    }

    #[test]
    fn test_missing_records() {
        let temp_dir = TempDir::new().unwrap();
        let node = QuadraNode::open(config_in(temp_dir.path(), None)).unwrap();
        let (address, record) = node.dao(&Pubkey::from_bytes([1u8; 32]), "Nobody").unwrap();
        assert!(record.is_none());
        assert!(!address.is_zero());
    }

    #[test]
    fn test_bad_token_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tokens.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_tokens(&path).is_err());
    }
}
