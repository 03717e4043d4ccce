//! Instructions and signed transactions.

use crate::error::GovernanceError;
use crate::state::VoteChoice;
use borsh::{BorshDeserialize, BorshSerialize};
use quadra_crypto::{ed25519_verify, hash_with_domain, Keypair};
use quadra_types::{Hash, Pubkey, Signature};
use serde::{Deserialize, Serialize};

const SIGNING_DOMAIN: &str = "quadra-tx";

/// A request to the governance program.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Instruction {
    /// Create a DAO owned by the signer.
    InitializeDao { name: String, mint: Pubkey },
    /// Create the next proposal of `dao`. `proposal` is the address the signer
    /// expects it to be created at.
    InitializeProposal {
        dao: Pubkey,
        proposal: Pubkey,
        subject: String,
        metadata: String,
        proposer: Pubkey,
    },
    /// Cast the signer's single vote on `proposal`.
    Vote {
        dao: Pubkey,
        proposal: Pubkey,
        choice: VoteChoice,
        token_account: Pubkey,
    },
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::InitializeDao { .. } => "initialize_dao",
            Instruction::InitializeProposal { .. } => "initialize_proposal",
            Instruction::Vote { .. } => "vote",
        }
    }
}

/// An instruction signed by the identity it acts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub signer: Pubkey,
    pub instruction: Instruction,
    pub signature: Signature,
}

impl Transaction {
    /// Sign `instruction` for the program namespace `program_id`.
    pub fn sign(
        keypair: &Keypair,
        program_id: &Pubkey,
        instruction: Instruction,
    ) -> Result<Self, GovernanceError> {
        let signer = keypair.pubkey();
        let message = signing_hash(program_id, &signer, &instruction)?;
        let signature = keypair.sign(message.as_bytes());
        Ok(Self {
            signer,
            instruction,
            signature,
        })
    }

    pub fn signing_hash(&self, program_id: &Pubkey) -> Result<Hash, GovernanceError> {
        signing_hash(program_id, &self.signer, &self.instruction)
    }

    /// Check that `signer` produced `signature` over this instruction.
    pub fn verify(&self, program_id: &Pubkey) -> Result<(), GovernanceError> {
        let message = self.signing_hash(program_id)?;
        ed25519_verify(&self.signer, message.as_bytes(), &self.signature)
            .map_err(|_| GovernanceError::MissingSignature(self.signer))
    }
}

fn signing_hash(
    program_id: &Pubkey,
    signer: &Pubkey,
    instruction: &Instruction,
) -> Result<Hash, GovernanceError> {
    let encoded = borsh::to_vec(instruction)
        .map_err(|e| GovernanceError::InvalidInstruction(e.to_string()))?;
    Ok(hash_with_domain(
        SIGNING_DOMAIN,
        &[program_id.as_bytes(), signer.as_bytes(), &encoded],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_program_id;

    fn init_dao() -> Instruction {
        Instruction::InitializeDao {
            name: "TestDAO".into(),
            mint: Pubkey::from_bytes([9u8; 32]),
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let tx = Transaction::sign(&keypair, &default_program_id(), init_dao()).unwrap();
        assert_eq!(tx.signer, keypair.pubkey());
        assert!(tx.verify(&default_program_id()).is_ok());
    }

    #[test]
    fn test_tampered_instruction_fails() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let mut tx = Transaction::sign(&keypair, &default_program_id(), init_dao()).unwrap();
        tx.instruction = Instruction::InitializeDao {
            name: "OtherDAO".into(),
            mint: Pubkey::from_bytes([9u8; 32]),
        };
        assert_eq!(
            tx.verify(&default_program_id()),
            Err(GovernanceError::MissingSignature(keypair.pubkey()))
        );
    }

    #[test]
    fn test_signature_bound_to_program() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let tx = Transaction::sign(&keypair, &default_program_id(), init_dao()).unwrap();
        assert!(tx.verify(&Pubkey::from_bytes([0x77; 32])).is_err());
    }

    #[test]
    fn test_spoofed_signer_fails() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let other = Keypair::from_seed(&[2u8; 32]);
        let mut tx = Transaction::sign(&keypair, &default_program_id(), init_dao()).unwrap();
        tx.signer = other.pubkey();
        assert!(tx.verify(&default_program_id()).is_err());
    }

    #[test]
    fn test_small_order_signer_rejected() {
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let mut forged = [0u8; 64];
        forged[0] = 1;
        let signer = Pubkey::from_bytes(identity);
        let tx = Transaction {
            signer,
            instruction: init_dao(),
            signature: Signature::from_bytes(forged),
        };
        assert_eq!(
            tx.verify(&default_program_id()),
            Err(GovernanceError::MissingSignature(signer))
        );
    }

    #[test]
    fn test_signing_hash_commits_to_every_part() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let tx = Transaction::sign(&keypair, &default_program_id(), init_dao()).unwrap();
        let digest = tx.signing_hash(&default_program_id()).unwrap();

        let mut other_signer = tx.clone();
        other_signer.signer = Pubkey::from_bytes([2u8; 32]);
        assert_ne!(other_signer.signing_hash(&default_program_id()).unwrap(), digest);
        assert_ne!(tx.signing_hash(&Pubkey::from_bytes([0x77; 32])).unwrap(), digest);
        assert_eq!(tx.signing_hash(&default_program_id()).unwrap(), digest);
    }

    #[test]
    fn test_transaction_json() {
        let keypair = Keypair::from_seed(&[1u8; 32]);
        let tx = Transaction::sign(&keypair, &default_program_id(), init_dao()).unwrap();
        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains("\"type\":\"initialize_dao\""));
        assert!(json.contains("quadra1"));

        let decoded: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, tx);
        assert!(decoded.verify(&default_program_id()).is_ok());
    }
}
