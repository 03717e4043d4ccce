//! Authority and validation checks.
//!
//! Every predicate here is pure and returns the typed error that the calling
//! operation surfaces unchanged. Operations run their guards before touching
//! the ledger.

use crate::error::GovernanceError;
use crate::state::{Dao, Proposal};
use crate::token::TokenAccount;
use quadra_types::Pubkey;

/// A length-bounded text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Subject,
    Metadata,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Subject => "subject",
            Field::Metadata => "metadata",
        }
    }

    /// The error for an empty value, or `None` when the field may be empty.
    fn empty_error(&self) -> Option<GovernanceError> {
        match self {
            Field::Name => Some(GovernanceError::EmptyName),
            Field::Subject => Some(GovernanceError::EmptySubject),
            Field::Metadata => None,
        }
    }
}

/// The claimed authority must be the identity that signed the transaction.
pub fn validate_signer(signer: &Pubkey, claimed: &Pubkey) -> Result<(), GovernanceError> {
    if signer != claimed {
        return Err(GovernanceError::MissingSignature(*claimed));
    }
    Ok(())
}

pub fn validate_authority(expected: &Pubkey, actual: &Pubkey) -> Result<(), GovernanceError> {
    if expected != actual {
        return Err(GovernanceError::Unauthorized {
            expected: *expected,
            actual: *actual,
        });
    }
    Ok(())
}

pub fn validate_non_empty(field: Field, value: &str) -> Result<(), GovernanceError> {
    match field.empty_error() {
        Some(err) if value.is_empty() => Err(err),
        _ => Ok(()),
    }
}

/// Bounds are in bytes of the UTF-8 encoding.
pub fn validate_length_bound(field: Field, value: &str, max: usize) -> Result<(), GovernanceError> {
    if value.len() > max {
        return Err(GovernanceError::FieldTooLong {
            field: field.as_str(),
            max,
            actual: value.len(),
        });
    }
    Ok(())
}

/// The token account must exist, belong to `voter`, and hold the DAO's token.
pub fn validate_token_account(
    account: Option<&TokenAccount>,
    voter: &Pubkey,
    dao: &Dao,
) -> Result<u64, GovernanceError> {
    let account = account
        .ok_or_else(|| GovernanceError::InvalidTokenAccount("token account not found".into()))?;
    if account.owner != *voter {
        return Err(GovernanceError::InvalidTokenAccount(format!(
            "token account owned by {}, not voter {}",
            account.owner, voter
        )));
    }
    if account.mint != dao.mint {
        return Err(GovernanceError::InvalidTokenAccount(format!(
            "token account mint {} does not match DAO mint {}",
            account.mint, dao.mint
        )));
    }
    Ok(account.amount)
}

/// The proposal must reference `dao` and live at the address its index derives to.
pub fn validate_proposal_link(
    proposal: &Proposal,
    dao: &Pubkey,
    proposal_address: &Pubkey,
    derived_address: &Pubkey,
) -> Result<(), GovernanceError> {
    if proposal.dao != *dao || proposal_address != derived_address {
        return Err(GovernanceError::ProposalMismatch(*dao));
    }
    Ok(())
}

/// A caller-supplied address must equal the one derived for the next proposal.
pub fn validate_derived_address(
    supplied: &Pubkey,
    derived: &Pubkey,
    expected_index: u64,
) -> Result<(), GovernanceError> {
    if supplied != derived {
        return Err(GovernanceError::InvalidProposalIndex { expected_index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::from_bytes([n; 32])
    }

    fn dao() -> Dao {
        Dao {
            authority: key(1),
            mint: key(9),
            name: "TestDAO".into(),
            proposal_count: 0,
            bump: 255,
        }
    }

    #[test]
    fn test_validate_authority() {
        assert!(validate_authority(&key(1), &key(1)).is_ok());
        assert_eq!(
            validate_authority(&key(1), &key(2)),
            Err(GovernanceError::Unauthorized { expected: key(1), actual: key(2) })
        );
    }

    #[test]
    fn test_validate_signer() {
        assert!(validate_signer(&key(1), &key(1)).is_ok());
        assert_eq!(validate_signer(&key(1), &key(2)), Err(GovernanceError::MissingSignature(key(2))));
    }

    #[test]
    fn test_validate_text_fields() {
        assert_eq!(validate_non_empty(Field::Subject, ""), Err(GovernanceError::EmptySubject));
        assert_eq!(validate_non_empty(Field::Name, ""), Err(GovernanceError::EmptyName));
        assert!(validate_non_empty(Field::Subject, "s").is_ok());
        assert!(validate_non_empty(Field::Metadata, "").is_ok());

        assert!(validate_length_bound(Field::Subject, &"a".repeat(300), 300).is_ok());
        assert_eq!(
            validate_length_bound(Field::Subject, &"a".repeat(301), 300),
            Err(GovernanceError::FieldTooLong { field: "subject", max: 300, actual: 301 })
        );
    }

    #[test]
    fn test_length_bound_counts_bytes() {
        // 'é' is two bytes in UTF-8
        let value = "é".repeat(3);
        assert!(validate_length_bound(Field::Metadata, &value, 5).is_err());
        assert!(validate_length_bound(Field::Metadata, &value, 6).is_ok());
    }

    #[test]
    fn test_validate_token_account() {
        let good = TokenAccount { owner: key(5), mint: key(9), amount: 100 };
        assert_eq!(validate_token_account(Some(&good), &key(5), &dao()).unwrap(), 100);

        assert!(matches!(
            validate_token_account(None, &key(5), &dao()),
            Err(GovernanceError::InvalidTokenAccount(_))
        ));

        let other_owner = TokenAccount { owner: key(6), ..good.clone() };
        assert!(validate_token_account(Some(&other_owner), &key(5), &dao()).is_err());

        let other_mint = TokenAccount { mint: key(8), ..good };
        assert!(validate_token_account(Some(&other_mint), &key(5), &dao()).is_err());
    }

    #[test]
    fn test_validate_proposal_link() {
        let proposal = Proposal {
            dao: key(3),
            index: 0,
            subject: "Test Proposal".into(),
            metadata: String::new(),
            proposer: key(1),
            yes_vote_count: 0,
            no_vote_count: 0,
            bump: 255,
        };
        assert!(validate_proposal_link(&proposal, &key(3), &key(4), &key(4)).is_ok());
        assert_eq!(
            validate_proposal_link(&proposal, &key(2), &key(4), &key(4)),
            Err(GovernanceError::ProposalMismatch(key(2)))
        );
        assert!(validate_proposal_link(&proposal, &key(3), &key(4), &key(5)).is_err());
    }

    #[test]
    fn test_validate_derived_address() {
        assert!(validate_derived_address(&key(1), &key(1), 0).is_ok());
        assert_eq!(
            validate_derived_address(&key(1), &key(2), 3),
            Err(GovernanceError::InvalidProposalIndex { expected_index: 3 })
        );
    }
}
