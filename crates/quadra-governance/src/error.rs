use quadra_crypto::CryptoError;
use quadra_storage::StorageError;
use quadra_types::Pubkey;
use thiserror::Error;

/// Errors that can occur in governance operations.
///
/// Every error is terminal: the instruction that raised it leaves the ledger untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("Address already in use: {0}")]
    AddressAlreadyInUse(Pubkey),

    #[error("Unauthorized: expected authority {expected}, got {actual}")]
    Unauthorized { expected: Pubkey, actual: Pubkey },

    #[error("Proposal subject is empty")]
    EmptySubject,

    #[error("DAO name is empty")]
    EmptyName,

    #[error("Field {field} too long: max {max} bytes, got {actual}")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Proposal does not belong to DAO {0}")]
    ProposalMismatch(Pubkey),

    #[error("Proposal address does not match next index {expected_index}")]
    InvalidProposalIndex { expected_index: u64 },

    #[error("Invalid token account: {0}")]
    InvalidTokenAccount(String),

    #[error("Already voted")]
    AlreadyVoted,

    #[error("Insufficient voting power: balance {balance} yields zero credits")]
    InsufficientVotingPower { balance: u64 },

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    #[error("Missing or invalid signature for {0}")]
    MissingSignature(Pubkey),

    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("Invalid account data: {0}")]
    InvalidAccountData(String),

    #[error("Address derivation failed: {0}")]
    AddressDerivation(CryptoError),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),
}

impl GovernanceError {
    /// Stable numeric code for callers that cannot match on the enum.
    pub fn code(&self) -> u32 {
        match self {
            GovernanceError::AddressAlreadyInUse(_) => 6000,
            GovernanceError::Unauthorized { .. } => 6001,
            GovernanceError::EmptySubject => 6002,
            GovernanceError::EmptyName => 6003,
            GovernanceError::FieldTooLong { .. } => 6004,
            GovernanceError::ProposalMismatch(_) => 6005,
            GovernanceError::InvalidProposalIndex { .. } => 6006,
            GovernanceError::InvalidTokenAccount(_) => 6007,
            GovernanceError::AlreadyVoted => 6008,
            GovernanceError::InsufficientVotingPower { .. } => 6009,
            GovernanceError::ArithmeticOverflow => 6010,
            GovernanceError::MissingSignature(_) => 6011,
            GovernanceError::AccountNotFound(_) => 6012,
            GovernanceError::InvalidAccountData(_) => 6013,
            GovernanceError::AddressDerivation(_) => 6014,
            GovernanceError::Storage(_) => 6015,
            GovernanceError::InvalidConfig(_) => 6016,
            GovernanceError::InvalidInstruction(_) => 6017,
        }
    }
}

impl From<StorageError> for GovernanceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::AddressInUse(address) => GovernanceError::AddressAlreadyInUse(address),
            StorageError::AccountNotFound(address) => GovernanceError::AccountNotFound(address),
            other => GovernanceError::Storage(other),
        }
    }
}

impl From<CryptoError> for GovernanceError {
    fn from(e: CryptoError) -> Self {
        GovernanceError::AddressDerivation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GovernanceError::FieldTooLong { field: "subject", max: 300, actual: 301 };
        assert!(err.to_string().contains("subject"));
        assert!(err.to_string().contains("300"));
        assert!(err.to_string().contains("301"));
    }

    #[test]
    fn test_storage_conflict_maps_to_address_in_use() {
        let address = Pubkey::from_bytes([4u8; 32]);
        assert_eq!(
            GovernanceError::from(StorageError::AddressInUse(address)),
            GovernanceError::AddressAlreadyInUse(address)
        );
        assert!(matches!(
            GovernanceError::from(StorageError::Io("disk full".into())),
            GovernanceError::Storage(_)
        ));
    }

    #[test]
    fn test_codes_are_distinct() {
        let key = Pubkey::ZERO;
        let errors = [
            GovernanceError::AddressAlreadyInUse(key),
            GovernanceError::Unauthorized { expected: key, actual: key },
            GovernanceError::EmptySubject,
            GovernanceError::EmptyName,
            GovernanceError::FieldTooLong { field: "name", max: 1, actual: 2 },
            GovernanceError::ProposalMismatch(key),
            GovernanceError::InvalidProposalIndex { expected_index: 0 },
            GovernanceError::InvalidTokenAccount(String::new()),
            GovernanceError::AlreadyVoted,
            GovernanceError::InsufficientVotingPower { balance: 0 },
            GovernanceError::ArithmeticOverflow,
            GovernanceError::MissingSignature(key),
            GovernanceError::AccountNotFound(key),
            GovernanceError::InvalidAccountData(String::new()),
            GovernanceError::AddressDerivation(CryptoError::NoViableBump),
            GovernanceError::Storage(StorageError::Io(String::new())),
            GovernanceError::InvalidConfig(String::new()),
            GovernanceError::InvalidInstruction(String::new()),
        ];
        let mut codes: Vec<u32> = errors.iter().map(GovernanceError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
