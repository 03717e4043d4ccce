//! Governance program configuration.

use crate::error::GovernanceError;
use quadra_crypto::MAX_SEED_LEN;
use quadra_types::{Hash, Pubkey};
use serde::{Deserialize, Serialize};

/// Limits and policy for one deployment of the governance program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Namespace for every derived address and owner of every record
    pub program_id: Pubkey,
    /// DAO names are address seeds, so this cannot exceed the seed limit
    pub max_name_len: usize,
    pub max_subject_len: usize,
    pub max_metadata_len: usize,
    /// Record zero-credit votes instead of rejecting them
    pub allow_zero_credit_votes: bool,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            program_id: default_program_id(),
            max_name_len: MAX_SEED_LEN,
            max_subject_len: 300,
            max_metadata_len: 500,
            allow_zero_credit_votes: false,
        }
    }
}

impl GovernanceConfig {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.program_id.is_zero() {
            return Err(GovernanceError::InvalidConfig("program_id cannot be zero".into()));
        }
        if self.max_name_len == 0 || self.max_name_len > MAX_SEED_LEN {
            return Err(GovernanceError::InvalidConfig(format!(
                "max_name_len must be between 1 and {}, got {}",
                MAX_SEED_LEN, self.max_name_len
            )));
        }
        if self.max_subject_len == 0 {
            return Err(GovernanceError::InvalidConfig("max_subject_len cannot be 0".into()));
        }
        Ok(())
    }
}

/// Program id used when none is configured.
pub fn default_program_id() -> Pubkey {
    Pubkey::from_bytes(*Hash::compute(b"quadra:governance-program").as_bytes())
}
