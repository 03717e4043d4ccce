use thiserror::Error;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CryptoError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Signature verification failed")]
    VerificationFailed,

    #[error("Too many seeds: max {max}, got {actual}")]
    MaxSeedsExceeded { max: usize, actual: usize },

    #[error("Seed too long: max {max} bytes, got {actual}")]
    MaxSeedLengthExceeded { max: usize, actual: usize },

    #[error("Seeds produce an on-curve address")]
    InvalidSeeds,

    #[error("No viable bump seed found")]
    NoViableBump,
}

impl From<ed25519_dalek::SignatureError> for CryptoError {
    fn from(_: ed25519_dalek::SignatureError) -> Self {
        CryptoError::InvalidSignature
    }
}
