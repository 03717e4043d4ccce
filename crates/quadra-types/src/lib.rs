//! Quadra Types - Core type definitions for the Quadra governance engine.
//!
//! This crate provides the fundamental types shared by every other crate:
//! - Public keys (32-byte identities and derived account addresses, Bech32m encoded)
//! - Hashes (32-byte, blake3 digests)
//! - Ed25519 signatures

pub mod pubkey;
pub mod hash;
pub mod signature;
pub mod error;

#[cfg(any(feature = "serde", feature = "borsh"))]
mod serialization;

pub use pubkey::Pubkey;
pub use hash::Hash;
pub use signature::Signature;
pub use error::TypesError;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Hash, Pubkey, Signature, TypesError};
}
