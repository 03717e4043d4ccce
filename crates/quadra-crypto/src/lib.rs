//! Quadra Crypto - Cryptographic primitives for the Quadra governance engine.
//!
//! This crate provides:
//! - Ed25519 keypairs and signature verification (transaction signing)
//! - Blake3 hashing with domain separation
//! - Program-derived addresses: deterministic, off-curve account keys

pub mod ed25519;
pub mod hash;
pub mod pda;
pub mod error;

pub use ed25519::{Keypair, verify as ed25519_verify};
pub use hash::{hash_with_domain, IncrementalHasher};
pub use pda::{create_program_address, find_program_address, is_on_curve, MAX_SEEDS, MAX_SEED_LEN};
pub use error::CryptoError;
