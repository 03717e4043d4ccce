//! Program-derived addresses.
//!
//! A derived address is a blake3 digest over an ordered seed list and the owning
//! program id. Digests that decode to a valid ed25519 point are rejected, so no
//! derived address can ever have a private key. `find_program_address` appends a
//! one-byte bump seed, searching from 255 downwards, until the digest lands off
//! the curve.

use crate::error::CryptoError;
use crate::hash::IncrementalHasher;
use quadra_types::Pubkey;

/// Maximum number of seeds, including the bump.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed in bytes.
pub const MAX_SEED_LEN: usize = 32;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Whether `bytes` decompress to a point on the ed25519 curve.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    ed25519_dalek::VerifyingKey::from_bytes(bytes).is_ok()
}

/// Derive the address for an exact seed list.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<Pubkey, CryptoError> {
    if seeds.len() > MAX_SEEDS {
        return Err(CryptoError::MaxSeedsExceeded {
            max: MAX_SEEDS,
            actual: seeds.len(),
        });
    }

    let mut hasher = IncrementalHasher::new();
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(CryptoError::MaxSeedLengthExceeded {
                max: MAX_SEED_LEN,
                actual: seed.len(),
            });
        }
        hasher.update_prefixed(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);

    let digest = hasher.finalize();
    if is_on_curve(digest.as_bytes()) {
        return Err(CryptoError::InvalidSeeds);
    }

    Ok(Pubkey::from_bytes(*digest.as_bytes()))
}

/// Find the canonical derived address and its bump for `seeds`.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), CryptoError> {
    if seeds.len() >= MAX_SEEDS {
        return Err(CryptoError::MaxSeedsExceeded {
            max: MAX_SEEDS - 1,
            actual: seeds.len(),
        });
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        with_bump.extend_from_slice(seeds);
        with_bump.push(&bump_seed);

        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(CryptoError::InvalidSeeds) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(CryptoError::NoViableBump)
}
