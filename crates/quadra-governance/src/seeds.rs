//! Derived-address keys for governance records.
//!
//! | Record   | Seeds                                   |
//! |----------|-----------------------------------------|
//! | DAO      | `"dao"`, authority, name                |
//! | Proposal | `"proposal"`, dao, index (u64 LE)       |
//! | Vote     | `"vote"`, proposal, voter               |

use crate::error::GovernanceError;
use quadra_crypto::find_program_address;
use quadra_types::Pubkey;
use tracing::debug;

pub const DAO_SEED: &[u8] = b"dao";
pub const PROPOSAL_SEED: &[u8] = b"proposal";
pub const VOTE_SEED: &[u8] = b"vote";

/// Address and bump of the DAO `authority` created under `name`.
pub fn dao_address(
    program_id: &Pubkey,
    authority: &Pubkey,
    name: &str,
) -> Result<(Pubkey, u8), GovernanceError> {
    let (address, bump) =
        find_program_address(&[DAO_SEED, authority.as_bytes(), name.as_bytes()], program_id)?;
    debug!(%address, bump, %authority, name, "derived dao address");
    Ok((address, bump))
}

/// Address and bump of proposal number `index` in `dao`.
pub fn proposal_address(
    program_id: &Pubkey,
    dao: &Pubkey,
    index: u64,
) -> Result<(Pubkey, u8), GovernanceError> {
    let index_bytes = index.to_le_bytes();
    let (address, bump) =
        find_program_address(&[PROPOSAL_SEED, dao.as_bytes(), &index_bytes], program_id)?;
    debug!(%address, bump, %dao, index, "derived proposal address");
    Ok((address, bump))
}

/// Address and bump of `voter`'s ballot on `proposal`.
pub fn vote_address(
    program_id: &Pubkey,
    proposal: &Pubkey,
    voter: &Pubkey,
) -> Result<(Pubkey, u8), GovernanceError> {
    let (address, bump) =
        find_program_address(&[VOTE_SEED, proposal.as_bytes(), voter.as_bytes()], program_id)?;
    debug!(%address, bump, %proposal, %voter, "derived vote address");
    Ok((address, bump))
}
