//! DAO registry.

use crate::context::InstructionContext;
use crate::error::GovernanceError;
use crate::guard::{validate_length_bound, validate_non_empty, validate_signer, Field};
use crate::seeds::dao_address;
use crate::state::Dao;
use quadra_types::Pubkey;
use tracing::debug;

/// Create the DAO `authority` owns under `name`, returning its address.
///
/// Not idempotent: a second call with the same authority and name fails with
/// `AddressAlreadyInUse`.
pub fn initialize_dao(
    ctx: &mut InstructionContext<'_, '_>,
    authority: Pubkey,
    name: &str,
    mint: Pubkey,
) -> Result<Pubkey, GovernanceError> {
    validate_signer(&ctx.signer, &authority)?;
    validate_non_empty(Field::Name, name)?;
    validate_length_bound(Field::Name, name, ctx.config.max_name_len)?;

    let (address, bump) = dao_address(ctx.program_id(), &authority, name)?;
    let dao = Dao {
        authority,
        mint,
        name: name.to_string(),
        proposal_count: 0,
        bump,
    };
    ctx.create(address, &dao)?;

    debug!(%address, %authority, name, "dao allocated");
    Ok(address)
}
