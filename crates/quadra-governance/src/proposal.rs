//! Proposal ledger.
//!
//! Proposals are numbered per DAO. The proposal at index `n` lives at the
//! address derived from `(dao, n)`, and the DAO's counter advances in the same
//! ledger transaction that allocates it, so indices never skip or repeat.

use crate::context::InstructionContext;
use crate::error::GovernanceError;
use crate::guard::{
    validate_authority, validate_derived_address, validate_length_bound, validate_non_empty, Field,
};
use crate::seeds::proposal_address;
use crate::state::{Dao, Proposal};
use quadra_types::Pubkey;
use tracing::debug;

/// Arguments of a proposal creation.
#[derive(Debug, Clone)]
pub struct NewProposal<'p> {
    pub dao: Pubkey,
    /// Address the caller expects the proposal to be created at
    pub proposal: Pubkey,
    pub subject: &'p str,
    pub metadata: &'p str,
    pub proposer: Pubkey,
}

/// Create the next proposal of a DAO. Only the DAO authority may do this.
///
/// Returns the new proposal's address and index.
pub fn initialize_proposal(
    ctx: &mut InstructionContext<'_, '_>,
    args: NewProposal<'_>,
) -> Result<(Pubkey, u64), GovernanceError> {
    let mut dao: Dao = ctx.load(&args.dao)?;

    validate_authority(&dao.authority, &ctx.signer)?;
    validate_non_empty(Field::Subject, args.subject)?;
    validate_length_bound(Field::Subject, args.subject, ctx.config.max_subject_len)?;
    validate_length_bound(Field::Metadata, args.metadata, ctx.config.max_metadata_len)?;

    let (address, bump) = proposal_address(ctx.program_id(), &args.dao, dao.proposal_count)?;
    validate_derived_address(&args.proposal, &address, dao.proposal_count)?;

    let index = dao.advance_proposal_count()?;
    let proposal = Proposal {
        dao: args.dao,
        index,
        subject: args.subject.to_string(),
        metadata: args.metadata.to_string(),
        proposer: args.proposer,
        yes_vote_count: 0,
        no_vote_count: 0,
        bump,
    };
    ctx.create(address, &proposal)?;
    ctx.store(&args.dao, &dao)?;

    debug!(%address, dao = %args.dao, index, "proposal allocated");
    Ok((address, index))
}
