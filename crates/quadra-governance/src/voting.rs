//! Quadratic voting.
//!
//! A voter's credits are the integer square root of their token balance,
//! fixed when the vote is cast. Each voter gets one vote per proposal.

use crate::context::InstructionContext;
use crate::error::GovernanceError;
use crate::guard::{validate_proposal_link, validate_token_account};
use crate::seeds::{proposal_address, vote_address};
use crate::state::{Dao, Proposal, Vote, VoteChoice};
use crate::token::TokenLedger;
use quadra_types::Pubkey;
use tracing::debug;

/// Voting credits for a token balance: `floor(sqrt(balance))`.
pub fn quadratic_credits(balance: u64) -> u64 {
    let n = balance as u128;
    if n < 2 {
        return balance;
    }

    // Newton's method
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x as u64
}

/// Tokens needed to obtain `credits` voting credits.
pub fn quadratic_cost(credits: u64) -> u128 {
    let credits = credits as u128;
    credits * credits
}

/// Arguments of a vote.
#[derive(Debug, Clone, Copy)]
pub struct CastVote {
    pub dao: Pubkey,
    pub proposal: Pubkey,
    pub choice: VoteChoice,
    /// The signer's holding of the DAO's token
    pub token_account: Pubkey,
}

/// Record the signer's vote on a proposal and count it in the tally.
///
/// Returns the vote address and the credits it was cast with.
pub fn vote(
    ctx: &mut InstructionContext<'_, '_>,
    tokens: &dyn TokenLedger,
    args: CastVote,
) -> Result<(Pubkey, u64), GovernanceError> {
    let voter = ctx.signer;
    let dao: Dao = ctx.load(&args.dao)?;
    let mut proposal: Proposal = ctx.load(&args.proposal)?;

    let (derived, _) = proposal_address(ctx.program_id(), &args.dao, proposal.index)?;
    validate_proposal_link(&proposal, &args.dao, &args.proposal, &derived)?;

    let balance = validate_token_account(tokens.token_account(&args.token_account).as_ref(), &voter, &dao)?;

    let (address, bump) = vote_address(ctx.program_id(), &args.proposal, &voter)?;
    if ctx.exists(&address) {
        return Err(GovernanceError::AlreadyVoted);
    }

    let vote_credits = quadratic_credits(balance);
    if vote_credits == 0 && !ctx.config.allow_zero_credit_votes {
        return Err(GovernanceError::InsufficientVotingPower { balance });
    }

    proposal.record_vote(args.choice)?;
    let record = Vote {
        authority: voter,
        proposal: args.proposal,
        vote_credits,
        choice: args.choice,
        bump,
    };
    ctx.create(address, &record).map_err(|e| match e {
        GovernanceError::AddressAlreadyInUse(_) => GovernanceError::AlreadyVoted,
        other => other,
    })?;
    ctx.store(&args.proposal, &proposal)?;

    debug!(%address, %voter, proposal = %args.proposal, vote_credits, choice = ?args.choice, "vote recorded");
    Ok((address, vote_credits))
}
