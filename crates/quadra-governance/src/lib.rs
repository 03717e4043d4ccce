//! Quadra Governance - Quadratic voting over token-weighted DAOs.
//!
//! This crate provides:
//! - DAO registry with per-DAO proposal numbering
//! - Proposal creation restricted to the DAO authority
//! - One-time votes weighted by `floor(sqrt(balance))` credits
//! - Signed transactions and the program processor that applies them
//! - Read-only credit-weighted tallies

pub mod config;
pub mod context;
pub mod dao;
pub mod error;
pub mod guard;
pub mod instruction;
pub mod processor;
pub mod proposal;
pub mod seeds;
pub mod state;
pub mod tally;
pub mod token;
pub mod voting;

pub use config::GovernanceConfig;
pub use error::GovernanceError;
pub use instruction::{Instruction, Transaction};
pub use processor::{GovernanceProgram, InstructionOutcome};
pub use state::{AccountRecord, Dao, Proposal, Vote, VoteChoice};
pub use tally::WeightedTally;
pub use token::{InMemoryTokenLedger, TokenAccount, TokenAccountEntry, TokenLedger};
pub use voting::{quadratic_cost, quadratic_credits};
