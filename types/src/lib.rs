//! Core domain types for Decree.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies:
//! identifiers, the binary action record and its codec, the closed action
//! catalog, intents, and the price-threshold arithmetic behind the
//! difficulty gate. Everything here can be used from any layer.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

pub mod actions;
pub mod codec;
mod difficulty;
mod ids;
mod intent;
mod record;

pub use actions::{
    Action, ActionCategory, ActionKind, AuthorizeUpgrade, BorrowCapability, CancelStream,
    CommitUpgrade, CreateStream, Deposit, InsertLine, Mint, RemoveLine, ReturnCapability,
    UpdateLine, UpdateMetadata, UpdateTradingParams, Withdraw, WithdrawV1,
};
pub use codec::{ActionPayload, DecodeError, EncodeError, assert_action_type, decode, encode};
pub use difficulty::{BASIS_POINTS, Difficulty, MAX_DIFFICULTY, PricePair, ThresholdError};
pub use ids::{CapabilityKind, LineId, OutcomeIndex, ProposalId, StreamId};
pub use intent::{Intent, IntentBuilder};
pub use record::{ActionRecord, FormatVersion, TypeTag};
