//! Core engine for Decree - proposal lifecycle, dispatch and execution.
//!
//! This crate has no IO. A [`Ledger`] holds every proposal, the action
//! registry, the resource modules and the event log; each mutating
//! operation commits atomically or not at all.

#![allow(clippy::missing_errors_doc)]

mod capability_check;
mod cursor;
mod describe;
mod dispatch;
mod error;
mod events;
mod executors;
mod gate;
mod ledger;
mod lifecycle;
mod registry;
pub mod resources;

pub use capability_check::{check_intent, require_return};
pub use cursor::{CurrentAction, ExecutableCursor};
pub use describe::{ActionSummary, DescribedAction, Field, describe, describe_intent};
pub use dispatch::DispatchReport;
pub use error::{EngineError, ErrorCategory, ResourceError};
pub use events::EngineEvent;
pub use gate::{GateReport, max_difficulty, touched_documents};
pub use ledger::Ledger;
pub use lifecycle::{ExecutionMode, Proposal, ProposalBook, ProposalState, Resolution};
pub use registry::{ActionRegistry, EngineLimits, RegistryEntry};
pub use resources::World;
