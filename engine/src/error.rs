//! Engine error taxonomy.
//!
//! Every error aborts the enclosing transaction; only [`ErrorCategory::Policy`]
//! failures are meant to be retried by resubmitting the same dispatch later.

use thiserror::Error;

use decree_types::{
    CapabilityKind, DecodeError, Difficulty, LineId, OutcomeIndex, ProposalId, StreamId,
    ThresholdError, TypeTag,
};

use crate::lifecycle::ExecutionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller or data-integrity bug.
    Structural,
    /// Protocol invariant violated.
    State,
    /// The market did not earn execution this attempt.
    Policy,
    /// A resource module refused a side effect.
    Execution,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("proposal {0} already has registered intents")]
    AlreadyRegistered(ProposalId),
    #[error("proposal {0} already exists")]
    DuplicateProposal(ProposalId),
    #[error("proposal {0} is unknown")]
    UnknownProposal(ProposalId),
    #[error("no intent registered for proposal {proposal_id} outcome {outcome}")]
    NotFound {
        proposal_id: ProposalId,
        outcome: OutcomeIndex,
    },
    #[error("proposal {proposal_id} declares {expected} outcomes but {actual} intents were supplied")]
    OutcomeCountMismatch {
        proposal_id: ProposalId,
        expected: u32,
        actual: usize,
    },
    #[error("outcome count {count} must be between 2 and {max}")]
    InvalidOutcomeCount { count: u32, max: u32 },
    #[error("intent for outcome {outcome} belongs to proposal {owner}, not {proposal_id}")]
    IntentOwnerMismatch {
        proposal_id: ProposalId,
        outcome: OutcomeIndex,
        owner: ProposalId,
    },
    #[error("intent for outcome {outcome} has {len} actions; the limit is {max}")]
    IntentTooLong {
        outcome: OutcomeIndex,
        len: usize,
        max: usize,
    },
    #[error("action {position} ({tag}) of outcome {outcome} cannot run in a {mode} proposal")]
    ModeMismatch {
        outcome: OutcomeIndex,
        position: usize,
        tag: TypeTag,
        mode: ExecutionMode,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to encode record: {0}")]
    Encode(String),
    #[error("cursor exhausted at position {position} of {len}")]
    CursorExhausted { position: usize, len: usize },
    #[error("action {position} ({tag}) is not a document edit")]
    NotADocumentEdit { position: usize, tag: TypeTag },
    #[error("invalid resolution for proposal {proposal_id}: {reason}")]
    InvalidResolution {
        proposal_id: ProposalId,
        reason: String,
    },
    #[error("no resolved price for outcome {outcome} of proposal {proposal_id}")]
    MissingPrice {
        proposal_id: ProposalId,
        outcome: OutcomeIndex,
    },
    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    #[error("proposal {0} is not resolved")]
    NotResolved(ProposalId),
    #[error("proposal {0} was already executed")]
    AlreadyExecuted(ProposalId),
    #[error("proposal {proposal_id} is {state}; expected {expected}")]
    InvalidTransition {
        proposal_id: ProposalId,
        state: &'static str,
        expected: &'static str,
    },
    #[error("capability {capability} borrowed at action {position} is never returned")]
    NoMatchingReturn {
        position: usize,
        capability: CapabilityKind,
    },
    #[error("capability {0} is still on loan at the end of the intent")]
    CapabilityNotReturned(CapabilityKind),

    #[error(
        "accept price {twap_accept} does not clear reject price {twap_reject} at difficulty {max_difficulty}"
    )]
    ThresholdNotMet {
        twap_accept: u64,
        twap_reject: u64,
        max_difficulty: Difficulty,
    },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl EngineError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyRegistered(_)
            | Self::DuplicateProposal(_)
            | Self::UnknownProposal(_)
            | Self::NotFound { .. }
            | Self::OutcomeCountMismatch { .. }
            | Self::InvalidOutcomeCount { .. }
            | Self::IntentOwnerMismatch { .. }
            | Self::IntentTooLong { .. }
            | Self::ModeMismatch { .. }
            | Self::Decode(_)
            | Self::Encode(_)
            | Self::CursorExhausted { .. }
            | Self::NotADocumentEdit { .. }
            | Self::InvalidResolution { .. }
            | Self::MissingPrice { .. }
            | Self::Threshold(_) => ErrorCategory::Structural,
            Self::NotResolved(_)
            | Self::AlreadyExecuted(_)
            | Self::InvalidTransition { .. }
            | Self::NoMatchingReturn { .. }
            | Self::CapabilityNotReturned(_) => ErrorCategory::State,
            Self::ThresholdNotMet { .. } => ErrorCategory::Policy,
            Self::Resource(_) => ErrorCategory::Execution,
        }
    }

    /// Whether resubmitting the same dispatch later can succeed without any
    /// change to the registered data.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Policy
    }
}

/// A resource module refused an action's side effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("vault '{0}' does not exist")]
    UnknownVault(String),
    #[error("vault '{0}' already exists")]
    VaultExists(String),
    #[error("vault '{vault}' holds {available}; cannot take {requested}")]
    InsufficientBalance {
        vault: String,
        available: u64,
        requested: u64,
    },
    #[error("currency '{0}' is not registered")]
    UnknownCurrency(String),
    #[error("currency '{0}' is already registered")]
    CurrencyExists(String),
    #[error("minting {requested} '{currency}' would exceed the max supply of {max_supply}")]
    SupplyCapExceeded {
        currency: String,
        requested: u64,
        max_supply: u64,
    },
    #[error("invalid setting: {0}")]
    InvalidSetting(&'static str),
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),
    #[error("stream {0} does not exist")]
    UnknownStream(StreamId),
    #[error("a stream needs a non-zero amount, period and period count")]
    InvalidStream,
    #[error("document '{0}' does not exist")]
    UnknownDocument(String),
    #[error("document '{0}' already exists")]
    DocumentExists(String),
    #[error("document '{document}' has no line {line_id}")]
    UnknownLine { document: String, line_id: LineId },
    #[error("position {position} is past the end of '{document}' ({len} lines)")]
    PositionOutOfRange {
        document: String,
        position: u32,
        len: usize,
    },
    #[error("capability {0} is not in the locker")]
    CapabilityUnavailable(CapabilityKind),
    #[error("capability {0} is already in the locker")]
    CapabilityAlreadyLocked(CapabilityKind),
    #[error("action requires a borrowed {0} capability")]
    CapabilityNotBorrowed(CapabilityKind),
    #[error("package '{0}' is not published")]
    UnknownPackage(String),
    #[error("package '{0}' is already published")]
    PackageExists(String),
    #[error("package '{0}' has no authorized upgrade")]
    UpgradeNotAuthorized(String),
    #[error("package '{package}' is at version {current}; cannot commit version {requested}")]
    VersionNotIncreasing {
        package: String,
        current: u64,
        requested: u64,
    },
}
