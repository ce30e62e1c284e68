//! Events emitted by committed ledger operations, for indexers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use decree_types::{OutcomeIndex, ProposalId};

use crate::resources::Line;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    IntentsRegistered {
        proposal_id: ProposalId,
        outcome_count: u32,
        action_counts: Vec<usize>,
        /// Hex SHA-256 of each outcome's intent.
        digests: Vec<String>,
        timestamp: DateTime<Utc>,
    },
    ProposalResolved {
        proposal_id: ProposalId,
        winning_outcome: OutcomeIndex,
        finalized: bool,
        timestamp: DateTime<Utc>,
    },
    Dispatched {
        proposal_id: ProposalId,
        outcome: OutcomeIndex,
        action_count: usize,
        timestamp: DateTime<Utc>,
    },
    /// Full state of a document after a gated batch edited it.
    DocumentSnapshot {
        proposal_id: ProposalId,
        document: String,
        lines: Vec<Line>,
        timestamp: DateTime<Utc>,
    },
}

impl EngineEvent {
    #[must_use]
    pub fn proposal_id(&self) -> ProposalId {
        match self {
            Self::IntentsRegistered { proposal_id, .. }
            | Self::ProposalResolved { proposal_id, .. }
            | Self::Dispatched { proposal_id, .. }
            | Self::DocumentSnapshot { proposal_id, .. } => *proposal_id,
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::IntentsRegistered { timestamp, .. }
            | Self::ProposalResolved { timestamp, .. }
            | Self::Dispatched { timestamp, .. }
            | Self::DocumentSnapshot { timestamp, .. } => *timestamp,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::IntentsRegistered { .. } => "intents_registered",
            Self::ProposalResolved { .. } => "proposal_resolved",
            Self::Dispatched { .. } => "dispatched",
            Self::DocumentSnapshot { .. } => "document_snapshot",
        }
    }
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write as _;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
