//! Proposal lifecycle: Created -> Registered -> Resolved -> Executed.
//!
//! The market is an external collaborator; it only reaches the engine as a
//! [`Resolution`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use decree_types::{ActionKind, OutcomeIndex, PricePair, ProposalId};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalState {
    Created,
    Registered,
    Resolved,
    Executed,
}

impl ProposalState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Registered => "registered",
            Self::Resolved => "resolved",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the winning intent is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Run every action in order.
    #[default]
    Standard,
    /// The intent is a batch of document edits that must clear the
    /// difficulty-weighted price threshold first.
    DifficultyGated,
}

impl ExecutionMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::DifficultyGated => "difficulty-gated",
        }
    }

    /// Whether a record of `kind` may appear in an intent run under this mode.
    ///
    /// Document edits only ever run behind the gate, and the gate only runs
    /// document edits. Unknown tags are never document edits.
    #[must_use]
    pub fn admits(self, kind: Option<ActionKind>) -> bool {
        let is_edit = kind.is_some_and(ActionKind::is_document_edit);
        match self {
            Self::Standard => !is_edit,
            Self::DifficultyGated => is_edit,
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market outcome for one proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub winning_outcome: OutcomeIndex,
    /// Time-weighted average price per outcome, indexed by outcome.
    pub twaps: Vec<u64>,
    pub finalized: bool,
}

impl Resolution {
    #[must_use]
    pub fn finalized(winning_outcome: OutcomeIndex, twaps: Vec<u64>) -> Self {
        Self {
            winning_outcome,
            twaps,
            finalized: true,
        }
    }

    #[must_use]
    pub fn twap(&self, outcome: OutcomeIndex) -> Option<u64> {
        self.twaps.get(outcome.as_usize()).copied()
    }

    /// Reject price (outcome 0) against the winning outcome's price.
    #[must_use]
    pub fn prices(&self) -> Option<PricePair> {
        Some(PricePair {
            twap_reject: self.twap(OutcomeIndex::REJECT)?,
            twap_accept: self.twap(self.winning_outcome)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    id: ProposalId,
    outcome_count: u32,
    mode: ExecutionMode,
    state: ProposalState,
    #[serde(default)]
    resolution: Option<Resolution>,
}

impl Proposal {
    #[must_use]
    pub fn id(&self) -> ProposalId {
        self.id
    }

    #[must_use]
    pub fn outcome_count(&self) -> u32 {
        self.outcome_count
    }

    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> ProposalState {
        self.state
    }

    #[must_use]
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    fn expect_state(&self, expected: ProposalState) -> Result<(), EngineError> {
        if self.state == expected {
            return Ok(());
        }
        Err(EngineError::InvalidTransition {
            proposal_id: self.id,
            state: self.state.as_str(),
            expected: expected.as_str(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalBook {
    proposals: BTreeMap<ProposalId, Proposal>,
}

impl ProposalBook {
    pub fn create(
        &mut self,
        id: ProposalId,
        outcome_count: u32,
        mode: ExecutionMode,
    ) -> Result<&Proposal, EngineError> {
        if self.proposals.contains_key(&id) {
            return Err(EngineError::DuplicateProposal(id));
        }
        let proposal = self.proposals.entry(id).or_insert(Proposal {
            id,
            outcome_count,
            mode,
            state: ProposalState::Created,
            resolution: None,
        });
        Ok(proposal)
    }

    pub fn get(&self, id: ProposalId) -> Result<&Proposal, EngineError> {
        self.proposals
            .get(&id)
            .ok_or(EngineError::UnknownProposal(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.values()
    }

    pub(crate) fn mark_registered(&mut self, id: ProposalId) -> Result<(), EngineError> {
        let proposal = self.get_mut(id)?;
        proposal.expect_state(ProposalState::Created)?;
        proposal.state = ProposalState::Registered;
        Ok(())
    }

    /// Record the market's resolution.
    ///
    /// A provisional resolution is stored but leaves the proposal Registered.
    /// A Resolved proposal may be re-resolved with refreshed prices, but the
    /// winning outcome can no longer change.
    pub(crate) fn resolve(
        &mut self,
        id: ProposalId,
        resolution: Resolution,
    ) -> Result<ProposalState, EngineError> {
        let proposal = self.get_mut(id)?;
        let invalid = |reason: String| EngineError::InvalidResolution {
            proposal_id: id,
            reason,
        };

        match proposal.state {
            ProposalState::Registered => {}
            ProposalState::Resolved => {
                let previous = proposal
                    .resolution
                    .as_ref()
                    .map(|r| r.winning_outcome);
                if previous != Some(resolution.winning_outcome) {
                    return Err(invalid(format!(
                        "winning outcome is already fixed at {}",
                        previous.map_or_else(|| "none".to_owned(), |o| o.to_string())
                    )));
                }
                if !resolution.finalized {
                    return Err(invalid("a finalized resolution cannot be reopened".to_owned()));
                }
            }
            ProposalState::Executed => return Err(EngineError::AlreadyExecuted(id)),
            ProposalState::Created => {
                return Err(EngineError::InvalidTransition {
                    proposal_id: id,
                    state: proposal.state.as_str(),
                    expected: ProposalState::Registered.as_str(),
                });
            }
        }

        if resolution.winning_outcome.value() >= proposal.outcome_count {
            return Err(invalid(format!(
                "winning outcome {} is not below the outcome count {}",
                resolution.winning_outcome, proposal.outcome_count
            )));
        }
        if resolution.twaps.len() != proposal.outcome_count as usize {
            return Err(invalid(format!(
                "{} prices reported for {} outcomes",
                resolution.twaps.len(),
                proposal.outcome_count
            )));
        }

        if resolution.finalized {
            proposal.state = ProposalState::Resolved;
        }
        proposal.resolution = Some(resolution);
        Ok(proposal.state)
    }

    pub(crate) fn mark_executed(&mut self, id: ProposalId) -> Result<(), EngineError> {
        let proposal = self.get_mut(id)?;
        match proposal.state {
            ProposalState::Resolved => {
                proposal.state = ProposalState::Executed;
                Ok(())
            }
            ProposalState::Executed => Err(EngineError::AlreadyExecuted(id)),
            ProposalState::Created | ProposalState::Registered => {
                Err(EngineError::NotResolved(id))
            }
        }
    }

    fn get_mut(&mut self, id: ProposalId) -> Result<&mut Proposal, EngineError> {
        self.proposals
            .get_mut(&id)
            .ok_or(EngineError::UnknownProposal(id))
    }
}
