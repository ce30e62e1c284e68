//! The transactional ledger tying proposals, the registry and the world
//! together.
//!
//! Every mutating operation runs through [`Ledger::transact`]: the closure
//! works on a staged copy that replaces the live state only if it returns
//! `Ok`. An aborted dispatch therefore leaves no trace, not even the
//! execution flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use decree_types::{Intent, ProposalId};

use crate::dispatch::{self, DispatchReport};
use crate::error::EngineError;
use crate::events::{EngineEvent, hex};
use crate::lifecycle::{ExecutionMode, Proposal, ProposalBook, ProposalState, Resolution};
use crate::registry::{ActionRegistry, EngineLimits};
use crate::resources::World;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ledger {
    pub(crate) limits: EngineLimits,
    pub(crate) proposals: ProposalBook,
    pub(crate) registry: ActionRegistry,
    pub(crate) world: World,
    pub(crate) events: Vec<EngineEvent>,
}

impl Ledger {
    #[must_use]
    pub fn new(limits: EngineLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_world(limits: EngineLimits, world: World) -> Self {
        Self {
            limits,
            world,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn limits(&self) -> &EngineLimits {
        &self.limits
    }

    /// Apply limits from configuration; only affects later registrations.
    pub fn set_limits(&mut self, limits: EngineLimits) {
        self.limits = limits;
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[must_use]
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    #[must_use]
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn proposal(&self, id: ProposalId) -> Result<&Proposal, EngineError> {
        self.proposals.get(id)
    }

    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    pub fn state(&self, id: ProposalId) -> Result<ProposalState, EngineError> {
        Ok(self.proposals.get(id)?.state())
    }

    /// Run `f` against a staged copy and commit it only on success.
    pub fn transact<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let mut staged = self.clone();
        let out = f(&mut staged)?;
        *self = staged;
        tracing::debug!(events = self.events.len(), "Transaction committed");
        Ok(out)
    }

    pub fn create_proposal(
        &mut self,
        id: ProposalId,
        outcome_count: u32,
        mode: ExecutionMode,
    ) -> Result<(), EngineError> {
        self.transact(|ledger| {
            ledger.proposals.create(id, outcome_count, mode)?;
            Ok(())
        })
    }

    pub fn register(&mut self, id: ProposalId, intents: Vec<Intent>) -> Result<(), EngineError> {
        self.register_at(id, intents, Utc::now())
    }

    /// Bind one intent per outcome to a freshly created proposal.
    pub fn register_at(
        &mut self,
        id: ProposalId,
        intents: Vec<Intent>,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        self.transact(|ledger| {
            let proposal = ledger.proposals.get(id)?;
            let (outcome_count, mode) = (proposal.outcome_count(), proposal.mode());
            if ledger.registry.contains(id) {
                return Err(EngineError::AlreadyRegistered(id));
            }
            let action_counts: Vec<usize> = intents.iter().map(Intent::len).collect();
            let digests = intents
                .iter()
                .map(|intent| {
                    intent
                        .digest()
                        .map(|d| hex(&d))
                        .map_err(|err| EngineError::Encode(err.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let limits = ledger.limits;
            ledger
                .registry
                .register(id, outcome_count, mode, intents, &limits)?;
            ledger.proposals.mark_registered(id)?;
            ledger.events.push(EngineEvent::IntentsRegistered {
                proposal_id: id,
                outcome_count,
                action_counts,
                digests,
                timestamp: now,
            });
            tracing::info!(proposal_id = %id, outcome_count, "Intents registered");
            Ok(())
        })
    }

    pub fn resolve(
        &mut self,
        id: ProposalId,
        resolution: Resolution,
    ) -> Result<ProposalState, EngineError> {
        self.resolve_at(id, resolution, Utc::now())
    }

    pub fn resolve_at(
        &mut self,
        id: ProposalId,
        resolution: Resolution,
        now: DateTime<Utc>,
    ) -> Result<ProposalState, EngineError> {
        self.transact(|ledger| {
            let winning_outcome = resolution.winning_outcome;
            let finalized = resolution.finalized;
            let state = ledger.proposals.resolve(id, resolution)?;
            ledger.events.push(EngineEvent::ProposalResolved {
                proposal_id: id,
                winning_outcome,
                finalized,
                timestamp: now,
            });
            tracing::info!(
                proposal_id = %id,
                winning_outcome = %winning_outcome,
                finalized,
                "Proposal resolved"
            );
            Ok(state)
        })
    }

    pub fn dispatch(&mut self, id: ProposalId) -> Result<DispatchReport, EngineError> {
        self.dispatch_at(id, Utc::now())
    }

    /// Execute the winning outcome of a resolved proposal, all or nothing.
    pub fn dispatch_at(
        &mut self,
        id: ProposalId,
        now: DateTime<Utc>,
    ) -> Result<DispatchReport, EngineError> {
        match self.transact(|ledger| dispatch::dispatch(ledger, id, now)) {
            Ok(report) => {
                tracing::info!(
                    proposal_id = %id,
                    outcome = %report.outcome,
                    actions = report.actions_executed,
                    "Proposal dispatched"
                );
                Ok(report)
            }
            Err(err) => {
                tracing::warn!(
                    proposal_id = %id,
                    retryable = err.is_retryable(),
                    error = %err,
                    "Dispatch aborted"
                );
                Err(err)
            }
        }
    }
}
