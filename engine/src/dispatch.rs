//! Winning-outcome dispatch.
//!
//! Outcome 0 is the reject sentinel: dispatching it marks the proposal
//! executed without looking up or running any intent. Any other outcome runs
//! its registered intent to the end, either directly or behind the
//! difficulty gate, depending on the proposal's execution mode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use decree_types::{OutcomeIndex, ProposalId};

use crate::error::EngineError;
use crate::events::EngineEvent;
use crate::executors::run_intent;
use crate::gate::{GateReport, execute_batch};
use crate::ledger::Ledger;
use crate::lifecycle::{ExecutionMode, ProposalState};
use crate::registry::check_mode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub proposal_id: ProposalId,
    pub outcome: OutcomeIndex,
    pub actions_executed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateReport>,
}

/// Dispatch the resolved winner of `proposal_id` against the staged ledger.
///
/// Must run inside [`Ledger::transact`]: on error the staged copy may hold
/// partial side effects and is discarded.
pub(crate) fn dispatch(
    ledger: &mut Ledger,
    proposal_id: ProposalId,
    now: DateTime<Utc>,
) -> Result<DispatchReport, EngineError> {
    let proposal = ledger.proposals.get(proposal_id)?;
    match proposal.state() {
        ProposalState::Resolved => {}
        ProposalState::Executed => return Err(EngineError::AlreadyExecuted(proposal_id)),
        ProposalState::Created | ProposalState::Registered => {
            return Err(EngineError::NotResolved(proposal_id));
        }
    }
    if ledger.registry.is_executed(proposal_id) {
        return Err(EngineError::AlreadyExecuted(proposal_id));
    }
    let resolution = proposal
        .resolution()
        .cloned()
        .ok_or(EngineError::NotResolved(proposal_id))?;
    let mode = proposal.mode();
    let outcome = resolution.winning_outcome;

    let mut report = DispatchReport {
        proposal_id,
        outcome,
        actions_executed: 0,
        gate: None,
    };

    if outcome.is_reject() {
        tracing::debug!(proposal_id = %proposal_id, "Reject outcome won; nothing to run");
    } else {
        let intent = ledger.registry.get(proposal_id, outcome)?;
        check_mode(mode, outcome, intent)?;
        match mode {
            ExecutionMode::Standard => {
                report.actions_executed = run_intent(intent, &mut ledger.world)?;
            }
            ExecutionMode::DifficultyGated => {
                let prices = resolution.prices().ok_or(EngineError::MissingPrice {
                    proposal_id,
                    outcome,
                })?;
                let gate = execute_batch(intent, prices, &mut ledger.world)?;
                report.actions_executed = gate.edits_applied;
                report.gate = Some(gate);
            }
        }
    }

    ledger.registry.mark_executed(proposal_id)?;
    ledger.proposals.mark_executed(proposal_id)?;

    ledger.events.push(EngineEvent::Dispatched {
        proposal_id,
        outcome,
        action_count: report.actions_executed,
        timestamp: now,
    });
    if let Some(gate) = &report.gate {
        for document in &gate.documents {
            let lines = ledger.world.documents.snapshot(document)?;
            ledger.events.push(EngineEvent::DocumentSnapshot {
                proposal_id,
                document: document.clone(),
                lines,
                timestamp: now,
            });
        }
    }
    Ok(report)
}
