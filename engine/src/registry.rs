//! Write-once storage of intents per (proposal, outcome), plus the
//! at-most-once execution flag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use decree_types::{Intent, OutcomeIndex, ProposalId};

use crate::error::EngineError;
use crate::lifecycle::ExecutionMode;

/// Upper bounds enforced at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineLimits {
    pub max_outcomes: u32,
    pub max_actions_per_intent: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_outcomes: 8,
            max_actions_per_intent: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    outcome_count: u32,
    intents: Vec<Intent>,
}

impl RegistryEntry {
    #[must_use]
    pub fn outcome_count(&self) -> u32 {
        self.outcome_count
    }

    #[must_use]
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionRegistry {
    entries: BTreeMap<ProposalId, RegistryEntry>,
    executed: BTreeMap<ProposalId, bool>,
}

impl ActionRegistry {
    /// Store one intent per outcome, indexed by outcome.
    ///
    /// Every check runs before anything is inserted, so a failed registration
    /// leaves the registry exactly as it was. Records are checked against
    /// `mode` by type tag only; payloads stay opaque until dispatch.
    pub fn register(
        &mut self,
        proposal_id: ProposalId,
        outcome_count: u32,
        mode: ExecutionMode,
        intents: Vec<Intent>,
        limits: &EngineLimits,
    ) -> Result<(), EngineError> {
        if self.entries.contains_key(&proposal_id) {
            return Err(EngineError::AlreadyRegistered(proposal_id));
        }
        if outcome_count < 2 || outcome_count > limits.max_outcomes {
            return Err(EngineError::InvalidOutcomeCount {
                count: outcome_count,
                max: limits.max_outcomes,
            });
        }
        if intents.len() != outcome_count as usize {
            return Err(EngineError::OutcomeCountMismatch {
                proposal_id,
                expected: outcome_count,
                actual: intents.len(),
            });
        }
        for (index, intent) in intents.iter().enumerate() {
            let outcome = OutcomeIndex::new(index as u32);
            if intent.owner() != proposal_id {
                return Err(EngineError::IntentOwnerMismatch {
                    proposal_id,
                    outcome,
                    owner: intent.owner(),
                });
            }
            if intent.len() > limits.max_actions_per_intent {
                return Err(EngineError::IntentTooLong {
                    outcome,
                    len: intent.len(),
                    max: limits.max_actions_per_intent,
                });
            }
            check_mode(mode, outcome, intent)?;
        }

        self.entries.insert(
            proposal_id,
            RegistryEntry {
                outcome_count,
                intents,
            },
        );
        self.executed.insert(proposal_id, false);
        Ok(())
    }

    pub fn get(
        &self,
        proposal_id: ProposalId,
        outcome: OutcomeIndex,
    ) -> Result<&Intent, EngineError> {
        self.entries
            .get(&proposal_id)
            .and_then(|entry| entry.intents.get(outcome.as_usize()))
            .ok_or(EngineError::NotFound {
                proposal_id,
                outcome,
            })
    }

    #[must_use]
    pub fn entry(&self, proposal_id: ProposalId) -> Option<&RegistryEntry> {
        self.entries.get(&proposal_id)
    }

    #[must_use]
    pub fn contains(&self, proposal_id: ProposalId) -> bool {
        self.entries.contains_key(&proposal_id)
    }

    #[must_use]
    pub fn is_executed(&self, proposal_id: ProposalId) -> bool {
        self.executed.get(&proposal_id).copied().unwrap_or(false)
    }

    pub fn mark_executed(&mut self, proposal_id: ProposalId) -> Result<(), EngineError> {
        let flag = self
            .executed
            .get_mut(&proposal_id)
            .ok_or(EngineError::UnknownProposal(proposal_id))?;
        if *flag {
            return Err(EngineError::AlreadyExecuted(proposal_id));
        }
        *flag = true;
        Ok(())
    }
}

/// Fail on the first record in `intent` that `mode` does not admit.
pub(crate) fn check_mode(
    mode: ExecutionMode,
    outcome: OutcomeIndex,
    intent: &Intent,
) -> Result<(), EngineError> {
    let mismatch = intent
        .iter()
        .enumerate()
        .find(|(_, record)| !mode.admits(record.kind()));
    if let Some((position, record)) = mismatch {
        return Err(EngineError::ModeMismatch {
            outcome,
            position,
            tag: record.type_tag().clone(),
            mode,
        });
    }
    Ok(())
}
