//! Command handlers. Each one loads the ledger, applies one engine operation
//! and saves the ledger only if the operation succeeded.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use decree_engine::{
    DispatchReport, EngineLimits, ExecutionMode, Ledger, Resolution, World, describe_intent,
};
use decree_types::{Action, Intent, IntentBuilder, OutcomeIndex, ProposalId};

use crate::store;

/// A proposal authored as JSON: one list of actions per outcome, outcome 0 first.
///
/// ```json
/// {"id": 1, "mode": "standard", "outcomes": [[], [{"type": "deposit", "vault": "ops", "amount": 5}]]}
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProposalFile {
    pub id: u64,
    #[serde(default)]
    pub mode: ExecutionMode,
    pub outcomes: Vec<Vec<Action>>,
}

impl ProposalFile {
    pub fn intents(&self) -> Result<Vec<Intent>> {
        let owner = ProposalId::new(self.id);
        self.outcomes
            .iter()
            .enumerate()
            .map(|(outcome, actions)| {
                actions
                    .iter()
                    .try_fold(IntentBuilder::new(owner), |builder, action| {
                        Ok::<_, anyhow::Error>(builder.push_record(action.encode()?))
                    })
                    .map(IntentBuilder::build)
                    .with_context(|| format!("failed to encode outcome {outcome}"))
            })
            .collect()
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn init(ledger_path: &Path, limits: EngineLimits, force: bool) -> Result<String> {
    if store::exists(ledger_path) && !force {
        bail!(
            "ledger {} already exists; pass --force to overwrite",
            ledger_path.display()
        );
    }
    store::save(ledger_path, &Ledger::new(limits))?;
    Ok(format!("initialized empty ledger at {}", ledger_path.display()))
}

pub fn seed(ledger_path: &Path, limits: EngineLimits, world_path: &Path) -> Result<String> {
    let ledger = store::load(ledger_path, limits)?;
    if ledger.proposals().next().is_some() {
        bail!("ledger already has proposals; seed a fresh ledger instead");
    }
    let world: World = read_json(world_path)?;
    store::save(ledger_path, &Ledger::with_world(limits, world))?;
    Ok(format!("seeded world from {}", world_path.display()))
}

pub fn propose(ledger_path: &Path, limits: EngineLimits, proposal_path: &Path) -> Result<String> {
    let mut ledger = store::load(ledger_path, limits)?;
    let proposal: ProposalFile = read_json(proposal_path)?;
    let id = ProposalId::new(proposal.id);
    let intents = proposal.intents()?;
    let outcome_count = u32::try_from(intents.len()).context("too many outcomes")?;

    ledger.transact(|staged| {
        staged.create_proposal(id, outcome_count, proposal.mode)?;
        staged.register(id, intents)
    })?;
    store::save(ledger_path, &ledger)?;
    Ok(format!(
        "registered proposal {id} with {outcome_count} outcomes"
    ))
}

pub fn resolve(
    ledger_path: &Path,
    limits: EngineLimits,
    id: u64,
    winner: u32,
    twaps: Vec<u64>,
    pending: bool,
) -> Result<String> {
    let mut ledger = store::load(ledger_path, limits)?;
    let id = ProposalId::new(id);
    let resolution = Resolution {
        winning_outcome: OutcomeIndex::new(winner),
        twaps,
        finalized: !pending,
    };
    let state = ledger.resolve(id, resolution)?;
    store::save(ledger_path, &ledger)?;
    Ok(format!("proposal {id} is {state}"))
}

pub fn dispatch(ledger_path: &Path, limits: EngineLimits, id: u64) -> Result<String> {
    let mut ledger = store::load(ledger_path, limits)?;
    let id = ProposalId::new(id);
    let report = match ledger.dispatch(id) {
        Ok(report) => report,
        Err(err) if err.is_retryable() => {
            return Err(err).context("dispatch did not clear the gate; it may be retried");
        }
        Err(err) => return Err(err.into()),
    };
    store::save(ledger_path, &ledger)?;
    Ok(render_report(&report))
}

fn render_report(report: &DispatchReport) -> String {
    let mut out = format!(
        "dispatched proposal {} outcome {}: {} action(s)",
        report.proposal_id, report.outcome, report.actions_executed
    );
    if report.outcome.is_reject() {
        out.push_str(" (reject outcome)");
    }
    if let Some(gate) = &report.gate {
        let _ = write!(
            out,
            "\ngate: difficulty {} cleared at accept {} / reject {}",
            gate.max_difficulty, gate.prices.twap_accept, gate.prices.twap_reject
        );
        for document in &gate.documents {
            let _ = write!(out, "\nedited document {document}");
        }
    }
    out
}

pub fn show(ledger_path: &Path, limits: EngineLimits, id: u64) -> Result<String> {
    let ledger = store::load(ledger_path, limits)?;
    let id = ProposalId::new(id);
    let proposal = ledger.proposal(id)?;

    let mode = proposal.mode();
    let mut out = format!(
        "proposal {id}: {} ({mode}, {} outcomes)",
        proposal.state(),
        proposal.outcome_count()
    );
    if let Some(resolution) = proposal.resolution() {
        let _ = write!(
            out,
            "\nresolution: outcome {} wins, twaps {:?}, {}",
            resolution.winning_outcome,
            resolution.twaps,
            if resolution.finalized {
                "finalized"
            } else {
                "pending"
            }
        );
    }
    if let Some(entry) = ledger.registry().entry(id) {
        for (outcome, intent) in entry.intents().iter().enumerate() {
            let label = if outcome == 0 { " (reject)" } else { "" };
            let _ = write!(out, "\noutcome {outcome}{label}: {} action(s)", intent.len());
            for described in describe_intent(intent) {
                let _ = write!(out, "\n  {described}");
            }
        }
    }
    Ok(out)
}

pub fn events(ledger_path: &Path, limits: EngineLimits) -> Result<String> {
    let ledger = store::load(ledger_path, limits)?;
    let lines = ledger
        .events()
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()
        .context("failed to serialize events")?;
    Ok(lines.join("\n"))
}
