//! Dispatch of resolved proposals in standard mode.

use decree_engine::{EngineError, EngineEvent, ExecutionMode, Ledger, ProposalState, Resolution};
use decree_types::{OutcomeIndex, ProposalId};

use crate::common::{VAULT, VAULT_BALANCE, at, deposit, ledger, propose, resolve, withdraw};

#[test]
fn accept_outcome_runs_every_action_in_order() {
    let mut ledger = ledger();
    let id = propose(
        &mut ledger,
        1,
        ExecutionMode::Standard,
        &[deposit(500), withdraw("carol", 1_400), withdraw("dave", 50)],
    );
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);

    let report = ledger.dispatch_at(id, at()).expect("dispatch");

    assert_eq!(report.outcome, OutcomeIndex::ACCEPT);
    assert_eq!(report.actions_executed, 3);
    assert!(report.gate.is_none());
    // Withdrawal of 1_400 only succeeds because the deposit ran first.
    assert_eq!(
        ledger.world().treasury.vault_balance(VAULT),
        Some(VAULT_BALANCE + 500 - 1_400 - 50)
    );
    assert_eq!(ledger.world().treasury.account_balance("carol"), 1_400);
    assert_eq!(ledger.world().treasury.account_balance("dave"), 50);
    assert_eq!(ledger.state(id).expect("state"), ProposalState::Executed);
    assert!(ledger.registry().is_executed(id));
}

#[test]
fn lifecycle_emits_one_event_per_operation() {
    let mut ledger = ledger();
    let id = propose(&mut ledger, 1, ExecutionMode::Standard, &[deposit(1)]);
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);
    ledger.dispatch_at(id, at()).expect("dispatch");

    let names: Vec<_> = ledger.events().iter().map(EngineEvent::name).collect();
    assert_eq!(
        names,
        vec!["intents_registered", "proposal_resolved", "dispatched"]
    );
    assert!(ledger.events().iter().all(|e| e.proposal_id() == id));
    assert!(ledger.events().iter().all(|e| e.timestamp() == at()));
}

#[test]
fn second_dispatch_is_rejected_without_side_effects() {
    let mut ledger = ledger();
    let id = propose(&mut ledger, 1, ExecutionMode::Standard, &[deposit(10)]);
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);
    ledger.dispatch_at(id, at()).expect("first dispatch");
    let after_first = ledger.clone();

    let err = ledger.dispatch_at(id, at()).expect_err("second dispatch");

    assert!(matches!(err, EngineError::AlreadyExecuted(p) if p == id));
    assert_eq!(ledger, after_first);
    assert_eq!(
        ledger.world().treasury.vault_balance(VAULT),
        Some(VAULT_BALANCE + 10)
    );
}

#[test]
fn reject_outcome_marks_executed_and_runs_nothing() {
    let mut ledger = ledger();
    let id = propose(&mut ledger, 1, ExecutionMode::Standard, &[withdraw("carol", 10)]);
    resolve(&mut ledger, id, OutcomeIndex::REJECT, [150, 100]);
    let world_before = ledger.world().clone();

    let report = ledger.dispatch_at(id, at()).expect("dispatch");

    assert!(report.outcome.is_reject());
    assert_eq!(report.actions_executed, 0);
    assert_eq!(ledger.world(), &world_before);
    assert_eq!(ledger.state(id).expect("state"), ProposalState::Executed);
    assert!(matches!(
        ledger.dispatch_at(id, at()),
        Err(EngineError::AlreadyExecuted(_))
    ));
}

#[test]
fn failing_action_aborts_the_whole_intent() {
    let mut ledger = ledger();
    let id = propose(
        &mut ledger,
        1,
        ExecutionMode::Standard,
        &[withdraw("carol", 600), withdraw("dave", 600)],
    );
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);
    let before = ledger.clone();

    let err = ledger.dispatch_at(id, at()).expect_err("overdraw");

    assert!(matches!(err, EngineError::Resource(_)));
    assert!(!err.is_retryable());
    // The first withdrawal succeeded on the staged copy only.
    assert_eq!(ledger, before);
    assert_eq!(ledger.world().treasury.account_balance("carol"), 0);
    assert_eq!(ledger.state(id).expect("state"), ProposalState::Resolved);
    assert!(!ledger.registry().is_executed(id));
}

#[test]
fn unresolved_proposals_cannot_dispatch() {
    let mut ledger = ledger();
    let id = propose(&mut ledger, 1, ExecutionMode::Standard, &[deposit(1)]);

    assert!(matches!(
        ledger.dispatch_at(id, at()),
        Err(EngineError::NotResolved(_))
    ));

    let pending = Resolution {
        winning_outcome: OutcomeIndex::ACCEPT,
        twaps: vec![100, 150],
        finalized: false,
    };
    let state = ledger.resolve_at(id, pending, at()).expect("pending");
    assert_eq!(state, ProposalState::Registered);
    assert!(matches!(
        ledger.dispatch_at(id, at()),
        Err(EngineError::NotResolved(_))
    ));
}

#[test]
fn unknown_proposal_is_reported() {
    let mut ledger = ledger();
    assert!(matches!(
        ledger.dispatch_at(ProposalId::new(42), at()),
        Err(EngineError::UnknownProposal(_))
    ));
}

#[test]
fn ledger_survives_a_json_round_trip_mid_lifecycle() {
    let mut ledger = ledger();
    let id = propose(&mut ledger, 1, ExecutionMode::Standard, &[withdraw("carol", 5)]);
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);

    let json = serde_json::to_string(&ledger).expect("serialize");
    let mut restored: Ledger = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, ledger);

    restored.dispatch_at(id, at()).expect("dispatch restored");
    assert_eq!(restored.world().treasury.account_balance("carol"), 5);
}
