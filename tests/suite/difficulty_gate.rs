//! Difficulty-gated document batches.

use decree_engine::{
    EngineError, EngineEvent, ErrorCategory, ExecutionMode, ProposalState, Resolution,
    max_difficulty,
};
use decree_types::{
    Action, Difficulty, InsertLine, Intent, OutcomeIndex, ProposalId, RemoveLine, UpdateLine,
};

use crate::common::{
    CHARTER, CHARTER_LINES, at, deposit, intent, ledger, line, propose, resolve, world,
};

fn insert(position: u32, text: &str, difficulty: u64) -> Action {
    Action::InsertLine(InsertLine {
        document: CHARTER.to_owned(),
        position,
        text: text.to_owned(),
        difficulty,
    })
}

fn update(id: u64, text: &str) -> Action {
    Action::UpdateLine(UpdateLine {
        document: CHARTER.to_owned(),
        line_id: line(id),
        text: text.to_owned(),
    })
}

fn remove(id: u64) -> Action {
    Action::RemoveLine(RemoveLine {
        document: CHARTER.to_owned(),
        line_id: line(id),
    })
}

#[test]
fn batch_is_priced_at_its_hardest_edit() {
    let documents = world().documents;
    let owner = ProposalId::new(1);

    let batch = intent(owner, &[update(0, "a"), remove(2), insert(0, "b", 100)]);
    assert_eq!(
        max_difficulty(&batch, &documents).expect("difficulty"),
        Difficulty::new(10_000)
    );

    let batch = intent(owner, &[insert(0, "b", 30_000), update(1, "c")]);
    assert_eq!(
        max_difficulty(&batch, &documents).expect("difficulty"),
        Difficulty::new(30_000)
    );
}

#[test]
fn clearing_batch_applies_every_edit_and_snapshots_the_document() {
    let mut ledger = ledger();
    let id = propose(
        &mut ledger,
        1,
        ExecutionMode::DifficultyGated,
        &[update(1, "Markets decide, slowly."), insert(3, "Appendix.", 100)],
    );
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);

    let report = ledger.dispatch_at(id, at()).expect("dispatch");

    let gate = report.gate.expect("gate report");
    assert_eq!(gate.max_difficulty, Difficulty::new(20_000));
    assert_eq!(gate.edits_applied, 2);
    assert_eq!(gate.documents, vec![CHARTER.to_owned()]);
    assert_eq!(report.actions_executed, 2);

    let charter = ledger.world().documents.document(CHARTER).expect("charter");
    let texts: Vec<_> = charter.lines().iter().map(|l| l.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            CHARTER_LINES[0].0,
            "Markets decide, slowly.",
            CHARTER_LINES[2].0,
            "Appendix."
        ]
    );
    // Updates keep the stored difficulty; the insert carries its own.
    assert_eq!(charter.lines()[1].difficulty, Difficulty::new(20_000));
    assert_eq!(charter.lines()[3].difficulty, Difficulty::new(100));
    assert_eq!(charter.lines()[3].id, line(3));

    let Some(EngineEvent::DocumentSnapshot {
        document, lines, ..
    }) = ledger.events().last()
    else {
        panic!("expected a document snapshot last");
    };
    assert_eq!(document, CHARTER);
    assert_eq!(lines.as_slice(), charter.lines());
    assert_eq!(ledger.state(id).expect("state"), ProposalState::Executed);
}

#[test]
fn insufficient_margin_is_retryable_after_a_price_refresh() {
    let mut ledger = ledger();
    let id = propose(
        &mut ledger,
        1,
        ExecutionMode::DifficultyGated,
        &[remove(1)],
    );
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 110]);
    let before = ledger.clone();

    let err = ledger.dispatch_at(id, at()).expect_err("margin too thin");

    assert_eq!(
        err,
        EngineError::ThresholdNotMet {
            twap_accept: 110,
            twap_reject: 100,
            max_difficulty: Difficulty::new(20_000),
        }
    );
    assert_eq!(err.category(), ErrorCategory::Policy);
    assert!(err.is_retryable());
    assert_eq!(ledger, before);
    assert_eq!(ledger.state(id).expect("state"), ProposalState::Resolved);

    let state = ledger
        .resolve_at(
            id,
            Resolution::finalized(OutcomeIndex::ACCEPT, vec![100, 150]),
            at(),
        )
        .expect("refresh prices");
    assert_eq!(state, ProposalState::Resolved);

    let report = ledger.dispatch_at(id, at()).expect("retry");
    assert_eq!(report.actions_executed, 1);
    let charter = ledger.world().documents.document(CHARTER).expect("charter");
    assert_eq!(charter.lines().len(), 2);
    assert!(charter.line(line(1)).is_none());
}

#[test]
fn price_refresh_cannot_change_the_winner() {
    let mut ledger = ledger();
    let id = propose(&mut ledger, 1, ExecutionMode::DifficultyGated, &[remove(0)]);
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 101]);

    let err = ledger
        .resolve_at(
            id,
            Resolution::finalized(OutcomeIndex::REJECT, vec![150, 100]),
            at(),
        )
        .expect_err("winner is fixed");
    assert!(matches!(err, EngineError::InvalidResolution { .. }));
}

#[test]
fn insert_is_priced_at_its_proposed_difficulty() {
    let mut ledger = ledger();
    let id = propose(
        &mut ledger,
        1,
        ExecutionMode::DifficultyGated,
        &[insert(0, "Preamble.", 1_000)],
    );
    // A 2% premium clears a 1% margin.
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 102]);

    let report = ledger.dispatch_at(id, at()).expect("dispatch");
    assert_eq!(
        report.gate.expect("gate").max_difficulty,
        Difficulty::new(1_000)
    );
    let charter = ledger.world().documents.document(CHARTER).expect("charter");
    assert_eq!(charter.lines()[0].text, "Preamble.");
}

#[test]
fn gated_proposals_only_register_document_edits() {
    let mut ledger = ledger();
    let id = ProposalId::new(1);
    ledger
        .create_proposal(id, 2, ExecutionMode::DifficultyGated)
        .expect("create");
    let before = ledger.clone();

    let err = ledger
        .register_at(
            id,
            vec![Intent::empty(id), intent(id, &[insert(0, "x", 0), deposit(5)])],
            at(),
        )
        .expect_err("deposit in a batch");

    assert!(matches!(
        err,
        EngineError::ModeMismatch {
            outcome,
            position: 1,
            mode: ExecutionMode::DifficultyGated,
            ..
        } if outcome == OutcomeIndex::ACCEPT
    ));
    assert_eq!(err.category(), ErrorCategory::Structural);
    assert_eq!(ledger, before);
}

#[test]
fn standard_proposals_cannot_carry_document_edits() {
    let mut ledger = ledger();
    let id = ProposalId::new(1);
    ledger
        .create_proposal(id, 2, ExecutionMode::Standard)
        .expect("create");

    let err = ledger
        .register_at(
            id,
            vec![Intent::empty(id), intent(id, &[update(1, "rewritten"), remove(0)])],
            at(),
        )
        .expect_err("ungated edit");

    assert!(matches!(
        err,
        EngineError::ModeMismatch {
            position: 0,
            mode: ExecutionMode::Standard,
            ..
        }
    ));
    assert_eq!(ledger.state(id).expect("state"), ProposalState::Created);
    let charter = ledger.world().documents.document(CHARTER).expect("charter");
    assert_eq!(charter.lines().len(), CHARTER_LINES.len());
}

#[test]
fn edits_to_missing_lines_fail_at_the_gate() {
    let mut ledger = ledger();
    let id = propose(
        &mut ledger,
        1,
        ExecutionMode::DifficultyGated,
        &[update(99, "ghost")],
    );
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 1_000]);

    let err = ledger.dispatch_at(id, at()).expect_err("unknown line");

    assert!(matches!(err, EngineError::Resource(_)));
    assert_eq!(err.category(), ErrorCategory::Execution);
    assert_eq!(ledger.state(id).expect("state"), ProposalState::Resolved);
}

#[test]
fn reject_outcome_skips_the_gate() {
    let mut ledger = ledger();
    let id = propose(&mut ledger, 1, ExecutionMode::DifficultyGated, &[remove(1)]);
    resolve(&mut ledger, id, OutcomeIndex::REJECT, [100, 90]);

    let report = ledger.dispatch_at(id, at()).expect("dispatch");

    assert!(report.gate.is_none());
    assert_eq!(
        ledger
            .world()
            .documents
            .document(CHARTER)
            .expect("charter")
            .lines()
            .len(),
        CHARTER_LINES.len()
    );
}
