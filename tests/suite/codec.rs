//! Records that reach dispatch in older or damaged encodings.

use decree_engine::{DescribedAction, EngineError, ExecutionMode, Ledger, describe_intent};
use decree_types::{
    ActionRecord, DecodeError, FormatVersion, Intent, IntentBuilder, OutcomeIndex, ProposalId,
    TypeTag,
};

use crate::common::{VAULT, at, deposit, ledger, resolve, withdraw};

fn register_raw(ledger: &mut Ledger, id: u64, records: Vec<ActionRecord>) -> ProposalId {
    let id = ProposalId::new(id);
    ledger
        .create_proposal(id, 2, ExecutionMode::Standard)
        .expect("create");
    let accept = records
        .into_iter()
        .fold(IntentBuilder::new(id), IntentBuilder::push_record)
        .build();
    ledger
        .register_at(id, vec![Intent::empty(id), accept], at())
        .expect("register");
    id
}

/// A version-1 withdraw: the version-2 layout without the trailing `memo`
/// presence byte.
fn legacy_withdraw(recipient: &str, amount: u64) -> ActionRecord {
    let current = withdraw(recipient, amount).encode().expect("encode");
    let payload = current.payload();
    assert_eq!(payload.last(), Some(&0));
    ActionRecord::from_parts(
        current.type_tag().clone(),
        FormatVersion::V1,
        payload[..payload.len() - 1].to_vec(),
    )
}

#[test]
fn legacy_withdraw_dispatches_like_the_current_layout() {
    let mut ledger = ledger();
    let id = register_raw(&mut ledger, 1, vec![legacy_withdraw("carol", 30)]);
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);

    let report = ledger.dispatch_at(id, at()).expect("dispatch");

    assert_eq!(report.actions_executed, 1);
    assert_eq!(ledger.world().treasury.account_balance("carol"), 30);
}

#[test]
fn legacy_records_describe_with_their_stored_version() {
    let owner = ProposalId::new(1);
    let intent = IntentBuilder::new(owner)
        .push_record(legacy_withdraw("carol", 30))
        .build();

    let described = describe_intent(&intent);

    assert_eq!(described.len(), 1);
    assert_eq!(
        described[0].to_string(),
        format!("[0] decree::treasury::withdraw (v1): vault={VAULT}, recipient=carol, amount=30")
    );
}

#[test]
fn trailing_bytes_abort_dispatch() {
    let mut ledger = ledger();
    let mut padded = deposit(5).encode().expect("encode").payload().to_vec();
    padded.push(0xff);
    let record = ActionRecord::from_parts(
        TypeTag::new("decree::treasury::deposit"),
        FormatVersion::V1,
        padded,
    );
    let id = register_raw(&mut ledger, 1, vec![deposit(1).encode().expect("encode"), record]);
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);
    let before = ledger.clone();

    let err = ledger.dispatch_at(id, at()).expect_err("trailing byte");

    assert_eq!(
        err,
        EngineError::Decode(DecodeError::TrailingBytes { remaining: 1 })
    );
    assert_eq!(ledger, before);
}

#[test]
fn unknown_tags_and_versions_abort_dispatch() {
    let mut ledger = ledger();
    let unknown = ActionRecord::from_parts(
        TypeTag::new("decree::treasury::burn"),
        FormatVersion::V1,
        vec![],
    );
    let id = register_raw(&mut ledger, 1, vec![unknown]);
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);
    assert!(matches!(
        ledger.dispatch_at(id, at()),
        Err(EngineError::Decode(DecodeError::UnknownActionType { .. }))
    ));

    let future = ActionRecord::from_parts(
        TypeTag::new("decree::treasury::deposit"),
        FormatVersion::new(9),
        deposit(1).encode().expect("encode").payload().to_vec(),
    );
    let id = register_raw(&mut ledger, 2, vec![future]);
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);
    assert!(matches!(
        ledger.dispatch_at(id, at()),
        Err(EngineError::Decode(DecodeError::UnsupportedVersion { .. }))
    ));
}

#[test]
fn undecodable_records_still_describe() {
    let owner = ProposalId::new(1);
    let intent = IntentBuilder::new(owner)
        .push_record(deposit(3).encode().expect("encode"))
        .push_record(ActionRecord::from_parts(
            TypeTag::new("decree::treasury::burn"),
            FormatVersion::V1,
            vec![1, 2, 3],
        ))
        .build();

    let described = describe_intent(&intent);

    assert!(matches!(described[0], DescribedAction::Decoded { position: 0, .. }));
    assert!(matches!(
        &described[1],
        DescribedAction::Undecodable { position: 1, tag, .. }
            if tag.as_str() == "decree::treasury::burn"
    ));
}
