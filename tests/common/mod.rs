//! Shared test utilities and fixtures
//!
//! A small organization: one funded vault, a governance currency, both
//! capabilities in the locker, a published package and a charter document.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use decree_engine::{EngineLimits, ExecutionMode, Ledger, Resolution, World};
use decree_types::{
    Action, CapabilityKind, Deposit, Difficulty, Intent, IntentBuilder, LineId, OutcomeIndex,
    ProposalId, Withdraw,
};

pub const VAULT: &str = "ops";
pub const VAULT_BALANCE: u64 = 1_000;
pub const CHARTER: &str = "charter";

/// Charter lines and their difficulties, in order; ids are 0, 1, 2.
pub const CHARTER_LINES: [(&str, u64); 3] = [
    ("Members may propose.", 5_000),
    ("Markets decide.", 20_000),
    ("The treasury is shared.", 10_000),
];

pub fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub fn world() -> World {
    let mut world = World::default();
    world
        .treasury
        .open_vault(VAULT, VAULT_BALANCE)
        .expect("vault");
    world
        .treasury
        .register_currency("GOV", Some(1_000_000))
        .expect("currency");
    world
        .capabilities
        .deposit(CapabilityKind::PackageUpgrade)
        .expect("upgrade capability");
    world
        .capabilities
        .deposit(CapabilityKind::MintAuthority)
        .expect("mint capability");
    world.packages.publish("core", [0; 32]).expect("package");
    world.documents.create_document(CHARTER).expect("document");
    for (position, (text, difficulty)) in (0u32..).zip(CHARTER_LINES) {
        world
            .documents
            .insert_line(CHARTER, position, text.to_owned(), Difficulty::new(difficulty))
            .expect("charter line");
    }
    world
}

pub fn ledger() -> Ledger {
    Ledger::with_world(EngineLimits::default(), world())
}

pub fn line(id: u64) -> LineId {
    LineId::new(id)
}

pub fn deposit(amount: u64) -> Action {
    Action::Deposit(Deposit {
        vault: VAULT.to_owned(),
        amount,
    })
}

pub fn withdraw(recipient: &str, amount: u64) -> Action {
    Action::Withdraw(Withdraw {
        vault: VAULT.to_owned(),
        recipient: recipient.to_owned(),
        amount,
        memo: None,
    })
}

pub fn intent(owner: ProposalId, actions: &[Action]) -> Intent {
    actions
        .iter()
        .fold(IntentBuilder::new(owner), |builder, action| {
            builder.push_record(action.encode().expect("encode"))
        })
        .build()
}

/// Create and register a two-outcome proposal whose reject intent is empty.
pub fn propose(
    ledger: &mut Ledger,
    id: u64,
    mode: ExecutionMode,
    accept: &[Action],
) -> ProposalId {
    let id = ProposalId::new(id);
    ledger.create_proposal(id, 2, mode).expect("create");
    ledger
        .register_at(id, vec![Intent::empty(id), intent(id, accept)], at())
        .expect("register");
    id
}

pub fn resolve(ledger: &mut Ledger, id: ProposalId, winner: OutcomeIndex, twaps: [u64; 2]) {
    ledger
        .resolve_at(id, Resolution::finalized(winner, twaps.to_vec()), at())
        .expect("resolve");
}
