//! Borrowed capabilities inside dispatched intents.

use decree_engine::{EngineError, ExecutionMode, ResourceError};
use decree_types::{
    Action, AuthorizeUpgrade, BorrowCapability, CapabilityKind, CommitUpgrade, Mint, OutcomeIndex,
    ReturnCapability,
};

use crate::common::{VAULT, VAULT_BALANCE, at, deposit, ledger, propose, resolve};

fn borrow(capability: CapabilityKind) -> Action {
    Action::BorrowCapability(BorrowCapability { capability })
}

fn give_back(capability: CapabilityKind) -> Action {
    Action::ReturnCapability(ReturnCapability { capability })
}

fn mint(recipient: &str, amount: u64) -> Action {
    Action::Mint(Mint {
        currency: "GOV".to_owned(),
        recipient: recipient.to_owned(),
        amount,
    })
}

#[test]
fn package_upgrade_runs_between_borrow_and_return() {
    let mut ledger = ledger();
    let id = propose(
        &mut ledger,
        1,
        ExecutionMode::Standard,
        &[
            borrow(CapabilityKind::PackageUpgrade),
            Action::AuthorizeUpgrade(AuthorizeUpgrade {
                package: "core".to_owned(),
                digest: [7; 32],
            }),
            Action::CommitUpgrade(CommitUpgrade {
                package: "core".to_owned(),
                version: 2,
            }),
            give_back(CapabilityKind::PackageUpgrade),
        ],
    );
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);

    let report = ledger.dispatch_at(id, at()).expect("dispatch");

    assert_eq!(report.actions_executed, 4);
    let core = ledger.world().packages.get("core").expect("core");
    assert_eq!(core.version, 2);
    assert_eq!(core.digest, [7; 32]);
    assert_eq!(core.pending, None);
    assert!(
        ledger
            .world()
            .capabilities
            .is_available(CapabilityKind::PackageUpgrade)
    );
}

#[test]
fn mint_runs_under_a_borrowed_authority() {
    let mut ledger = ledger();
    let id = propose(
        &mut ledger,
        1,
        ExecutionMode::Standard,
        &[
            borrow(CapabilityKind::MintAuthority),
            mint("carol", 100),
            give_back(CapabilityKind::MintAuthority),
        ],
    );
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);
    ledger.dispatch_at(id, at()).expect("dispatch");

    let gov = ledger.world().treasury.currency("GOV").expect("GOV");
    assert_eq!(gov.supply, 100);
    assert_eq!(gov.holders.get("carol"), Some(&100));
}

#[test]
fn mint_without_a_borrow_is_refused() {
    let mut ledger = ledger();
    let id = propose(&mut ledger, 2, ExecutionMode::Standard, &[mint("carol", 100)]);
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);
    let err = ledger.dispatch_at(id, at()).expect_err("unborrowed mint");
    assert_eq!(
        err,
        EngineError::Resource(ResourceError::CapabilityNotBorrowed(
            CapabilityKind::MintAuthority
        ))
    );
}

#[test]
fn unmatched_borrow_aborts_before_any_side_effect() {
    let mut ledger = ledger();
    let id = propose(
        &mut ledger,
        1,
        ExecutionMode::Standard,
        &[
            deposit(50),
            borrow(CapabilityKind::MintAuthority),
            mint("carol", 10),
            give_back(CapabilityKind::PackageUpgrade),
        ],
    );
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);
    let before = ledger.clone();

    let err = ledger.dispatch_at(id, at()).expect_err("no matching return");

    assert_eq!(
        err,
        EngineError::NoMatchingReturn {
            position: 1,
            capability: CapabilityKind::MintAuthority,
        }
    );
    assert_eq!(ledger, before);
    assert_eq!(
        ledger.world().treasury.vault_balance(VAULT),
        Some(VAULT_BALANCE)
    );
    assert!(
        ledger
            .world()
            .capabilities
            .is_available(CapabilityKind::MintAuthority)
    );
}

#[test]
fn nested_borrow_of_the_same_kind_fails_at_run_time() {
    let mut ledger = ledger();
    let id = propose(
        &mut ledger,
        1,
        ExecutionMode::Standard,
        &[
            borrow(CapabilityKind::MintAuthority),
            borrow(CapabilityKind::MintAuthority),
            give_back(CapabilityKind::MintAuthority),
            give_back(CapabilityKind::MintAuthority),
        ],
    );
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);

    let err = ledger.dispatch_at(id, at()).expect_err("already on loan");

    assert_eq!(
        err,
        EngineError::Resource(ResourceError::CapabilityUnavailable(
            CapabilityKind::MintAuthority
        ))
    );
    assert!(!ledger.registry().is_executed(id));
}

#[test]
fn commit_without_authorization_is_refused() {
    let mut ledger = ledger();
    let id = propose(
        &mut ledger,
        1,
        ExecutionMode::Standard,
        &[
            borrow(CapabilityKind::PackageUpgrade),
            Action::CommitUpgrade(CommitUpgrade {
                package: "core".to_owned(),
                version: 2,
            }),
            give_back(CapabilityKind::PackageUpgrade),
        ],
    );
    resolve(&mut ledger, id, OutcomeIndex::ACCEPT, [100, 150]);

    let err = ledger.dispatch_at(id, at()).expect_err("no ticket");

    assert!(matches!(
        err,
        EngineError::Resource(ResourceError::UpgradeNotAuthorized(ref name)) if name == "core"
    ));
    assert_eq!(
        ledger.world().packages.get("core").expect("core").version,
        1
    );
}
