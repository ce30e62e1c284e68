//! End-to-end runs of the `decree` binary against a ledger in a temp dir.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use decree_engine::{EngineEvent, Ledger};
use tempfile::TempDir;

use crate::common::world;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("config.toml"),
            "[engine]\nmax_outcomes = 4\n\n[log]\nfilter = \"warn\"\n",
        )
        .expect("write config");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).expect("write fixture");
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_decree"))
            .arg("--ledger")
            .arg(self.path("ledger.json"))
            .arg("--config")
            .arg(self.path("config.toml"))
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .expect("run decree")
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "decree {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("utf-8 stdout")
    }

    fn fail(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(!output.status.success(), "decree {args:?} unexpectedly succeeded");
        String::from_utf8(output.stderr).expect("utf-8 stderr")
    }

    fn ledger(&self) -> Ledger {
        let bytes = fs::read(self.path("ledger.json")).expect("read ledger");
        serde_json::from_slice(&bytes).expect("parse ledger")
    }

    fn seed(&self) {
        self.ok(&["init"]);
        let world = serde_json::to_string_pretty(&world()).expect("serialize world");
        let world = self.write("world.json", &world);
        self.ok(&["seed", path_str(&world)]);
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

const WITHDRAW_PROPOSAL: &str = r#"{
    "id": 1,
    "outcomes": [
        [],
        [{"type": "withdraw", "vault": "ops", "recipient": "carol", "amount": 25}]
    ]
}"#;

const GATED_PROPOSAL: &str = r#"{
    "id": 2,
    "mode": "difficulty_gated",
    "outcomes": [
        [],
        [{"type": "remove_line", "document": "charter", "line_id": 1}]
    ]
}"#;

#[test]
fn full_lifecycle_through_the_binary() {
    let ws = Workspace::new();
    let out = ws.ok(&["init"]);
    assert!(out.contains("initialized empty ledger"));
    let err = ws.fail(&["init"]);
    assert!(err.contains("already exists"), "{err}");

    let world = serde_json::to_string(&world()).expect("serialize world");
    let world = ws.write("world.json", &world);
    ws.ok(&["seed", path_str(&world)]);

    let proposal = ws.write("proposal.json", WITHDRAW_PROPOSAL);
    let out = ws.ok(&["propose", path_str(&proposal)]);
    assert_eq!(out.trim(), "registered proposal 1 with 2 outcomes");

    let err = ws.fail(&["dispatch", "1"]);
    assert!(err.contains("proposal 1 is not resolved"), "{err}");

    let out = ws.ok(&["resolve", "1", "--winner", "1", "--twap", "100,150"]);
    assert_eq!(out.trim(), "proposal 1 is resolved");

    let out = ws.ok(&["dispatch", "1"]);
    assert_eq!(out.trim(), "dispatched proposal 1 outcome 1: 1 action(s)");

    let err = ws.fail(&["dispatch", "1"]);
    assert!(err.contains("already executed"), "{err}");

    let out = ws.ok(&["show", "1"]);
    assert!(out.starts_with("proposal 1: executed (standard, 2 outcomes)"), "{out}");
    assert!(
        out.contains("[0] decree::treasury::withdraw (v2): vault=ops, recipient=carol, amount=25"),
        "{out}"
    );

    let out = ws.ok(&["events"]);
    let names: Vec<String> = out
        .lines()
        .map(|line| {
            serde_json::from_str::<EngineEvent>(line)
                .expect("event json")
                .name()
                .to_owned()
        })
        .collect();
    assert_eq!(
        names,
        vec!["intents_registered", "proposal_resolved", "dispatched"]
    );

    let ledger = ws.ledger();
    assert_eq!(ledger.world().treasury.account_balance("carol"), 25);
}

#[test]
fn thin_margin_leaves_the_ledger_untouched_and_can_be_retried() {
    let ws = Workspace::new();
    ws.seed();
    let proposal = ws.write("proposal.json", GATED_PROPOSAL);
    ws.ok(&["propose", path_str(&proposal)]);
    ws.ok(&["resolve", "2", "--winner", "1", "--twap", "100,110"]);
    let before = fs::read(ws.path("ledger.json")).expect("read ledger");

    let err = ws.fail(&["dispatch", "2"]);
    assert!(err.contains("it may be retried"), "{err}");
    assert_eq!(fs::read(ws.path("ledger.json")).expect("read ledger"), before);

    ws.ok(&["resolve", "2", "--winner", "1", "--twap", "100,150"]);
    let out = ws.ok(&["dispatch", "2"]);
    assert!(out.contains("gate: difficulty 20000bp cleared"), "{out}");
    assert!(out.contains("edited document charter"), "{out}");

    let ledger = ws.ledger();
    let charter = ledger.world().documents.document("charter").expect("charter");
    assert_eq!(charter.lines().len(), 2);
}

#[test]
fn config_limits_apply_to_registration() {
    let ws = Workspace::new();
    ws.seed();
    let proposal = ws.write(
        "wide.json",
        r#"{"id": 3, "outcomes": [[], [], [], [], []]}"#,
    );

    let err = ws.fail(&["propose", path_str(&proposal)]);
    assert!(err.contains("outcome count 5 must be between 2 and 4"), "{err}");
    assert!(ws.ledger().proposals().next().is_none());
}

#[test]
fn commands_need_an_initialized_ledger() {
    let ws = Workspace::new();
    let err = ws.fail(&["events"]);
    assert!(err.contains("run `decree init` first"), "{err}");
}

#[test]
fn pending_resolution_does_not_unlock_dispatch() {
    let ws = Workspace::new();
    ws.seed();
    let proposal = ws.write("proposal.json", WITHDRAW_PROPOSAL);
    ws.ok(&["propose", path_str(&proposal)]);

    let out = ws.ok(&["resolve", "1", "--winner", "1", "--twap", "100,150", "--pending"]);
    assert_eq!(out.trim(), "proposal 1 is registered");
    let err = ws.fail(&["dispatch", "1"]);
    assert!(err.contains("not resolved"), "{err}");
}
