//! File-backed ledger snapshot.

use std::path::Path;

use anyhow::{Context, Result, bail};

use decree_engine::{EngineLimits, Ledger};
use decree_utils::{AtomicWriteOptions, atomic_write_with_options, read_recovering};

pub fn exists(path: &Path) -> bool {
    path.exists() || path.with_extension("bak").exists()
}

pub fn load(path: &Path, limits: EngineLimits) -> Result<Ledger> {
    let Some(bytes) = read_recovering(path)
        .with_context(|| format!("failed to read ledger {}", path.display()))?
    else {
        bail!(
            "no ledger at {}; run `decree init` first",
            path.display()
        );
    };
    let mut ledger: Ledger = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse ledger {}", path.display()))?;
    ledger.set_limits(limits);
    tracing::debug!(path = %path.display(), events = ledger.events().len(), "Ledger loaded");
    Ok(ledger)
}

pub fn save(path: &Path, ledger: &Ledger) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(ledger).context("failed to serialize ledger")?;
    bytes.push(b'\n');
    atomic_write_with_options(path, &bytes, AtomicWriteOptions::default())
        .with_context(|| format!("failed to write ledger {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Ledger saved");
    Ok(())
}
