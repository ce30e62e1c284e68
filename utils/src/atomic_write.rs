//! Crash-safe file persistence for ledger snapshots.
//!
//! Writes go to a temp file in the destination directory and are renamed over
//! the target. Where rename-over-existing fails, the old file is moved to a
//! backup with its extension replaced by `bak` (`ledger.json` becomes
//! `ledger.bak`) and restored if the second rename fails too;
//! [`recover_bak_file`] finishes that dance after a crash.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistMode {
    /// Inherit the process umask.
    #[default]
    Default,
    /// Owner read/write only (0o600 on Unix, ignored elsewhere).
    OwnerOnly,
}

impl PersistMode {
    #[cfg(unix)]
    fn unix_mode(self) -> Option<u32> {
        match self {
            Self::Default => None,
            Self::OwnerOnly => Some(0o600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomicWriteOptions {
    /// `fsync` the temp file before it replaces the target.
    pub sync_file: bool,
    /// Best-effort `fsync` of the parent directory after the rename.
    pub sync_parent_dir: bool,
    /// Create missing parent directories.
    pub create_parents: bool,
    pub mode: PersistMode,
}

impl Default for AtomicWriteOptions {
    fn default() -> Self {
        Self {
            sync_file: true,
            sync_parent_dir: false,
            create_parents: true,
            mode: PersistMode::OwnerOnly,
        }
    }
}

/// Restore the `bak` backup of `path` when `path` itself is missing.
///
/// Returns whether a backup was restored.
pub fn recover_bak_file(path: &Path) -> bool {
    let backup = path.with_extension("bak");
    if path.exists() || !backup.exists() {
        return false;
    }
    match fs::rename(&backup, path) {
        Ok(()) => {
            tracing::warn!(
                path = %path.display(),
                "Recovered .bak file from interrupted atomic write"
            );
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "Failed to recover .bak file: {e}");
            false
        }
    }
}

/// Read a file written by [`atomic_write`], recovering a leftover backup
/// first. A missing file is `Ok(None)`.
pub fn read_recovering(path: &Path) -> io::Result<Option<Vec<u8>>> {
    recover_bak_file(path);
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    atomic_write_with_options(path, bytes, AtomicWriteOptions::default())
}

pub fn atomic_write_with_options(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: AtomicWriteOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if options.create_parents {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = NamedTempFile::new_in(parent)?;
    set_mode(tmp.path(), options.mode)?;
    tmp.write_all(bytes)?;
    if options.sync_file {
        tmp.as_file().sync_all()?;
    }

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        let backup = path.with_extension("bak");
        let _ = fs::remove_file(&backup);
        fs::rename(path, &backup)?;
        if let Err(retry) = err.file.persist(path) {
            let _ = fs::rename(&backup, path);
            return Err(retry.error);
        }
        if let Err(e) = fs::remove_file(&backup) {
            tracing::warn!(path = %backup.display(), "Failed to remove .bak after atomic write: {e}");
        }
    }
    set_mode(path, options.mode)?;

    if options.sync_parent_dir
        && let Err(e) = File::open(parent).and_then(|dir| dir.sync_all())
    {
        tracing::debug!(path = %parent.display(), "Parent directory sync failed (best-effort): {e}");
    }
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: PersistMode) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    match mode.unix_mode() {
        Some(bits) => fs::set_permissions(path, fs::Permissions::from_mode(bits)),
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: PersistMode) -> io::Result<()> {
    Ok(())
}
