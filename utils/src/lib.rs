//! Shared infrastructure utilities for Decree.
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename), used for
//!   the ledger snapshot.

pub mod atomic_write;

pub use atomic_write::{
    AtomicWriteOptions, PersistMode, atomic_write, atomic_write_with_options, read_recovering,
    recover_bak_file,
};
