//! In-memory resource modules the action executors call into.
//!
//! Each module validates its own preconditions and reports refusals as
//! [`ResourceError`](crate::ResourceError). None of them know about proposals,
//! cursors or intents.

mod capability;
mod document;
mod package;
mod settings;
mod stream;
mod treasury;

use serde::{Deserialize, Serialize};

pub use capability::{CapabilityLoan, CapabilityLocker};
pub use document::{Document, DocumentStore, Line};
pub use package::{Package, PackageRegistry};
pub use settings::{DaoSettings, Metadata, TradingParams};
pub use stream::{Stream, StreamBook};
pub use treasury::{Currency, Treasury};

/// Every resource an intent can touch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct World {
    pub treasury: Treasury,
    pub settings: DaoSettings,
    pub streams: StreamBook,
    pub documents: DocumentStore,
    pub capabilities: CapabilityLocker,
    pub packages: PackageRegistry,
}
