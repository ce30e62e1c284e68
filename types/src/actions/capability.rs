//! Capability borrow/return markers and the privileged upgrade actions.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use super::ActionKind;
use crate::codec::ActionPayload;
use crate::ids::CapabilityKind;
use crate::record::FormatVersion;

/// Take a capability out of the locker for the rest of the intent.
///
/// Every borrow must be followed, later in the same intent, by a
/// [`ReturnCapability`] of the same kind.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct BorrowCapability {
    pub capability: CapabilityKind,
}

impl ActionPayload for BorrowCapability {
    const KIND: ActionKind = ActionKind::BorrowCapability;
    const VERSION: FormatVersion = FormatVersion::V1;
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct ReturnCapability {
    pub capability: CapabilityKind,
}

impl ActionPayload for ReturnCapability {
    const KIND: ActionKind = ActionKind::ReturnCapability;
    const VERSION: FormatVersion = FormatVersion::V1;
}

/// Authorize an upgrade of `package` to the build identified by `digest`.
/// Requires a borrowed `PackageUpgrade` capability.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct AuthorizeUpgrade {
    pub package: String,
    pub digest: [u8; 32],
}

impl ActionPayload for AuthorizeUpgrade {
    const KIND: ActionKind = ActionKind::AuthorizeUpgrade;
    const VERSION: FormatVersion = FormatVersion::V1;
}

/// Commit a previously authorized upgrade, bumping the package to `version`.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct CommitUpgrade {
    pub package: String,
    pub version: u64,
}

impl ActionPayload for CommitUpgrade {
    const KIND: ActionKind = ActionKind::CommitUpgrade;
    const VERSION: FormatVersion = FormatVersion::V1;
}
