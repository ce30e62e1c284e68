//! Edits against named documents (operating agreements, charters).
//!
//! Only insertions carry a difficulty. Updates and removals inherit the
//! difficulty of the line they target, read at execution time.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use super::ActionKind;
use crate::codec::ActionPayload;
use crate::ids::LineId;
use crate::record::FormatVersion;

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct InsertLine {
    pub document: String,
    /// Zero-based index the new line occupies after insertion.
    pub position: u32,
    pub text: String,
    /// Basis points over `BASIS_POINTS`; stored on the line once inserted.
    pub difficulty: u64,
}

impl ActionPayload for InsertLine {
    const KIND: ActionKind = ActionKind::InsertLine;
    const VERSION: FormatVersion = FormatVersion::V1;
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct UpdateLine {
    pub document: String,
    pub line_id: LineId,
    pub text: String,
}

impl ActionPayload for UpdateLine {
    const KIND: ActionKind = ActionKind::UpdateLine;
    const VERSION: FormatVersion = FormatVersion::V1;
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct RemoveLine {
    pub document: String,
    pub line_id: LineId,
}

impl ActionPayload for RemoveLine {
    const KIND: ActionKind = ActionKind::RemoveLine;
    const VERSION: FormatVersion = FormatVersion::V1;
}
