use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use super::ActionKind;
use crate::codec::ActionPayload;
use crate::ids::StreamId;
use crate::record::FormatVersion;

/// Open a payment stream funded out of a vault.
///
/// The full `amount_per_period * periods` is escrowed when the stream opens.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct CreateStream {
    pub vault: String,
    pub recipient: String,
    pub amount_per_period: u64,
    pub period_ms: u64,
    pub periods: u32,
}

impl ActionPayload for CreateStream {
    const KIND: ActionKind = ActionKind::CreateStream;
    const VERSION: FormatVersion = FormatVersion::V1;
}

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct CancelStream {
    pub stream_id: StreamId,
}

impl ActionPayload for CancelStream {
    const KIND: ActionKind = ActionKind::CancelStream;
    const VERSION: FormatVersion = FormatVersion::V1;
}
