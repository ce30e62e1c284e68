use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use super::ActionKind;
use crate::codec::ActionPayload;
use crate::record::FormatVersion;

/// Replace organization metadata. `None` leaves a field as it is.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct UpdateMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
}

impl ActionPayload for UpdateMetadata {
    const KIND: ActionKind = ActionKind::UpdateMetadata;
    const VERSION: FormatVersion = FormatVersion::V1;
}

/// Adjust market parameters used for future proposals. `None` leaves a field as it is.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct UpdateTradingParams {
    #[serde(default)]
    pub min_liquidity: Option<u64>,
    #[serde(default)]
    pub review_period_ms: Option<u64>,
    #[serde(default)]
    pub trading_period_ms: Option<u64>,
    #[serde(default)]
    pub twap_start_delay_ms: Option<u64>,
}

impl ActionPayload for UpdateTradingParams {
    const KIND: ActionKind = ActionKind::UpdateTradingParams;
    const VERSION: FormatVersion = FormatVersion::V1;
}
