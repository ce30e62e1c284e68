use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use super::ActionKind;
use crate::codec::{ActionPayload, DecodeError, decode_exact};
use crate::record::FormatVersion;

/// Credit `amount` to a treasury vault.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Deposit {
    pub vault: String,
    pub amount: u64,
}

impl ActionPayload for Deposit {
    const KIND: ActionKind = ActionKind::Deposit;
    const VERSION: FormatVersion = FormatVersion::V1;
}

/// Pay `amount` out of a vault to an external recipient.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Withdraw {
    pub vault: String,
    pub recipient: String,
    pub amount: u64,
    #[serde(default)]
    pub memo: Option<String>,
}

/// Frozen version-1 layout of [`Withdraw`], before `memo` existed.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct WithdrawV1 {
    pub vault: String,
    pub recipient: String,
    pub amount: u64,
}

impl From<WithdrawV1> for Withdraw {
    fn from(legacy: WithdrawV1) -> Self {
        Self {
            vault: legacy.vault,
            recipient: legacy.recipient,
            amount: legacy.amount,
            memo: None,
        }
    }
}

impl ActionPayload for Withdraw {
    const KIND: ActionKind = ActionKind::Withdraw;
    const VERSION: FormatVersion = FormatVersion::V2;

    fn decode_legacy(version: FormatVersion, payload: &[u8]) -> Result<Self, DecodeError> {
        if version == FormatVersion::V1 {
            return decode_exact::<WithdrawV1>(payload).map(Self::from);
        }
        Err(DecodeError::UnsupportedVersion {
            tag: Self::KIND.into(),
            version,
        })
    }
}

/// Mint new units of a currency to a recipient. Requires a borrowed
/// `MintAuthority` capability.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Mint {
    pub currency: String,
    pub recipient: String,
    pub amount: u64,
}

impl ActionPayload for Mint {
    const KIND: ActionKind = ActionKind::Mint;
    const VERSION: FormatVersion = FormatVersion::V1;
}
