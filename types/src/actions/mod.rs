//! The closed catalog of action shapes.
//!
//! Actions are not code: each is a record shape with a stable type tag and a
//! set of frozen format versions. [`Action`] is the tagged union over all of
//! them, decoded by a single match on `(kind, version)`.

mod capability;
mod config;
mod document;
mod stream;
mod treasury;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use capability::{AuthorizeUpgrade, BorrowCapability, CommitUpgrade, ReturnCapability};
pub use config::{UpdateMetadata, UpdateTradingParams};
pub use document::{InsertLine, RemoveLine, UpdateLine};
pub use stream::{CancelStream, CreateStream};
pub use treasury::{Deposit, Mint, Withdraw, WithdrawV1};

use crate::codec::{DecodeError, EncodeError, decode_exact, encode};
use crate::record::{ActionRecord, FormatVersion};

const V1_ONLY: &[FormatVersion] = &[FormatVersion::V1];
const V1_V2: &[FormatVersion] = &[FormatVersion::V1, FormatVersion::V2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    Treasury,
    Config,
    Stream,
    Document,
    Capability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Deposit,
    Withdraw,
    Mint,
    UpdateMetadata,
    UpdateTradingParams,
    CreateStream,
    CancelStream,
    InsertLine,
    UpdateLine,
    RemoveLine,
    BorrowCapability,
    AuthorizeUpgrade,
    CommitUpgrade,
    ReturnCapability,
}

impl ActionKind {
    pub const ALL: [Self; 14] = [
        Self::Deposit,
        Self::Withdraw,
        Self::Mint,
        Self::UpdateMetadata,
        Self::UpdateTradingParams,
        Self::CreateStream,
        Self::CancelStream,
        Self::InsertLine,
        Self::UpdateLine,
        Self::RemoveLine,
        Self::BorrowCapability,
        Self::AuthorizeUpgrade,
        Self::CommitUpgrade,
        Self::ReturnCapability,
    ];

    /// Stable type tag written into every record of this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Deposit => "decree::treasury::deposit",
            Self::Withdraw => "decree::treasury::withdraw",
            Self::Mint => "decree::treasury::mint",
            Self::UpdateMetadata => "decree::config::update_metadata",
            Self::UpdateTradingParams => "decree::config::update_trading_params",
            Self::CreateStream => "decree::stream::create",
            Self::CancelStream => "decree::stream::cancel",
            Self::InsertLine => "decree::document::insert_line",
            Self::UpdateLine => "decree::document::update_line",
            Self::RemoveLine => "decree::document::remove_line",
            Self::BorrowCapability => "decree::capability::borrow",
            Self::AuthorizeUpgrade => "decree::capability::authorize_upgrade",
            Self::CommitUpgrade => "decree::capability::commit_upgrade",
            Self::ReturnCapability => "decree::capability::return",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    #[must_use]
    pub const fn category(self) -> ActionCategory {
        match self {
            Self::Deposit | Self::Withdraw | Self::Mint => ActionCategory::Treasury,
            Self::UpdateMetadata | Self::UpdateTradingParams => ActionCategory::Config,
            Self::CreateStream | Self::CancelStream => ActionCategory::Stream,
            Self::InsertLine | Self::UpdateLine | Self::RemoveLine => ActionCategory::Document,
            Self::BorrowCapability
            | Self::AuthorizeUpgrade
            | Self::CommitUpgrade
            | Self::ReturnCapability => ActionCategory::Capability,
        }
    }

    /// Every format version this build can decode for the kind, oldest first.
    #[must_use]
    pub const fn versions(self) -> &'static [FormatVersion] {
        match self {
            Self::Withdraw => V1_V2,
            _ => V1_ONLY,
        }
    }

    #[must_use]
    pub fn supports(self, version: FormatVersion) -> bool {
        self.versions().contains(&version)
    }

    #[must_use]
    pub fn is_document_edit(self) -> bool {
        self.category() == ActionCategory::Document
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Any action in the catalog, decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Deposit(Deposit),
    Withdraw(Withdraw),
    Mint(Mint),
    UpdateMetadata(UpdateMetadata),
    UpdateTradingParams(UpdateTradingParams),
    CreateStream(CreateStream),
    CancelStream(CancelStream),
    InsertLine(InsertLine),
    UpdateLine(UpdateLine),
    RemoveLine(RemoveLine),
    BorrowCapability(BorrowCapability),
    AuthorizeUpgrade(AuthorizeUpgrade),
    CommitUpgrade(CommitUpgrade),
    ReturnCapability(ReturnCapability),
}

impl Action {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Deposit(_) => ActionKind::Deposit,
            Self::Withdraw(_) => ActionKind::Withdraw,
            Self::Mint(_) => ActionKind::Mint,
            Self::UpdateMetadata(_) => ActionKind::UpdateMetadata,
            Self::UpdateTradingParams(_) => ActionKind::UpdateTradingParams,
            Self::CreateStream(_) => ActionKind::CreateStream,
            Self::CancelStream(_) => ActionKind::CancelStream,
            Self::InsertLine(_) => ActionKind::InsertLine,
            Self::UpdateLine(_) => ActionKind::UpdateLine,
            Self::RemoveLine(_) => ActionKind::RemoveLine,
            Self::BorrowCapability(_) => ActionKind::BorrowCapability,
            Self::AuthorizeUpgrade(_) => ActionKind::AuthorizeUpgrade,
            Self::CommitUpgrade(_) => ActionKind::CommitUpgrade,
            Self::ReturnCapability(_) => ActionKind::ReturnCapability,
        }
    }

    /// Encode under the kind's current format version.
    pub fn encode(&self) -> Result<ActionRecord, EncodeError> {
        match self {
            Self::Deposit(a) => encode(a),
            Self::Withdraw(a) => encode(a),
            Self::Mint(a) => encode(a),
            Self::UpdateMetadata(a) => encode(a),
            Self::UpdateTradingParams(a) => encode(a),
            Self::CreateStream(a) => encode(a),
            Self::CancelStream(a) => encode(a),
            Self::InsertLine(a) => encode(a),
            Self::UpdateLine(a) => encode(a),
            Self::RemoveLine(a) => encode(a),
            Self::BorrowCapability(a) => encode(a),
            Self::AuthorizeUpgrade(a) => encode(a),
            Self::CommitUpgrade(a) => encode(a),
            Self::ReturnCapability(a) => encode(a),
        }
    }

    /// Decode any catalog record.
    ///
    /// Legacy layouts are upgraded to the current in-memory shape.
    pub fn decode(record: &ActionRecord) -> Result<Self, DecodeError> {
        let kind = record
            .kind()
            .ok_or_else(|| DecodeError::UnknownActionType {
                tag: record.type_tag().clone(),
            })?;
        let payload = record.payload();

        let action = match (kind, record.format_version().value()) {
            (ActionKind::Deposit, 1) => Self::Deposit(decode_exact(payload)?),
            (ActionKind::Withdraw, 1) => {
                Self::Withdraw(decode_exact::<WithdrawV1>(payload)?.into())
            }
            (ActionKind::Withdraw, 2) => Self::Withdraw(decode_exact(payload)?),
            (ActionKind::Mint, 1) => Self::Mint(decode_exact(payload)?),
            (ActionKind::UpdateMetadata, 1) => Self::UpdateMetadata(decode_exact(payload)?),
            (ActionKind::UpdateTradingParams, 1) => {
                Self::UpdateTradingParams(decode_exact(payload)?)
            }
            (ActionKind::CreateStream, 1) => Self::CreateStream(decode_exact(payload)?),
            (ActionKind::CancelStream, 1) => Self::CancelStream(decode_exact(payload)?),
            (ActionKind::InsertLine, 1) => Self::InsertLine(decode_exact(payload)?),
            (ActionKind::UpdateLine, 1) => Self::UpdateLine(decode_exact(payload)?),
            (ActionKind::RemoveLine, 1) => Self::RemoveLine(decode_exact(payload)?),
            (ActionKind::BorrowCapability, 1) => Self::BorrowCapability(decode_exact(payload)?),
            (ActionKind::AuthorizeUpgrade, 1) => Self::AuthorizeUpgrade(decode_exact(payload)?),
            (ActionKind::CommitUpgrade, 1) => Self::CommitUpgrade(decode_exact(payload)?),
            (ActionKind::ReturnCapability, 1) => Self::ReturnCapability(decode_exact(payload)?),
            _ => {
                return Err(DecodeError::UnsupportedVersion {
                    tag: record.type_tag().clone(),
                    version: record.format_version(),
                });
            }
        };
        Ok(action)
    }
}
