//! The persisted action record: type tag, format version, payload bytes.
//!
//! The record layout is the only serialized artifact the engine defines. Once a
//! record of some `(tag, version)` exists in storage, that payload layout is
//! frozen; evolution happens by adding a new version, never by editing one.

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;
use crate::codec::{DecodeError, EncodeError, decode_exact};

/// Stable identifier of an action shape, e.g. `decree::treasury::withdraw`.
///
/// Stored as an owned string so records carrying tags this build does not know
/// still load; they fail later at decode time.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The catalog entry this tag names, if any.
    #[must_use]
    pub fn kind(&self) -> Option<ActionKind> {
        ActionKind::from_tag(&self.0)
    }
}

impl From<ActionKind> for TypeTag {
    fn from(kind: ActionKind) -> Self {
        Self(kind.tag().to_owned())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
#[serde(transparent)]
pub struct FormatVersion(u16);

impl FormatVersion {
    pub const V1: Self = Self(1);
    pub const V2: Self = Self(2);

    #[must_use]
    pub const fn new(version: u16) -> Self {
        Self(version)
    }

    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A type-tagged, versioned, binary-encoded unit of work.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct ActionRecord {
    type_tag: TypeTag,
    format_version: FormatVersion,
    #[serde(with = "payload_base64")]
    payload: Vec<u8>,
}

impl ActionRecord {
    /// Assemble a record from raw parts without looking at the payload.
    ///
    /// Used when loading records produced elsewhere; nothing is validated until
    /// the record is decoded.
    pub fn from_parts(type_tag: TypeTag, format_version: FormatVersion, payload: Vec<u8>) -> Self {
        Self {
            type_tag,
            format_version,
            payload,
        }
    }

    #[must_use]
    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    #[must_use]
    pub fn format_version(&self) -> FormatVersion {
        self.format_version
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[must_use]
    pub fn kind(&self) -> Option<ActionKind> {
        self.type_tag.kind()
    }

    /// Binary envelope: tag, version, then the length-prefixed payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        Ok(borsh::to_vec(self)?)
    }

    /// Parse an envelope produced by [`ActionRecord::to_bytes`].
    ///
    /// Extra bytes after the envelope are rejected with `TrailingBytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        decode_exact(bytes)
    }
}

mod payload_base64 {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub(super) fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(de::Error::custom)
    }
}
