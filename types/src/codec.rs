//! Typed encode/decode between action payloads and [`ActionRecord`]s.
//!
//! Payload layout is Borsh: fields in declaration order, fixed-width
//! little-endian integers, `Option` as a one-byte presence flag followed by the
//! value, strings and vectors prefixed with a `u32` length. A decode that stops
//! before the end of the payload is an error, never a partial success.

use std::io;

use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;

use crate::actions::ActionKind;
use crate::record::{ActionRecord, FormatVersion, TypeTag};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown action type {tag}")]
    UnknownActionType { tag: TypeTag },
    #[error("expected action type {expected}, found {found}")]
    WrongActionType { expected: TypeTag, found: TypeTag },
    #[error("unsupported format version {version} for {tag}")]
    UnsupportedVersion { tag: TypeTag, version: FormatVersion },
    #[error("payload has {remaining} trailing byte(s) after the last field")]
    TrailingBytes { remaining: usize },
    #[error("malformed payload: {reason}")]
    Malformed { reason: String },
}

#[derive(Debug, Error)]
#[error("failed to encode payload: {0}")]
pub struct EncodeError(#[from] io::Error);

/// A payload shape with a fixed type tag and a current format version.
///
/// `VERSION` is the layout `encode` writes. Older layouts a kind still accepts
/// are handled by [`ActionPayload::decode_legacy`].
pub trait ActionPayload: BorshSerialize + BorshDeserialize + Sized {
    const KIND: ActionKind;
    const VERSION: FormatVersion;

    /// Decode a payload written under an older, frozen layout.
    fn decode_legacy(version: FormatVersion, _payload: &[u8]) -> Result<Self, DecodeError> {
        Err(DecodeError::UnsupportedVersion {
            tag: TypeTag::from(Self::KIND),
            version,
        })
    }
}

/// Encode `action` under its type tag and current format version.
pub fn encode<T: ActionPayload>(action: &T) -> Result<ActionRecord, EncodeError> {
    let payload = borsh::to_vec(action)?;
    Ok(ActionRecord::from_parts(
        TypeTag::from(T::KIND),
        T::VERSION,
        payload,
    ))
}

/// Decode `record` as `T`, checking tag, version and full consumption.
pub fn decode<T: ActionPayload>(record: &ActionRecord) -> Result<T, DecodeError> {
    assert_action_type(record, T::KIND)?;

    let version = record.format_version();
    if version == T::VERSION {
        return decode_exact(record.payload());
    }
    if !T::KIND.supports(version) {
        return Err(DecodeError::UnsupportedVersion {
            tag: record.type_tag().clone(),
            version,
        });
    }
    T::decode_legacy(version, record.payload())
}

/// Fail with `WrongActionType` unless `record` carries the tag of `expected`.
pub fn assert_action_type(record: &ActionRecord, expected: ActionKind) -> Result<(), DecodeError> {
    if record.type_tag().as_str() == expected.tag() {
        return Ok(());
    }
    Err(DecodeError::WrongActionType {
        expected: TypeTag::from(expected),
        found: record.type_tag().clone(),
    })
}

/// Deserialize `bytes` as `T` and require that nothing is left over.
pub fn decode_exact<T: BorshDeserialize>(bytes: &[u8]) -> Result<T, DecodeError> {
    let mut rest = bytes;
    let value = T::deserialize(&mut rest).map_err(|err| DecodeError::Malformed {
        reason: err.to_string(),
    })?;
    if !rest.is_empty() {
        return Err(DecodeError::TrailingBytes {
            remaining: rest.len(),
        });
    }
    Ok(value)
}
