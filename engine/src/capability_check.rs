//! Borrow/return matching across an action sequence.
//!
//! Every `BorrowCapability` at position `i` needs a `ReturnCapability` of the
//! same kind at some position after `i`. The check is a forward scan over the
//! stored records and is re-run on every dispatch.

use decree_types::{
    ActionKind, ActionRecord, BorrowCapability, CapabilityKind, Intent, ReturnCapability, decode,
};

use crate::error::EngineError;

/// Check every borrow in `intent` before any action runs.
pub fn check_intent(intent: &Intent) -> Result<(), EngineError> {
    let records = intent.records();
    for (position, record) in records.iter().enumerate() {
        if record.kind() != Some(ActionKind::BorrowCapability) {
            continue;
        }
        let borrow: BorrowCapability = decode(record)?;
        require_return(&records[position + 1..], borrow.capability, position)?;
    }
    Ok(())
}

/// Scan `upcoming` for a return of `capability` borrowed at `position`.
pub fn require_return(
    upcoming: &[ActionRecord],
    capability: CapabilityKind,
    position: usize,
) -> Result<(), EngineError> {
    for record in upcoming {
        if record.kind() != Some(ActionKind::ReturnCapability) {
            continue;
        }
        let ret: ReturnCapability = decode(record)?;
        if ret.capability == capability {
            return Ok(());
        }
    }
    Err(EngineError::NoMatchingReturn {
        position,
        capability,
    })
}
