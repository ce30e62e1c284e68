//! Executable cursor: the read position inside an intent during dispatch.
//!
//! The cursor only moves forward, one record per processed action. Executors
//! never see the cursor itself; they get a [`CurrentAction`] whose
//! [`CurrentAction::decode`] checks the type tag before touching the payload,
//! and only the dispatch loop may call [`ExecutableCursor::advance`].

use decree_types::{
    ActionKind, ActionPayload, ActionRecord, DecodeError, Intent, assert_action_type,
};

use crate::error::EngineError;

#[derive(Debug)]
pub struct ExecutableCursor<'a> {
    intent: &'a Intent,
    position: usize,
}

impl<'a> ExecutableCursor<'a> {
    #[must_use]
    pub fn new(intent: &'a Intent) -> Self {
        Self {
            intent,
            position: 0,
        }
    }

    #[must_use]
    pub fn intent(&self) -> &'a Intent {
        self.intent
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.intent.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intent.is_empty()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.intent.len()
    }

    /// The record at the current position. Does not move the cursor.
    pub fn current(&self) -> Result<CurrentAction<'a>, EngineError> {
        let record = self.intent.get(self.position).ok_or_else(|| self.exhausted())?;
        Ok(CurrentAction {
            record,
            position: self.position,
        })
    }

    /// Records after the current one, in execution order.
    #[must_use]
    pub fn upcoming(&self) -> &'a [ActionRecord] {
        let records = self.intent.records();
        records.get(self.position + 1..).unwrap_or(&[])
    }

    pub(crate) fn advance(&mut self) -> Result<(), EngineError> {
        if self.is_exhausted() {
            return Err(self.exhausted());
        }
        self.position += 1;
        Ok(())
    }

    fn exhausted(&self) -> EngineError {
        EngineError::CursorExhausted {
            position: self.position,
            len: self.intent.len(),
        }
    }
}

/// One record, as handed to an executor.
#[derive(Debug, Clone, Copy)]
pub struct CurrentAction<'a> {
    record: &'a ActionRecord,
    position: usize,
}

impl<'a> CurrentAction<'a> {
    #[must_use]
    pub fn record(&self) -> &'a ActionRecord {
        self.record
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> Result<ActionKind, EngineError> {
        self.record.kind().ok_or_else(|| {
            EngineError::Decode(DecodeError::UnknownActionType {
                tag: self.record.type_tag().clone(),
            })
        })
    }

    pub fn assert_type(&self, expected: ActionKind) -> Result<(), EngineError> {
        assert_action_type(self.record, expected)?;
        Ok(())
    }

    /// Assert the record is a `T` and decode it completely.
    pub fn decode<T: ActionPayload>(&self) -> Result<T, EngineError> {
        self.assert_type(T::KIND)?;
        Ok(decree_types::decode(self.record)?)
    }
}
