//! Intents: the immutable, ordered action sequence bound to one proposal outcome.

use std::slice;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::codec::{ActionPayload, EncodeError, encode};
use crate::ids::ProposalId;
use crate::record::ActionRecord;

/// What happens if one outcome of a proposal wins.
///
/// Built once at proposal creation and never edited: there is no API to
/// append, remove or reorder records after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    owner: ProposalId,
    records: Vec<ActionRecord>,
}

impl Intent {
    /// Bind already-encoded records to `owner`, preserving their order.
    ///
    /// Records are not decoded here; the type tag is trusted until execution.
    #[must_use]
    pub fn build(owner: ProposalId, records: Vec<ActionRecord>) -> Self {
        Self { owner, records }
    }

    #[must_use]
    pub fn empty(owner: ProposalId) -> Self {
        Self::build(owner, Vec::new())
    }

    #[must_use]
    pub fn owner(&self) -> ProposalId {
        self.owner
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&ActionRecord> {
        self.records.get(position)
    }

    pub fn iter(&self) -> slice::Iter<'_, ActionRecord> {
        self.records.iter()
    }

    /// SHA-256 over the binary envelope of every record, in order.
    pub fn digest(&self) -> Result<[u8; 32], EncodeError> {
        let mut hasher = Sha256::new();
        hasher.update(self.owner.value().to_le_bytes());
        hasher.update((self.records.len() as u64).to_le_bytes());
        for record in &self.records {
            hasher.update(record.to_bytes()?);
        }
        Ok(hasher.finalize().into())
    }
}

impl<'a> IntoIterator for &'a Intent {
    type Item = &'a ActionRecord;
    type IntoIter = slice::Iter<'a, ActionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Encodes typed payloads in order and seals them into an [`Intent`].
#[derive(Debug)]
pub struct IntentBuilder {
    owner: ProposalId,
    records: Vec<ActionRecord>,
}

impl IntentBuilder {
    #[must_use]
    pub fn new(owner: ProposalId) -> Self {
        Self {
            owner,
            records: Vec::new(),
        }
    }

    pub fn push<T: ActionPayload>(mut self, action: &T) -> Result<Self, EncodeError> {
        self.records.push(encode(action)?);
        Ok(self)
    }

    #[must_use]
    pub fn push_record(mut self, record: ActionRecord) -> Self {
        self.records.push(record);
        self
    }

    #[must_use]
    pub fn build(self) -> Intent {
        Intent::build(self.owner, self.records)
    }
}
