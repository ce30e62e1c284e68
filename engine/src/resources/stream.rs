//! Payment streams funded from a vault.
//!
//! Creating a stream escrows `amount_per_period * periods` out of the vault
//! up front; cancelling refunds whatever is still escrowed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use decree_types::{CreateStream, StreamId};

use super::treasury::Treasury;
use crate::error::ResourceError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub vault: String,
    pub recipient: String,
    pub amount_per_period: u64,
    pub period_ms: u64,
    pub periods: u32,
    pub escrow: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamBook {
    next_id: u64,
    streams: BTreeMap<StreamId, Stream>,
}

impl StreamBook {
    #[must_use]
    pub fn get(&self, id: StreamId) -> Option<&Stream> {
        self.streams.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn create(
        &mut self,
        treasury: &mut Treasury,
        request: CreateStream,
    ) -> Result<StreamId, ResourceError> {
        if request.amount_per_period == 0 || request.period_ms == 0 || request.periods == 0 {
            return Err(ResourceError::InvalidStream);
        }
        let escrow = request
            .amount_per_period
            .checked_mul(u64::from(request.periods))
            .ok_or(ResourceError::Overflow("stream escrow"))?;
        treasury.take(&request.vault, escrow)?;

        let id = StreamId::new(self.next_id);
        self.next_id += 1;
        self.streams.insert(
            id,
            Stream {
                vault: request.vault,
                recipient: request.recipient,
                amount_per_period: request.amount_per_period,
                period_ms: request.period_ms,
                periods: request.periods,
                escrow,
            },
        );
        Ok(id)
    }

    /// Remove the stream and refund its escrow to the funding vault.
    pub fn cancel(
        &mut self,
        treasury: &mut Treasury,
        id: StreamId,
    ) -> Result<Stream, ResourceError> {
        let stream = self
            .streams
            .remove(&id)
            .ok_or(ResourceError::UnknownStream(id))?;
        treasury.deposit(&stream.vault, stream.escrow)?;
        Ok(stream)
    }
}
