//! Difficulty-gated batch execution for document edits.
//!
//! The batch's difficulty is the largest difficulty among the lines it
//! touches: the stored difficulty for updates and removals, the proposed
//! difficulty for inserts. The whole batch runs only if the winning price
//! clears the reject price by that margin; otherwise nothing is applied.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use decree_types::{
    ActionKind, Difficulty, InsertLine, Intent, PricePair, RemoveLine, UpdateLine, decode,
};

use crate::error::EngineError;
use crate::executors::run_intent;
use crate::resources::{DocumentStore, World};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateReport {
    pub max_difficulty: Difficulty,
    pub prices: PricePair,
    pub edits_applied: usize,
    /// Documents the batch touched, in name order.
    pub documents: Vec<String>,
}

/// Largest difficulty among the edits in `batch`, measured against the
/// current state of `documents`.
///
/// Line difficulty is fixed at insert time and never raised by an update, so
/// an update is priced at the line's stored difficulty.
pub fn max_difficulty(
    batch: &Intent,
    documents: &DocumentStore,
) -> Result<Difficulty, EngineError> {
    let mut max = Difficulty::ZERO;
    for (position, record) in batch.iter().enumerate() {
        let difficulty = match record.kind() {
            Some(ActionKind::InsertLine) => {
                Difficulty::new(decode::<InsertLine>(record)?.difficulty)
            }
            Some(ActionKind::UpdateLine) => {
                let edit: UpdateLine = decode(record)?;
                documents.line(&edit.document, edit.line_id)?.difficulty
            }
            Some(ActionKind::RemoveLine) => {
                let edit: RemoveLine = decode(record)?;
                documents.line(&edit.document, edit.line_id)?.difficulty
            }
            _ => {
                return Err(EngineError::NotADocumentEdit {
                    position,
                    tag: record.type_tag().clone(),
                });
            }
        };
        max = max.max(difficulty);
    }
    Ok(max)
}

/// Names of the documents `batch` edits.
pub fn touched_documents(batch: &Intent) -> Result<Vec<String>, EngineError> {
    let mut names = BTreeSet::new();
    for record in batch {
        let name = match record.kind() {
            Some(ActionKind::InsertLine) => decode::<InsertLine>(record)?.document,
            Some(ActionKind::UpdateLine) => decode::<UpdateLine>(record)?.document,
            Some(ActionKind::RemoveLine) => decode::<RemoveLine>(record)?.document,
            _ => continue,
        };
        names.insert(name);
    }
    Ok(names.into_iter().collect())
}

/// Price-check `batch` and, if it clears, apply every edit in order.
pub(crate) fn execute_batch(
    batch: &Intent,
    prices: PricePair,
    world: &mut World,
) -> Result<GateReport, EngineError> {
    let max_difficulty = max_difficulty(batch, &world.documents)?;
    if !prices.clears(max_difficulty)? {
        return Err(EngineError::ThresholdNotMet {
            twap_accept: prices.twap_accept,
            twap_reject: prices.twap_reject,
            max_difficulty,
        });
    }
    tracing::debug!(
        max_difficulty = %max_difficulty,
        twap_accept = prices.twap_accept,
        twap_reject = prices.twap_reject,
        "Difficulty gate cleared"
    );

    let documents = touched_documents(batch)?;
    let edits_applied = run_intent(batch, world)?;
    Ok(GateReport {
        max_difficulty,
        prices,
        edits_applied,
        documents,
    })
}
