//! Human-readable rendering of action records.

use std::fmt;

use serde::Serialize;

use decree_types::{Action, ActionKind, ActionRecord, DecodeError, FormatVersion, Intent, TypeTag};

use crate::events::hex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSummary {
    pub kind: ActionKind,
    pub version: FormatVersion,
    pub fields: Vec<Field>,
}

impl fmt::Display for ActionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.version)?;
        for (i, field) in self.fields.iter().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{sep}{}={}", field.name, field.value)?;
        }
        Ok(())
    }
}

/// One entry of [`describe_intent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DescribedAction {
    Decoded {
        position: usize,
        #[serde(flatten)]
        summary: ActionSummary,
    },
    Undecodable {
        position: usize,
        tag: TypeTag,
        error: String,
    },
}

impl fmt::Display for DescribedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decoded { position, summary } => write!(f, "[{position}] {summary}"),
            Self::Undecodable {
                position,
                tag,
                error,
            } => write!(f, "[{position}] {tag}: undecodable ({error})"),
        }
    }
}

pub fn describe(record: &ActionRecord) -> Result<ActionSummary, DecodeError> {
    let action = Action::decode(record)?;
    Ok(ActionSummary {
        kind: action.kind(),
        version: record.format_version(),
        fields: fields(action),
    })
}

/// Describe every record of `intent`; a record that fails to decode becomes
/// an [`DescribedAction::Undecodable`] entry instead of aborting.
#[must_use]
pub fn describe_intent(intent: &Intent) -> Vec<DescribedAction> {
    intent
        .iter()
        .enumerate()
        .map(|(position, record)| match describe(record) {
            Ok(summary) => DescribedAction::Decoded { position, summary },
            Err(err) => DescribedAction::Undecodable {
                position,
                tag: record.type_tag().clone(),
                error: err.to_string(),
            },
        })
        .collect()
}

fn field(name: &'static str, value: impl ToString) -> Field {
    Field {
        name,
        value: value.to_string(),
    }
}

fn optional(name: &'static str, value: Option<impl ToString>) -> Option<Field> {
    value.map(|v| field(name, v))
}

fn fields(action: Action) -> Vec<Field> {
    match action {
        Action::Deposit(a) => vec![field("vault", a.vault), field("amount", a.amount)],
        Action::Withdraw(a) => {
            let mut out = vec![
                field("vault", a.vault),
                field("recipient", a.recipient),
                field("amount", a.amount),
            ];
            out.extend(optional("memo", a.memo));
            out
        }
        Action::Mint(a) => vec![
            field("currency", a.currency),
            field("recipient", a.recipient),
            field("amount", a.amount),
        ],
        Action::UpdateMetadata(a) => [
            optional("name", a.name),
            optional("description", a.description),
            optional("icon_url", a.icon_url),
        ]
        .into_iter()
        .flatten()
        .collect(),
        Action::UpdateTradingParams(a) => [
            optional("min_liquidity", a.min_liquidity),
            optional("review_period_ms", a.review_period_ms),
            optional("trading_period_ms", a.trading_period_ms),
            optional("twap_start_delay_ms", a.twap_start_delay_ms),
        ]
        .into_iter()
        .flatten()
        .collect(),
        Action::CreateStream(a) => vec![
            field("vault", a.vault),
            field("recipient", a.recipient),
            field("amount_per_period", a.amount_per_period),
            field("period_ms", a.period_ms),
            field("periods", a.periods),
        ],
        Action::CancelStream(a) => vec![field("stream_id", a.stream_id)],
        Action::InsertLine(a) => vec![
            field("document", a.document),
            field("position", a.position),
            field("text", a.text),
            field("difficulty", a.difficulty),
        ],
        Action::UpdateLine(a) => vec![
            field("document", a.document),
            field("line_id", a.line_id),
            field("text", a.text),
        ],
        Action::RemoveLine(a) => vec![field("document", a.document), field("line_id", a.line_id)],
        Action::BorrowCapability(a) => vec![field("capability", a.capability)],
        Action::ReturnCapability(a) => vec![field("capability", a.capability)],
        Action::AuthorizeUpgrade(a) => {
            vec![field("package", a.package), field("digest", hex(&a.digest))]
        }
        Action::CommitUpgrade(a) => vec![field("package", a.package), field("version", a.version)],
    }
}
