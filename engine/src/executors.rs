//! One executor per action kind, and the loop that drives them.
//!
//! Every executor follows the same shape: decode the current record (which
//! asserts its type), apply the side effect, return. The loop advances the
//! cursor only after the executor succeeds.

use std::collections::BTreeMap;

use decree_types::{
    ActionKind, AuthorizeUpgrade, BorrowCapability, CancelStream, CapabilityKind, CommitUpgrade,
    CreateStream, Deposit, Difficulty, InsertLine, Intent, Mint, RemoveLine, ReturnCapability,
    UpdateLine, UpdateMetadata, UpdateTradingParams, Withdraw,
};

use crate::capability_check;
use crate::cursor::{CurrentAction, ExecutableCursor};
use crate::error::{EngineError, ResourceError};
use crate::resources::{CapabilityLoan, World};

/// Loans taken by `BorrowCapability` actions and not yet returned.
#[derive(Debug, Default)]
struct Loans(BTreeMap<CapabilityKind, CapabilityLoan>);

impl Loans {
    fn get(&self, kind: CapabilityKind) -> Result<&CapabilityLoan, ResourceError> {
        self.0
            .get(&kind)
            .ok_or(ResourceError::CapabilityNotBorrowed(kind))
    }
}

struct ExecutionContext<'w> {
    world: &'w mut World,
    loans: Loans,
}

/// Run `intent` from its first record to its last against `world`.
///
/// Returns the number of actions executed, which always equals the intent
/// length on success. On error `world` may be partially modified; callers
/// run this inside a ledger transaction.
pub(crate) fn run_intent(intent: &Intent, world: &mut World) -> Result<usize, EngineError> {
    capability_check::check_intent(intent)?;

    let mut cursor = ExecutableCursor::new(intent);
    let mut ctx = ExecutionContext {
        world,
        loans: Loans::default(),
    };
    while !cursor.is_exhausted() {
        let action = cursor.current()?;
        tracing::debug!(
            position = action.position(),
            tag = %action.record().type_tag(),
            "Executing action"
        );
        execute(&action, &cursor, &mut ctx)?;
        cursor.advance()?;
    }

    if let Some(kind) = ctx.loans.0.keys().next() {
        return Err(EngineError::CapabilityNotReturned(*kind));
    }
    Ok(cursor.position())
}

fn execute(
    action: &CurrentAction<'_>,
    cursor: &ExecutableCursor<'_>,
    ctx: &mut ExecutionContext<'_>,
) -> Result<(), EngineError> {
    match action.kind()? {
        ActionKind::Deposit => do_deposit(action.decode()?, ctx),
        ActionKind::Withdraw => do_withdraw(action.decode()?, ctx),
        ActionKind::Mint => do_mint(action.decode()?, ctx),
        ActionKind::UpdateMetadata => do_update_metadata(action.decode()?, ctx),
        ActionKind::UpdateTradingParams => do_update_trading_params(&action.decode()?, ctx),
        ActionKind::CreateStream => do_create_stream(action.decode()?, ctx),
        ActionKind::CancelStream => do_cancel_stream(action.decode()?, ctx),
        ActionKind::InsertLine => do_insert_line(action.decode()?, ctx),
        ActionKind::UpdateLine => do_update_line(action.decode()?, ctx),
        ActionKind::RemoveLine => do_remove_line(action.decode()?, ctx),
        ActionKind::BorrowCapability => do_borrow(action.decode()?, action.position(), cursor, ctx),
        ActionKind::AuthorizeUpgrade => do_authorize_upgrade(action.decode()?, ctx),
        ActionKind::CommitUpgrade => do_commit_upgrade(action.decode()?, ctx),
        ActionKind::ReturnCapability => do_return(action.decode()?, ctx),
    }
}

fn do_deposit(action: Deposit, ctx: &mut ExecutionContext<'_>) -> Result<(), EngineError> {
    ctx.world.treasury.deposit(&action.vault, action.amount)?;
    Ok(())
}

fn do_withdraw(action: Withdraw, ctx: &mut ExecutionContext<'_>) -> Result<(), EngineError> {
    ctx.world
        .treasury
        .withdraw(&action.vault, &action.recipient, action.amount)?;
    Ok(())
}

fn do_mint(action: Mint, ctx: &mut ExecutionContext<'_>) -> Result<(), EngineError> {
    let loan = ctx.loans.get(CapabilityKind::MintAuthority)?;
    ctx.world
        .treasury
        .mint(loan, &action.currency, &action.recipient, action.amount)?;
    Ok(())
}

fn do_update_metadata(
    action: UpdateMetadata,
    ctx: &mut ExecutionContext<'_>,
) -> Result<(), EngineError> {
    ctx.world.settings.update_metadata(action)?;
    Ok(())
}

fn do_update_trading_params(
    action: &UpdateTradingParams,
    ctx: &mut ExecutionContext<'_>,
) -> Result<(), EngineError> {
    ctx.world.settings.update_trading_params(action)?;
    Ok(())
}

fn do_create_stream(
    action: CreateStream,
    ctx: &mut ExecutionContext<'_>,
) -> Result<(), EngineError> {
    let World {
        treasury, streams, ..
    } = &mut *ctx.world;
    let id = streams.create(treasury, action)?;
    tracing::debug!(stream_id = %id, "Stream created");
    Ok(())
}

fn do_cancel_stream(
    action: CancelStream,
    ctx: &mut ExecutionContext<'_>,
) -> Result<(), EngineError> {
    let World {
        treasury, streams, ..
    } = &mut *ctx.world;
    streams.cancel(treasury, action.stream_id)?;
    Ok(())
}

fn do_insert_line(action: InsertLine, ctx: &mut ExecutionContext<'_>) -> Result<(), EngineError> {
    ctx.world.documents.insert_line(
        &action.document,
        action.position,
        action.text,
        Difficulty::new(action.difficulty),
    )?;
    Ok(())
}

fn do_update_line(action: UpdateLine, ctx: &mut ExecutionContext<'_>) -> Result<(), EngineError> {
    ctx.world
        .documents
        .update_line(&action.document, action.line_id, action.text)?;
    Ok(())
}

fn do_remove_line(action: RemoveLine, ctx: &mut ExecutionContext<'_>) -> Result<(), EngineError> {
    ctx.world
        .documents
        .remove_line(&action.document, action.line_id)?;
    Ok(())
}

fn do_borrow(
    action: BorrowCapability,
    position: usize,
    cursor: &ExecutableCursor<'_>,
    ctx: &mut ExecutionContext<'_>,
) -> Result<(), EngineError> {
    capability_check::require_return(cursor.upcoming(), action.capability, position)?;
    let loan = ctx.world.capabilities.borrow(action.capability)?;
    ctx.loans.0.insert(action.capability, loan);
    Ok(())
}

fn do_authorize_upgrade(
    action: AuthorizeUpgrade,
    ctx: &mut ExecutionContext<'_>,
) -> Result<(), EngineError> {
    let loan = ctx.loans.get(CapabilityKind::PackageUpgrade)?;
    ctx.world
        .packages
        .authorize_upgrade(loan, &action.package, action.digest)?;
    Ok(())
}

fn do_commit_upgrade(
    action: CommitUpgrade,
    ctx: &mut ExecutionContext<'_>,
) -> Result<(), EngineError> {
    ctx.world
        .packages
        .commit_upgrade(&action.package, action.version)?;
    Ok(())
}

fn do_return(action: ReturnCapability, ctx: &mut ExecutionContext<'_>) -> Result<(), EngineError> {
    let loan = ctx
        .loans
        .0
        .remove(&action.capability)
        .ok_or(ResourceError::CapabilityNotBorrowed(action.capability))?;
    ctx.world.capabilities.give_back(loan)?;
    Ok(())
}
