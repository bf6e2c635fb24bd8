//! Shop fund ledger - the running cash balance of each shop.
//!
//! The ledger is append-only. Credits, debits and reversals each insert one
//! row holding the signed delta (`given_amount`) and the balance after it
//! (`remaining_amount`). The newest row of a shop therefore always carries the
//! shop's current balance, and that balance equals the sum of all deltas.
//!
//! Writes go through `append_entry`, which requires a [`ShopGuard`]: the
//! balance read and the row insert happen while no other operation can touch
//! the same shop.

use crate::{
    core::{
        context::{AppContext, ShopGuard},
        profile::acting_worker,
    },
    entities::{User, WorkerFund, worker_fund},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument};

/// What produced a ledger row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Owner handed cash to the shop
    Credit,
    /// Purchase, expense or settlement spent cash
    Debit,
    /// An earlier debit was undone
    Reversal,
}

impl EntryKind {
    /// Value stored in the `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Reversal => "reversal",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record a debit or reversal belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reference {
    /// Table-ish name: `"purchase"`, `"expense"`, `"settlement"`
    pub source: &'static str,
    /// Row id within that source
    pub id: i64,
}

impl Reference {
    /// Reference to a purchase row.
    #[must_use]
    pub const fn purchase(id: i64) -> Self {
        Self {
            source: "purchase",
            id,
        }
    }

    /// Reference to a worker expense row.
    #[must_use]
    pub const fn expense(id: i64) -> Self {
        Self {
            source: "expense",
            id,
        }
    }

    /// Reference to the settlement of a borrowed purchase.
    #[must_use]
    pub const fn purchase_settlement(id: i64) -> Self {
        Self {
            source: "purchase-settlement",
            id,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.id)
    }
}

/// Result of [`query`]: the shop balance and its history.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundSummary {
    /// Shop the ledger belongs to
    pub shop_id: String,
    /// Sum of all credits ever given
    pub total_given: f64,
    /// Current balance
    pub current_remaining: f64,
    /// Entries, newest first
    pub funds: Vec<worker_fund::Model>,
}

/// A row about to be appended.
#[derive(Clone, Debug)]
pub(crate) struct EntryDraft {
    pub owner_id: i64,
    pub worker_id: i64,
    pub kind: EntryKind,
    pub delta: f64,
    pub given_by: String,
    pub reference: Option<Reference>,
}

/// Rejects amounts that are not finite and strictly positive.
pub fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Newest ledger row of a shop.
///
/// Rows are appended under the shop guard, so the row id gives the append
/// order; `created_at` is wall-clock time and may go backwards.
pub async fn latest_entry<C>(db: &C, shop_id: &str) -> Result<Option<worker_fund::Model>>
where
    C: ConnectionTrait,
{
    WorkerFund::find()
        .filter(worker_fund::Column::ShopId.eq(shop_id))
        .order_by_desc(worker_fund::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Current balance of a shop; zero before the first credit.
pub async fn current_balance<C>(db: &C, shop_id: &str) -> Result<f64>
where
    C: ConnectionTrait,
{
    Ok(latest_entry(db, shop_id)
        .await?
        .map_or(0.0, |entry| entry.remaining_amount))
}

/// All ledger rows of a shop, newest first.
pub async fn history<C>(db: &C, shop_id: &str) -> Result<Vec<worker_fund::Model>>
where
    C: ConnectionTrait,
{
    WorkerFund::find()
        .filter(worker_fund::Column::ShopId.eq(shop_id))
        .order_by_desc(worker_fund::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Appends one row on top of the shop's current balance.
pub(crate) async fn append_entry<C>(
    db: &C,
    guard: &ShopGuard,
    draft: EntryDraft,
) -> Result<worker_fund::Model>
where
    C: ConnectionTrait,
{
    let previous = current_balance(db, guard.shop_id()).await?;
    let remaining = previous + draft.delta;

    let entry = worker_fund::ActiveModel {
        shop_id: Set(guard.shop_id().to_string()),
        owner_id: Set(draft.owner_id),
        worker_id: Set(draft.worker_id),
        kind: Set(draft.kind.as_str().to_string()),
        given_amount: Set(draft.delta),
        remaining_amount: Set(remaining),
        given_by: Set(draft.given_by),
        reference: Set(draft.reference.map(|r| r.to_string())),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let entry = entry.insert(db).await?;
    debug!(
        shop_id = guard.shop_id(),
        kind = %draft.kind,
        delta = draft.delta,
        remaining,
        "Ledger entry appended"
    );
    Ok(entry)
}

/// Takes `amount` out of the guarded shop's fund.
///
/// Fails with [`Error::InsufficientFunds`] when the balance is lower than
/// `amount`; nothing is written in that case.
pub(crate) async fn debit_locked<C>(
    db: &C,
    guard: &ShopGuard,
    owner_id: i64,
    worker_id: i64,
    amount: f64,
    reference: Reference,
) -> Result<worker_fund::Model>
where
    C: ConnectionTrait,
{
    let amount = validate_amount(amount)?;
    let available = current_balance(db, guard.shop_id()).await?;
    if available < amount {
        return Err(Error::InsufficientFunds {
            available,
            required: amount,
        });
    }

    append_entry(
        db,
        guard,
        EntryDraft {
            owner_id,
            worker_id,
            kind: EntryKind::Debit,
            delta: -amount,
            given_by: reference.source.to_string(),
            reference: Some(reference),
        },
    )
    .await
}

/// Puts `amount` back into the guarded shop's fund after a debit is undone.
pub(crate) async fn reverse_locked<C>(
    db: &C,
    guard: &ShopGuard,
    owner_id: i64,
    worker_id: i64,
    amount: f64,
    reference: Reference,
) -> Result<worker_fund::Model>
where
    C: ConnectionTrait,
{
    let amount = validate_amount(amount)?;
    append_entry(
        db,
        guard,
        EntryDraft {
            owner_id,
            worker_id,
            kind: EntryKind::Reversal,
            delta: amount,
            given_by: reference.source.to_string(),
            reference: Some(reference),
        },
    )
    .await
}

/// Records cash handed by the owner to the caller's shop.
///
/// The new row's balance is the previous balance plus `amount`.
#[instrument(skip(ctx, given_by))]
pub async fn credit(
    ctx: &AppContext,
    user_id: i64,
    amount: f64,
    given_by: String,
) -> Result<worker_fund::Model> {
    let amount = validate_amount(amount)?;
    let actor = acting_worker(&ctx.database, user_id).await?;

    User::find_by_id(ctx.owner_id)
        .one(&ctx.database)
        .await?
        .ok_or(Error::OwnerNotFound)?;

    let guard = ctx.lock_shop(&actor.shop_id).await;
    let txn = ctx.database.begin().await?;

    let entry = append_entry(
        &txn,
        &guard,
        EntryDraft {
            owner_id: ctx.owner_id,
            worker_id: actor.worker.id,
            kind: EntryKind::Credit,
            delta: amount,
            given_by,
            reference: None,
        },
    )
    .await?;

    txn.commit().await?;
    info!(
        shop_id = %entry.shop_id,
        amount,
        remaining = entry.remaining_amount,
        "Fund credited"
    );
    Ok(entry)
}

/// Takes `amount` out of `shop_id`'s fund as a standalone operation.
///
/// Purchases, expenses and settlements debit inside their own transaction;
/// this entry point serves callers that only move cash.
#[instrument(skip(ctx))]
pub async fn debit(
    ctx: &AppContext,
    shop_id: &str,
    worker_id: i64,
    amount: f64,
    reference: Reference,
) -> Result<worker_fund::Model> {
    let guard = ctx.lock_shop(shop_id).await;
    let txn = ctx.database.begin().await?;
    let entry = debit_locked(&txn, &guard, ctx.owner_id, worker_id, amount, reference).await?;
    txn.commit().await?;
    Ok(entry)
}

/// Balance and history of the caller's shop.
pub async fn query(ctx: &AppContext, user_id: i64) -> Result<FundSummary> {
    let actor = acting_worker(&ctx.database, user_id).await?;
    shop_summary(&ctx.database, &actor.shop_id).await
}

/// Balance and history of `shop_id`.
pub async fn shop_summary<C>(db: &C, shop_id: &str) -> Result<FundSummary>
where
    C: ConnectionTrait,
{
    let funds = history(db, shop_id).await?;
    let total_given = funds
        .iter()
        .filter(|entry| entry.kind == EntryKind::Credit.as_str())
        .map(|entry| entry.given_amount)
        .sum();
    let current_remaining = funds.first().map_or(0.0, |entry| entry.remaining_amount);

    Ok(FundSummary {
        shop_id: shop_id.to_string(),
        total_given,
        current_remaining,
        funds,
    })
}
