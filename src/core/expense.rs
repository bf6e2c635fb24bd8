//! Worker expense business logic - petty cash spent out of the shop fund.

use crate::{
    core::{
        context::AppContext,
        ledger::{self, Reference},
        profile::acting_worker,
        user::require_self_or_admin,
    },
    entities::{Worker, WorkerExpense, worker_expense},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// What a worker gets back after recording an expense.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseReceipt {
    /// The stored expense
    pub expense: worker_expense::Model,
    /// Balance on the ledger row written for this expense
    pub remaining_fund: f64,
    /// Shop balance once the expense is committed
    pub total_remaining: f64,
}

/// Loads an expense or fails with [`Error::NotFound`].
pub async fn get_expense<C>(db: &C, expense_id: i64) -> Result<worker_expense::Model>
where
    C: ConnectionTrait,
{
    WorkerExpense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Expense", expense_id))
}

/// Records an expense for `user_id`, paid from their shop's fund.
#[instrument(skip(ctx, title))]
pub async fn create_expense(
    ctx: &AppContext,
    user_id: i64,
    title: &str,
    amount: f64,
) -> Result<ExpenseReceipt> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::validation("Expense title cannot be empty"));
    }
    let amount = ledger::validate_amount(amount)?;
    let actor = acting_worker(&ctx.database, user_id).await?;

    let guard = ctx.lock_shop(&actor.shop_id).await;
    let txn = ctx.database.begin().await?;

    let expense = worker_expense::ActiveModel {
        worker_id: Set(actor.worker.id),
        shop_id: Set(actor.shop_id.clone()),
        title: Set(title.to_string()),
        amount: Set(amount),
        date: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let entry = ledger::debit_locked(
        &txn,
        &guard,
        ctx.owner_id,
        actor.worker.id,
        amount,
        Reference::expense(expense.id),
    )
    .await?;
    let total_remaining = ledger::current_balance(&txn, guard.shop_id()).await?;

    txn.commit().await?;
    info!(
        expense_id = expense.id,
        shop_id = %actor.shop_id,
        amount,
        total_remaining,
        "Expense recorded"
    );
    Ok(ExpenseReceipt {
        expense,
        remaining_fund: entry.remaining_amount,
        total_remaining,
    })
}

/// Expenses recorded by `user_id`, newest first.
pub async fn list_expenses<C>(db: &C, user_id: i64) -> Result<Vec<worker_expense::Model>>
where
    C: ConnectionTrait,
{
    let actor = acting_worker(db, user_id).await?;
    WorkerExpense::find()
        .filter(worker_expense::Column::WorkerId.eq(actor.worker.id))
        .order_by_desc(worker_expense::Column::Date)
        .order_by_desc(worker_expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Removes an expense and puts its amount back into the fund.
#[instrument(skip(ctx))]
pub async fn delete_expense(
    ctx: &AppContext,
    user_id: i64,
    expense_id: i64,
) -> Result<worker_expense::Model> {
    let existing = get_expense(&ctx.database, expense_id).await?;
    let spender = Worker::find_by_id(existing.worker_id)
        .one(&ctx.database)
        .await?
        .ok_or_else(|| Error::not_found("Worker", existing.worker_id))?;
    require_self_or_admin(&ctx.database, user_id, spender.user_id).await?;

    let guard = ctx.lock_shop(&existing.shop_id).await;
    let txn = ctx.database.begin().await?;
    let existing = get_expense(&txn, expense_id).await?;

    ledger::reverse_locked(
        &txn,
        &guard,
        ctx.owner_id,
        existing.worker_id,
        existing.amount,
        Reference::expense(expense_id),
    )
    .await?;
    WorkerExpense::delete_by_id(expense_id).exec(&txn).await?;

    txn.commit().await?;
    info!(expense_id, amount = existing.amount, "Expense deleted");
    Ok(existing)
}
