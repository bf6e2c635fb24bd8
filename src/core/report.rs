//! Report generation business logic.
//!
//! Reports are read-only: they load stored rows and sum them, and never write
//! to the ledger or the stock counters. A shop's records are the ones entered
//! by accounts currently assigned to that shop.

use crate::{
    core::{ledger, user::require_admin},
    entities::{
        Purchase, Sale, User, Worker, WorkerExpense, purchase, sale, user, worker,
        worker_expense,
    },
    errors::Result,
};
use sea_orm::{QuerySelect, prelude::*};
use serde::Serialize;

/// Totals of one kind of transaction.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionTotals {
    /// Number of records
    pub count: u64,
    /// Sum of `totalAmount`
    pub total_amount: f64,
    /// Sum of `borrowAmount` still outstanding
    pub outstanding_borrow: f64,
}

impl TransactionTotals {
    fn add(&mut self, total_amount: f64, borrow_amount: f64) {
        self.count += 1;
        self.total_amount += total_amount;
        self.outstanding_borrow += borrow_amount;
    }
}

/// Aggregated view of one shop.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSummary {
    /// Shop being reported on
    pub shop_id: String,
    /// All credits the owner ever gave the shop
    pub total_credited: f64,
    /// Current fund balance
    pub current_remaining: f64,
    /// Purchases entered by the shop's accounts
    pub purchases: TransactionTotals,
    /// Sales entered by the shop's accounts
    pub sales: TransactionTotals,
    /// Number of worker expenses
    pub expense_count: u64,
    /// Sum of worker expenses
    pub expense_total: f64,
}

/// Generates the summary for `shop_id`.
///
/// # Arguments
/// * `db` - Database connection
/// * `admin_id` - Account requesting the report; must be the admin
/// * `shop_id` - Shop to report on
///
/// # Returns
/// A [`ShopSummary`]; a shop with no activity reports zeros everywhere.
pub async fn shop_summary<C>(db: &C, admin_id: i64, shop_id: &str) -> Result<ShopSummary>
where
    C: ConnectionTrait,
{
    require_admin(db, admin_id).await?;

    let fund = ledger::shop_summary(db, shop_id).await?;

    let user_ids: Vec<i64> = User::find()
        .select_only()
        .column(user::Column::Id)
        .filter(user::Column::ShopId.eq(shop_id))
        .into_tuple()
        .all(db)
        .await?;

    let mut purchases = TransactionTotals::default();
    for row in Purchase::find()
        .filter(purchase::Column::UserId.is_in(user_ids.iter().copied()))
        .all(db)
        .await?
    {
        purchases.add(row.total_amount, row.borrow_amount);
    }

    let mut sales = TransactionTotals::default();
    for row in Sale::find()
        .filter(sale::Column::UserId.is_in(user_ids.iter().copied()))
        .all(db)
        .await?
    {
        sales.add(row.total_amount, row.borrow_amount);
    }

    let worker_ids: Vec<i64> = Worker::find()
        .select_only()
        .column(worker::Column::Id)
        .filter(worker::Column::UserId.is_in(user_ids.iter().copied()))
        .into_tuple()
        .all(db)
        .await?;
    let expenses = WorkerExpense::find()
        .filter(worker_expense::Column::WorkerId.is_in(worker_ids))
        .all(db)
        .await?;

    Ok(ShopSummary {
        shop_id: shop_id.to_string(),
        total_credited: fund.total_given,
        current_remaining: fund.current_remaining,
        purchases,
        sales,
        expense_count: expenses.len() as u64,
        expense_total: expenses.iter().map(|e| e.amount).sum(),
    })
}
