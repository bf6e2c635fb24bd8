//! Sale business logic - goods sold out of a shop.
//!
//! Sales never touch the shop fund. They only draw down stock, and a sale
//! that would take an item below zero is refused.

use crate::{
    core::{
        gate::{self, PaymentType},
        item::{self, ItemRef},
        listing::{ListFilter, Page, scope_for},
        purchase::line_total,
        user::{require_self_or_admin, require_user},
    },
    entities::{Sale, sale},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields supplied when recording or editing a sale.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    /// Item sold, by id or by name
    #[serde(flatten)]
    pub item: ItemRef,
    /// Customer name
    pub customer_name: Option<String>,
    /// Customer contact
    pub customer_contact: Option<String>,
    /// Quantity sold
    pub quantity: f64,
    /// Price per unit
    pub unit_price: f64,
    /// Paid now or owed by the customer
    #[serde(default)]
    pub payment_type: PaymentType,
    /// Amount the customer still owes; defaults to the full total for a borrow
    pub borrow_amount: Option<f64>,
    /// When the goods were sold; defaults to now
    pub sale_date: Option<DateTime<Utc>>,
}

/// Loads a sale or fails with [`Error::NotFound`].
pub async fn get_sale<C>(db: &C, sale_id: i64) -> Result<sale::Model>
where
    C: ConnectionTrait,
{
    Sale::find_by_id(sale_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Sale", sale_id))
}

/// Records a sale made by `user_id`.
#[instrument(skip(db, input))]
pub async fn create_sale(
    db: &DatabaseConnection,
    user_id: i64,
    input: SaleInput,
) -> Result<sale::Model> {
    let (quantity, unit_price, total_amount) = line_total(input.quantity, input.unit_price)?;
    let borrow_amount =
        gate::resolve_borrow_amount(input.payment_type, input.borrow_amount, total_amount)?;
    require_user(db, user_id).await?;

    let txn = db.begin().await?;
    let item_id = item::resolve_item(&txn, user_id, &input.item).await?;
    item::remove_stock(&txn, item_id, quantity).await?;

    let record = sale::ActiveModel {
        item_id: Set(item_id),
        customer_name: Set(input.customer_name),
        customer_contact: Set(input.customer_contact),
        quantity: Set(quantity),
        unit_price: Set(unit_price),
        total_amount: Set(total_amount),
        payment_type: Set(input.payment_type.as_str().to_string()),
        borrow_amount: Set(borrow_amount),
        user_id: Set(user_id),
        sale_date: Set(input.sale_date.unwrap_or_else(Utc::now)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    info!(sale_id = record.id, item_id, quantity, "Sale recorded");
    Ok(record)
}

/// Replaces the details of an existing sale, moving stock to match.
#[instrument(skip(db, input))]
pub async fn update_sale(
    db: &DatabaseConnection,
    user_id: i64,
    sale_id: i64,
    input: SaleInput,
) -> Result<sale::Model> {
    let (quantity, unit_price, total_amount) = line_total(input.quantity, input.unit_price)?;
    let borrow_amount =
        gate::resolve_borrow_amount(input.payment_type, input.borrow_amount, total_amount)?;

    let txn = db.begin().await?;
    let existing = get_sale(&txn, sale_id).await?;
    require_self_or_admin(&txn, user_id, existing.user_id).await?;

    let item_id = item::resolve_item(&txn, existing.user_id, &input.item).await?;
    item::rebase_stock(&txn, existing.item_id, -existing.quantity, item_id, -quantity).await?;

    let sale_date = input.sale_date.unwrap_or(existing.sale_date);
    let mut active: sale::ActiveModel = existing.into();
    active.item_id = Set(item_id);
    active.customer_name = Set(input.customer_name);
    active.customer_contact = Set(input.customer_contact);
    active.quantity = Set(quantity);
    active.unit_price = Set(unit_price);
    active.total_amount = Set(total_amount);
    active.payment_type = Set(input.payment_type.as_str().to_string());
    active.borrow_amount = Set(borrow_amount);
    active.sale_date = Set(sale_date);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    info!(sale_id, total_amount, "Sale updated");
    Ok(updated)
}

/// Removes a sale and puts its goods back in stock.
#[instrument(skip(db))]
pub async fn delete_sale(db: &DatabaseConnection, user_id: i64, sale_id: i64) -> Result<sale::Model> {
    let txn = db.begin().await?;
    let existing = get_sale(&txn, sale_id).await?;
    require_self_or_admin(&txn, user_id, existing.user_id).await?;

    item::add_stock(&txn, existing.item_id, existing.quantity).await?;
    Sale::delete_by_id(sale_id).exec(&txn).await?;

    txn.commit().await?;
    info!(sale_id, "Sale deleted");
    Ok(existing)
}

/// Sales visible to `viewer_id`, newest first.
pub async fn list_sales<C>(db: &C, viewer_id: i64, filter: &ListFilter) -> Result<Page<sale::Model>>
where
    C: ConnectionTrait,
{
    let scope = scope_for(db, viewer_id, filter.shop_id.as_deref()).await?;
    let mut query = scope.apply(
        Sale::find()
            .order_by_desc(sale::Column::SaleDate)
            .order_by_desc(sale::Column::Id),
        sale::Column::UserId,
    );
    if let Some((from, to)) = filter.date_bounds()? {
        query = query
            .filter(sale::Column::SaleDate.gte(from))
            .filter(sale::Column::SaleDate.lt(to));
    }

    let paginator = query.paginate(db, filter.page_size());
    let total_count = paginator.num_items().await?;
    let data = paginator.fetch_page(filter.page_index()).await?;
    Ok(Page { data, total_count })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{item::get_item, ledger::current_balance};
    use crate::test_utils::*;
    use chrono::{NaiveDate, TimeZone};

    #[tokio::test]
    async fn test_sale_removes_stock_without_touching_fund() -> Result<()> {
        let (ctx, worker) = setup_with_fund("shop1", 500.0).await?;
        let rice = stocked_item(&ctx.database, worker.id, "rice", 10.0).await?;

        let record = create_sale(&ctx.database, worker.id, sale_input(rice.id, 4.0, 30.0)).await?;

        assert_eq!(record.total_amount, 120.0);
        assert_eq!(get_item(&ctx.database, rice.id).await?.stock, 6.0);
        assert_eq!(current_balance(&ctx.database, "shop1").await?, 500.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_oversell_is_refused() -> Result<()> {
        let (ctx, worker) = setup_with_worker("shop1").await?;
        let rice = stocked_item(&ctx.database, worker.id, "rice", 2.0).await?;

        let result = create_sale(&ctx.database, worker.id, sale_input(rice.id, 3.0, 30.0)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InsufficientStock {
                available: 2.0,
                requested: 3.0,
                ..
            }
        ));

        let listed = list_sales(&ctx.database, worker.id, &ListFilter::default()).await?;
        assert_eq!(listed.total_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_and_delete_restore_stock() -> Result<()> {
        let (ctx, worker) = setup_with_worker("shop1").await?;
        let rice = stocked_item(&ctx.database, worker.id, "rice", 10.0).await?;
        let dal = stocked_item(&ctx.database, worker.id, "dal", 10.0).await?;

        let record = create_sale(&ctx.database, worker.id, sale_input(rice.id, 4.0, 30.0)).await?;
        update_sale(&ctx.database, worker.id, record.id, sale_input(rice.id, 7.0, 30.0)).await?;
        assert_eq!(get_item(&ctx.database, rice.id).await?.stock, 3.0);

        update_sale(&ctx.database, worker.id, record.id, sale_input(dal.id, 2.0, 30.0)).await?;
        assert_eq!(get_item(&ctx.database, rice.id).await?.stock, 10.0);
        assert_eq!(get_item(&ctx.database, dal.id).await?.stock, 8.0);

        delete_sale(&ctx.database, worker.id, record.id).await?;
        assert_eq!(get_item(&ctx.database, dal.id).await?.stock, 10.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_borrow_sale_records_amount_owed() -> Result<()> {
        let (ctx, worker) = setup_with_worker("shop1").await?;
        let rice = stocked_item(&ctx.database, worker.id, "rice", 10.0).await?;

        let mut input = sale_input(rice.id, 2.0, 50.0);
        input.payment_type = PaymentType::Borrow;
        input.borrow_amount = Some(60.0);
        let record = create_sale(&ctx.database, worker.id, input).await?;

        assert_eq!(record.payment_type, "borrow");
        assert_eq!(record.borrow_amount, 60.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_filters_by_day() -> Result<()> {
        let (ctx, worker) = setup_with_worker("shop1").await?;
        let rice = stocked_item(&ctx.database, worker.id, "rice", 10.0).await?;

        for day in [1, 2, 2, 5] {
            let mut input = sale_input(rice.id, 1.0, 10.0);
            input.sale_date = Some(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap());
            create_sale(&ctx.database, worker.id, input).await?;
        }

        let filter = ListFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 2),
            ..Default::default()
        };
        assert_eq!(list_sales(&ctx.database, worker.id, &filter).await?.total_count, 2);

        let filter = ListFilter {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 4),
            ..Default::default()
        };
        assert_eq!(list_sales(&ctx.database, worker.id, &filter).await?.total_count, 3);
        Ok(())
    }
}
