//! Purchase business logic - goods bought into a shop.
//!
//! A paid purchase draws its total from the shop fund; a borrowed one records
//! the claim instead. Every purchase adds its quantity to the item's stock.
//! Edits and deletions undo the old fund and stock effects before applying
//! new ones, and the whole sequence runs in one database transaction under
//! the shop guard, so a failed step leaves nothing behind.

use crate::{
    core::{
        context::AppContext,
        gate::{self, PaymentType},
        item::{self, ItemRef},
        ledger::Reference,
        listing::{ListFilter, Page, scope_for},
        profile::{acting_worker, recorder_profile},
        user::require_self_or_admin,
    },
    entities::{Purchase, purchase},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Fields supplied when recording or editing a purchase.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInput {
    /// Item bought, by id or by name
    #[serde(flatten)]
    pub item: ItemRef,
    /// Supplier name
    pub supplier_name: Option<String>,
    /// Supplier contact
    pub supplier_contact: Option<String>,
    /// Quantity bought
    pub quantity: f64,
    /// Price per unit
    pub unit_price: f64,
    /// Paid now or borrowed
    #[serde(default)]
    pub payment_type: PaymentType,
    /// Outstanding amount for a borrow; defaults to the full total
    pub borrow_amount: Option<f64>,
    /// When the goods were bought; defaults to now
    pub purchase_date: Option<DateTime<Utc>>,
}

/// Validates a quantity and unit price and returns `(quantity, price, total)`.
pub(crate) fn line_total(quantity: f64, unit_price: f64) -> Result<(f64, f64, f64)> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(Error::validation("Quantity must be a positive number"));
    }
    if !unit_price.is_finite() || unit_price <= 0.0 {
        return Err(Error::validation("Unit price must be a positive number"));
    }
    Ok((quantity, unit_price, quantity * unit_price))
}

/// Loads a purchase or fails with [`Error::NotFound`].
pub async fn get_purchase<C>(db: &C, purchase_id: i64) -> Result<purchase::Model>
where
    C: ConnectionTrait,
{
    Purchase::find_by_id(purchase_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Purchase", purchase_id))
}

/// Records a purchase made by `user_id`.
#[instrument(skip(ctx, input))]
pub async fn create_purchase(
    ctx: &AppContext,
    user_id: i64,
    input: PurchaseInput,
) -> Result<purchase::Model> {
    let (quantity, unit_price, total_amount) = line_total(input.quantity, input.unit_price)?;
    let borrow_amount =
        gate::resolve_borrow_amount(input.payment_type, input.borrow_amount, total_amount)?;
    let actor = acting_worker(&ctx.database, user_id).await?;

    let guard = ctx.lock_shop(&actor.shop_id).await;
    let txn = ctx.database.begin().await?;

    let item_id = item::resolve_item(&txn, user_id, &input.item).await?;
    let record = purchase::ActiveModel {
        item_id: Set(item_id),
        supplier_name: Set(input.supplier_name),
        supplier_contact: Set(input.supplier_contact),
        quantity: Set(quantity),
        unit_price: Set(unit_price),
        total_amount: Set(total_amount),
        payment_type: Set(input.payment_type.as_str().to_string()),
        borrow_amount: Set(borrow_amount),
        user_id: Set(user_id),
        shop_id: Set(actor.shop_id.clone()),
        purchase_date: Set(input.purchase_date.unwrap_or_else(Utc::now)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    gate::reserve(
        &txn,
        &guard,
        ctx.owner_id,
        actor.worker.id,
        total_amount,
        input.payment_type,
        Reference::purchase(record.id),
    )
    .await?;
    item::add_stock(&txn, item_id, quantity).await?;

    txn.commit().await?;
    info!(
        purchase_id = record.id,
        shop_id = %actor.shop_id,
        total_amount,
        payment_type = %input.payment_type,
        "Purchase recorded"
    );
    Ok(record)
}

/// Replaces the details of an existing purchase.
///
/// The old fund draw is released before the new total is reserved, and the
/// old stock effect is rebased onto the new item and quantity.
#[instrument(skip(ctx, input))]
pub async fn update_purchase(
    ctx: &AppContext,
    user_id: i64,
    purchase_id: i64,
    input: PurchaseInput,
) -> Result<purchase::Model> {
    let (quantity, unit_price, total_amount) = line_total(input.quantity, input.unit_price)?;
    let borrow_amount =
        gate::resolve_borrow_amount(input.payment_type, input.borrow_amount, total_amount)?;

    let existing = get_purchase(&ctx.database, purchase_id).await?;
    require_self_or_admin(&ctx.database, user_id, existing.user_id).await?;
    let recorder = recorder_profile(&ctx.database, existing.user_id).await?;

    let guard = ctx.lock_shop(&existing.shop_id).await;
    let txn = ctx.database.begin().await?;
    // Re-read under the guard so the reversal uses the committed amounts
    let existing = get_purchase(&txn, purchase_id).await?;
    let old_payment: PaymentType = existing.payment_type.parse()?;

    gate::release(
        &txn,
        &guard,
        ctx.owner_id,
        recorder.id,
        existing.total_amount,
        old_payment,
        Reference::purchase(purchase_id),
    )
    .await?;

    let item_id = item::resolve_item(&txn, existing.user_id, &input.item).await?;
    gate::reserve(
        &txn,
        &guard,
        ctx.owner_id,
        recorder.id,
        total_amount,
        input.payment_type,
        Reference::purchase(purchase_id),
    )
    .await?;
    item::rebase_stock(&txn, existing.item_id, existing.quantity, item_id, quantity).await?;

    let purchase_date = input.purchase_date.unwrap_or(existing.purchase_date);
    let mut active: purchase::ActiveModel = existing.into();
    active.item_id = Set(item_id);
    active.supplier_name = Set(input.supplier_name);
    active.supplier_contact = Set(input.supplier_contact);
    active.quantity = Set(quantity);
    active.unit_price = Set(unit_price);
    active.total_amount = Set(total_amount);
    active.payment_type = Set(input.payment_type.as_str().to_string());
    active.borrow_amount = Set(borrow_amount);
    active.purchase_date = Set(purchase_date);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    info!(purchase_id, total_amount, "Purchase updated");
    Ok(updated)
}

/// Removes a purchase, returning its cash to the fund and its goods from stock.
#[instrument(skip(ctx))]
pub async fn delete_purchase(
    ctx: &AppContext,
    user_id: i64,
    purchase_id: i64,
) -> Result<purchase::Model> {
    let existing = get_purchase(&ctx.database, purchase_id).await?;
    require_self_or_admin(&ctx.database, user_id, existing.user_id).await?;
    let recorder = recorder_profile(&ctx.database, existing.user_id).await?;

    let guard = ctx.lock_shop(&existing.shop_id).await;
    let txn = ctx.database.begin().await?;
    let existing = get_purchase(&txn, purchase_id).await?;
    let old_payment: PaymentType = existing.payment_type.parse()?;

    gate::release(
        &txn,
        &guard,
        ctx.owner_id,
        recorder.id,
        existing.total_amount,
        old_payment,
        Reference::purchase(purchase_id),
    )
    .await?;
    item::remove_stock(&txn, existing.item_id, existing.quantity).await?;
    Purchase::delete_by_id(purchase_id).exec(&txn).await?;

    txn.commit().await?;
    info!(purchase_id, "Purchase deleted");
    Ok(existing)
}

/// Purchases visible to `viewer_id`, newest first.
pub async fn list_purchases<C>(
    db: &C,
    viewer_id: i64,
    filter: &ListFilter,
) -> Result<Page<purchase::Model>>
where
    C: ConnectionTrait,
{
    let scope = scope_for(db, viewer_id, filter.shop_id.as_deref()).await?;
    let mut query = scope.apply(
        Purchase::find()
            .order_by_desc(purchase::Column::PurchaseDate)
            .order_by_desc(purchase::Column::Id),
        purchase::Column::UserId,
    );
    if let Some((from, to)) = filter.date_bounds()? {
        query = query
            .filter(purchase::Column::PurchaseDate.gte(from))
            .filter(purchase::Column::PurchaseDate.lt(to));
    }

    let paginator = query.paginate(db, filter.page_size());
    let total_count = paginator.num_items().await?;
    let data = paginator.fetch_page(filter.page_index()).await?;
    Ok(Page { data, total_count })
}
