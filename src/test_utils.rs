//! Shared test utilities for the shop ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test accounts, items and transactions with sensible defaults.

use crate::{
    core::{
        context::AppContext,
        gate::PaymentType,
        item::{self, ItemRef},
        ledger,
        profile::ensure_worker_profile,
        purchase::{self, PurchaseInput},
        sale::SaleInput,
        user::{Role, ensure_owner, register_user},
    },
    entities::{item as item_entity, purchase as purchase_entity, user, worker},
    errors::Result,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Creates an in-memory `SQLite` database with all tables initialized.
///
/// The pool holds a single connection: every connection to `sqlite::memory:`
/// opens its own empty database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test database with the owner seeded.
///
/// # Defaults
/// * owner name: "owner"
/// * default shop: "shop1"
pub async fn setup_test_context() -> Result<AppContext> {
    let db = setup_test_db().await?;
    let owner = ensure_owner(&db, "owner").await?;
    Ok(AppContext::new(db, owner.id, "shop1".to_string()))
}

/// Creates a worker account assigned to `shop_id`.
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    shop_id: Option<&str>,
) -> Result<user::Model> {
    register_user(db, name, Role::Worker, shop_id.map(str::to_string)).await
}

/// Creates a context plus one worker ("ravi") in `shop_id`.
pub async fn setup_with_worker(shop_id: &str) -> Result<(AppContext, user::Model)> {
    let ctx = setup_test_context().await?;
    let worker = create_test_user(&ctx.database, "ravi", Some(shop_id)).await?;
    Ok((ctx, worker))
}

/// Like [`setup_with_worker`], with `amount` already credited to the shop.
pub async fn setup_with_fund(shop_id: &str, amount: f64) -> Result<(AppContext, user::Model)> {
    let (ctx, worker) = setup_with_worker(shop_id).await?;
    credit_shop(&ctx, &worker, amount).await?;
    Ok((ctx, worker))
}

/// Credits `amount` to the shop of `account`, given by the owner.
pub async fn credit_shop(ctx: &AppContext, account: &user::Model, amount: f64) -> Result<()> {
    ledger::credit(ctx, account.id, amount, "owner".to_string()).await?;
    Ok(())
}

/// Worker profile of `account`, created if missing.
pub async fn worker_profile(ctx: &AppContext, account: &user::Model) -> Result<worker::Model> {
    ensure_worker_profile(&ctx.database, account).await
}

/// Creates an empty item owned by `user_id`.
pub async fn create_test_item(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<item_entity::Model> {
    item::create_item(db, user_id, name, "kg", "general").await
}

/// Creates an item owned by `user_id` holding `stock` units.
pub async fn stocked_item(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    stock: f64,
) -> Result<item_entity::Model> {
    let created = create_test_item(db, user_id, name).await?;
    item::add_stock(db, created.id, stock).await?;
    item::get_item(db, created.id).await
}

/// A paid purchase of a named item.
///
/// # Defaults
/// * unit: "kg"
/// * supplier: "Test Supplier"
/// * date: now
pub fn purchase_input(item_name: &str, quantity: f64, unit_price: f64) -> PurchaseInput {
    PurchaseInput {
        item: ItemRef::Name {
            item_name: item_name.to_string(),
            unit: "kg".to_string(),
        },
        supplier_name: Some("Test Supplier".to_string()),
        supplier_contact: None,
        quantity,
        unit_price,
        payment_type: PaymentType::Paid,
        borrow_amount: None,
        purchase_date: None,
    }
}

/// Records a borrowed purchase of one unit of "cement" worth `total`.
pub async fn borrow_purchase(
    ctx: &AppContext,
    account: &user::Model,
    total: f64,
) -> Result<purchase_entity::Model> {
    let mut input = purchase_input("cement", 1.0, total);
    input.payment_type = PaymentType::Borrow;
    purchase::create_purchase(ctx, account.id, input).await
}

/// A paid sale of an existing item.
pub fn sale_input(item_id: i64, quantity: f64, unit_price: f64) -> SaleInput {
    SaleInput {
        item: ItemRef::Id { item_id },
        customer_name: Some("Walk-in".to_string()),
        customer_contact: None,
        quantity,
        unit_price,
        payment_type: PaymentType::Paid,
        borrow_amount: None,
        sale_date: None,
    }
}
