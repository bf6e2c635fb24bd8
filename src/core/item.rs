//! Item business logic - inventory rows and their stock counters.
//!
//! Stock is never read, modified and written back. Increments are a single
//! `stock = stock + ?` update and decrements only apply `WHERE stock >= ?`, so
//! concurrent purchases and sales of one item cannot lose updates or drive the
//! count negative.

use crate::{
    core::user::{Role, require_user},
    entities::{Item, item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};
use serde::Deserialize;
use tracing::debug;

/// How a purchase or sale names its item.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ItemRef {
    /// An existing item
    Id {
        /// Item id
        #[serde(rename = "itemId")]
        item_id: i64,
    },
    /// An item of the acting user, created on first use
    Name {
        /// Item name
        #[serde(rename = "itemName")]
        item_name: String,
        /// Unit for a newly created item
        #[serde(default = "default_unit")]
        unit: String,
    },
}

fn default_unit() -> String {
    "kg".to_string()
}

/// Creates a new item with zero stock.
pub async fn create_item<C>(
    db: &C,
    user_id: i64,
    name: &str,
    unit: &str,
    category: &str,
) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Item name cannot be empty"));
    }

    let row = item::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_string()),
        unit: Set(unit.trim().to_string()),
        category: Set(category.trim().to_string()),
        stock: Set(0.0),
        ..Default::default()
    };
    row.insert(db).await.map_err(Into::into)
}

/// Items visible to a user: everything for the owner, own items for workers.
pub async fn list_items<C>(db: &C, user_id: i64) -> Result<Vec<item::Model>>
where
    C: ConnectionTrait,
{
    let account = require_user(db, user_id).await?;
    let mut query = Item::find().order_by_asc(item::Column::Name);
    if account.role != Role::Admin.as_str() {
        query = query.filter(item::Column::UserId.eq(user_id));
    }
    query.all(db).await.map_err(Into::into)
}

/// Loads an item or fails with [`Error::NotFound`].
pub async fn get_item<C>(db: &C, item_id: i64) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Item", item_id))
}

/// Turns an [`ItemRef`] into an item id, creating a named item if needed.
pub async fn resolve_item<C>(db: &C, user_id: i64, item_ref: &ItemRef) -> Result<i64>
where
    C: ConnectionTrait,
{
    match item_ref {
        ItemRef::Id { item_id } => Ok(get_item(db, *item_id).await?.id),
        ItemRef::Name { item_name, unit } => {
            let existing = Item::find()
                .filter(item::Column::UserId.eq(user_id))
                .filter(item::Column::Name.eq(item_name.trim()))
                .one(db)
                .await?;
            match existing {
                Some(found) => Ok(found.id),
                None => {
                    debug!(user_id, item_name = %item_name, "Creating item on first use");
                    Ok(create_item(db, user_id, item_name, unit, "general").await?.id)
                }
            }
        }
    }
}

/// Adds `quantity` to an item's stock.
pub async fn add_stock<C>(db: &C, item_id: i64, quantity: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Item::update_many()
        .col_expr(item::Column::Stock, Expr::col(item::Column::Stock).add(quantity))
        .filter(item::Column::Id.eq(item_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found("Item", item_id));
    }
    Ok(())
}

/// Removes `quantity` from an item's stock if that much is on hand.
pub async fn remove_stock<C>(db: &C, item_id: i64, quantity: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Item::update_many()
        .col_expr(item::Column::Stock, Expr::col(item::Column::Stock).sub(quantity))
        .filter(item::Column::Id.eq(item_id))
        .filter(item::Column::Stock.gte(quantity))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        let current = get_item(db, item_id).await?;
        return Err(Error::InsufficientStock {
            item_id,
            available: current.stock,
            requested: quantity,
        });
    }
    Ok(())
}

/// Applies a signed stock change.
pub async fn adjust_stock<C>(db: &C, item_id: i64, delta: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    if delta > 0.0 {
        add_stock(db, item_id, delta).await
    } else if delta < 0.0 {
        remove_stock(db, item_id, -delta).await
    } else {
        Ok(())
    }
}

/// Replaces a record's stock effect with a new one.
///
/// `old_effect` and `new_effect` are signed (purchases add, sales remove).
/// When the record keeps its item only the difference is applied; when it
/// moves to another item the old item gives back its effect and the new item
/// takes the new one.
pub async fn rebase_stock<C>(
    db: &C,
    old_item: i64,
    old_effect: f64,
    new_item: i64,
    new_effect: f64,
) -> Result<()>
where
    C: ConnectionTrait,
{
    if old_item == new_item {
        adjust_stock(db, new_item, new_effect - old_effect).await
    } else {
        adjust_stock(db, old_item, -old_effect).await?;
        adjust_stock(db, new_item, new_effect).await
    }
}
