//! Sale entity - Goods sold out of a shop.
//!
//! Mirrors [`super::purchase`]; a `"borrow"` sale is money still owed by the
//! customer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Item that was sold
    pub item_id: i64,
    /// Customer name, if recorded
    pub customer_name: Option<String>,
    /// Customer phone or address, if recorded
    pub customer_contact: Option<String>,
    /// Quantity sold
    pub quantity: f64,
    /// Price per unit
    pub unit_price: f64,
    /// `quantity * unit_price`
    pub total_amount: f64,
    /// `"paid"` or `"borrow"`
    pub payment_type: String,
    /// Amount the customer still owes
    pub borrow_amount: f64,
    /// Worker account that recorded the sale
    pub user_id: i64,
    /// When the goods were sold
    pub sale_date: DateTimeUtc,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each sale refers to one item
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
