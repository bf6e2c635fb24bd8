//! Purchase entity - Goods bought into a shop.
//!
//! `total_amount` is always `quantity * unit_price`. A `"borrow"` purchase
//! records an outstanding supplier claim in `borrow_amount` instead of
//! drawing on the shop fund.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Item that was bought
    pub item_id: i64,
    /// Supplier name, if recorded
    pub supplier_name: Option<String>,
    /// Supplier phone or address, if recorded
    pub supplier_contact: Option<String>,
    /// Quantity bought
    pub quantity: f64,
    /// Price per unit
    pub unit_price: f64,
    /// `quantity * unit_price`
    pub total_amount: f64,
    /// `"paid"` or `"borrow"`
    pub payment_type: String,
    /// Outstanding claim, zero once paid
    pub borrow_amount: f64,
    /// Worker account that recorded the purchase
    pub user_id: i64,
    /// Shop whose fund the purchase was booked against
    pub shop_id: String,
    /// When the goods were bought
    pub purchase_date: DateTimeUtc,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase refers to one item
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
