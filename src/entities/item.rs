//! Item entity - A stock-keeping unit whose quantity moves with purchases and sales.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Worker account that created the item
    pub user_id: i64,
    /// Item name, unique per creating user
    pub name: String,
    /// Unit of measure ("kg", "pcs", ...)
    pub unit: String,
    /// Free-form grouping
    pub category: String,
    /// Quantity on hand
    pub stock: f64,
}

/// Defines relationships between Item and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One item appears in many purchases
    #[sea_orm(has_many = "super::purchase::Entity")]
    Purchases,
    /// One item appears in many sales
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchases.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
