//! Worker expense entity - Petty cash spent by a worker out of the shop fund.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Worker expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "worker_expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Worker profile that spent the money
    pub worker_id: i64,
    /// Shop whose fund paid for the expense
    pub shop_id: String,
    /// What the money was spent on
    pub title: String,
    /// Amount drawn from the fund
    pub amount: f64,
    /// When the expense was recorded
    pub date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
