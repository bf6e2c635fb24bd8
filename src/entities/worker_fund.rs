//! Worker fund entity - One row of a shop's append-only cash ledger.
//!
//! `given_amount` is the signed delta (credits positive, debits negative) and
//! `remaining_amount` is the shop balance after the row was applied, so the
//! newest row of a shop always carries its current balance.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "worker_funds")]
pub struct Model {
    /// Unique identifier, also the tiebreaker for entries sharing a timestamp
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Shop whose balance this entry moves
    pub shop_id: String,
    /// Owner account the fund belongs to
    pub owner_id: i64,
    /// Worker whose action produced the entry
    pub worker_id: i64,
    /// `"credit"`, `"debit"` or `"reversal"`
    pub kind: String,
    /// Signed delta applied to the balance
    pub given_amount: f64,
    /// Running balance after this entry
    pub remaining_amount: f64,
    /// Free text naming who handed over the cash (credits) or what spent it
    pub given_by: String,
    /// Record that caused a debit or reversal, e.g. `"purchase:12"`
    pub reference: Option<String>,
    /// Ordering key
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
