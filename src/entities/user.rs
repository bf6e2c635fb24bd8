//! User entity - An account that can act on the system.
//!
//! Role is either `"admin"` (the single shop owner) or `"worker"`. Workers are
//! scoped to a shop through `shop_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Lowercased login name, unique across the system
    #[sea_orm(unique)]
    pub name: String,
    /// `"admin"` or `"worker"`
    pub role: String,
    /// Shop this account works in; the owner usually has none
    pub shop_id: Option<String>,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A user has at most one worker profile
    #[sea_orm(has_one = "super::worker::Entity")]
    Worker,
}

impl Related<super::worker::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Worker.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
