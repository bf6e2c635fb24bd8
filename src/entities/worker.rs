//! Worker entity - The employment profile attached to a user account.
//!
//! Profiles are materialized lazily: a user may exist without one until the
//! first operation that needs it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Worker database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "workers")]
pub struct Model {
    /// Unique identifier for the worker profile
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user account
    #[sea_orm(unique)]
    pub user_id: i64,
    /// Lowercased display name, unique across workers
    #[sea_orm(unique)]
    pub name: String,
    /// Contact phone, may be empty
    pub phone: String,
    /// Job title (defaults to "Worker")
    pub position: String,
    /// Monthly salary
    pub salary: f64,
    /// Date the worker joined
    pub join_date: Date,
    /// Inactive workers are kept for history
    pub is_active: bool,
    /// When the profile was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Worker and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each profile belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One worker has many attendance rows
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendances,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
