//! Attendance entity - One day's presence record for a worker.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attendance database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Worker profile the record is for
    pub worker_id: i64,
    /// Calendar day
    pub date: Date,
    /// `"present"`, `"absent"`, `"half-day"`, ...
    pub status: String,
    /// Clock-in time, if recorded
    pub check_in: Option<Time>,
    /// Clock-out time, if recorded
    pub check_out: Option<Time>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Defines relationships between Attendance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record belongs to one worker
    #[sea_orm(
        belongs_to = "super::worker::Entity",
        from = "Column::WorkerId",
        to = "super::worker::Column::Id",
        on_delete = "Cascade"
    )]
    Worker,
}

impl Related<super::worker::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Worker.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
