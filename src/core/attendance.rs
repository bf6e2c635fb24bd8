//! Attendance business logic - daily presence records kept by the owner.

use crate::{
    core::{
        profile::ensure_worker_profile,
        user::{require_admin, require_user},
        worker::get_worker,
    },
    entities::{Attendance, attendance},
    errors::{Error, Result},
};
use chrono::{Months, NaiveDate, NaiveTime};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

/// Who an attendance record is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerRef {
    /// An existing worker profile
    Worker(i64),
    /// A worker account, whose profile is created if missing
    User(i64),
}

/// Body of an attendance entry.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInput {
    /// Worker profile the entry is for
    pub worker_id: Option<i64>,
    /// Worker account, used when no profile id is given
    pub user_id: Option<i64>,
    /// Calendar day
    pub date: NaiveDate,
    /// `"present"`, `"absent"`, `"half-day"`, ...
    pub status: String,
    /// Clock-in time
    pub check_in: Option<NaiveTime>,
    /// Clock-out time, not before clock-in
    pub check_out: Option<NaiveTime>,
    /// Free-form notes
    pub notes: Option<String>,
}

/// Corrections to a recorded day. Absent fields are left alone.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceChanges {
    /// Corrected status
    pub status: Option<String>,
    /// Corrected clock-in time
    pub check_in: Option<NaiveTime>,
    /// Corrected clock-out time
    pub check_out: Option<NaiveTime>,
    /// Replacement notes
    pub notes: Option<String>,
}

impl AttendanceInput {
    /// Which worker the entry names; a worker id wins over a user id.
    pub fn worker_ref(&self) -> Result<WorkerRef> {
        match (self.worker_id, self.user_id) {
            (Some(worker_id), _) => Ok(WorkerRef::Worker(worker_id)),
            (None, Some(user_id)) => Ok(WorkerRef::User(user_id)),
            (None, None) => Err(Error::validation("workerId, date, and status are required")),
        }
    }
}

fn normalize_status(status: &str) -> Result<String> {
    let status = status.trim().to_lowercase();
    if status.is_empty() {
        return Err(Error::validation("workerId, date, and status are required"));
    }
    Ok(status)
}

fn check_times(check_in: Option<NaiveTime>, check_out: Option<NaiveTime>) -> Result<()> {
    if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
        if check_out < check_in {
            return Err(Error::validation("Check-out is before check-in"));
        }
    }
    Ok(())
}

/// Loads an attendance record or fails with [`Error::NotFound`].
pub async fn get_attendance<C>(db: &C, attendance_id: i64) -> Result<attendance::Model>
where
    C: ConnectionTrait,
{
    Attendance::find_by_id(attendance_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Attendance", attendance_id))
}

async fn resolve_worker<C>(db: &C, worker_ref: WorkerRef) -> Result<i64>
where
    C: ConnectionTrait,
{
    match worker_ref {
        WorkerRef::Worker(worker_id) => Ok(get_worker(db, worker_id).await?.id),
        WorkerRef::User(user_id) => {
            let account = require_user(db, user_id).await?;
            Ok(ensure_worker_profile(db, &account).await?.id)
        }
    }
}

/// Records one day's attendance for a worker.
#[instrument(skip(db, input), fields(date = %input.date))]
pub async fn add_attendance<C>(
    db: &C,
    admin_id: i64,
    input: AttendanceInput,
) -> Result<attendance::Model>
where
    C: ConnectionTrait,
{
    require_admin(db, admin_id).await?;
    let status = normalize_status(&input.status)?;
    check_times(input.check_in, input.check_out)?;
    let worker_id = resolve_worker(db, input.worker_ref()?).await?;

    let record = attendance::ActiveModel {
        worker_id: Set(worker_id),
        date: Set(input.date),
        status: Set(status),
        check_in: Set(input.check_in),
        check_out: Set(input.check_out),
        notes: Set(input.notes),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(attendance_id = record.id, worker_id, "Attendance recorded");
    Ok(record)
}

/// Corrects a recorded day.
#[instrument(skip(db, changes))]
pub async fn update_attendance<C>(
    db: &C,
    admin_id: i64,
    attendance_id: i64,
    changes: AttendanceChanges,
) -> Result<attendance::Model>
where
    C: ConnectionTrait,
{
    require_admin(db, admin_id).await?;
    let existing = get_attendance(db, attendance_id).await?;
    let check_in = changes.check_in.or(existing.check_in);
    let check_out = changes.check_out.or(existing.check_out);
    check_times(check_in, check_out)?;

    let mut active: attendance::ActiveModel = existing.into();
    if let Some(status) = changes.status {
        active.status = Set(normalize_status(&status)?);
    }
    active.check_in = Set(check_in);
    active.check_out = Set(check_out);
    if let Some(notes) = changes.notes {
        active.notes = Set(Some(notes));
    }
    let updated = active.update(db).await?;

    info!(attendance_id, "Attendance updated");
    Ok(updated)
}

/// Removes a recorded day.
#[instrument(skip(db))]
pub async fn delete_attendance<C>(
    db: &C,
    admin_id: i64,
    attendance_id: i64,
) -> Result<attendance::Model>
where
    C: ConnectionTrait,
{
    require_admin(db, admin_id).await?;
    let existing = get_attendance(db, attendance_id).await?;
    Attendance::delete_by_id(attendance_id).exec(db).await?;
    info!(attendance_id, "Attendance deleted");
    Ok(existing)
}

/// A worker's attendance in one calendar month, latest day first.
pub async fn list_attendance<C>(
    db: &C,
    admin_id: i64,
    worker_id: i64,
    year: i32,
    month: u32,
) -> Result<Vec<attendance::Model>>
where
    C: ConnectionTrait,
{
    require_admin(db, admin_id).await?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::validation(format!("Invalid month: {year}-{month}")))?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| Error::validation(format!("Invalid month: {year}-{month}")))?;

    Attendance::find()
        .filter(attendance::Column::WorkerId.eq(worker_id))
        .filter(attendance::Column::Date.gte(first))
        .filter(attendance::Column::Date.lt(next))
        .order_by_desc(attendance::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn entry(worker_ref: WorkerRef, day: u32, status: &str) -> AttendanceInput {
        let (worker_id, user_id) = match worker_ref {
            WorkerRef::Worker(id) => (Some(id), None),
            WorkerRef::User(id) => (None, Some(id)),
        };
        AttendanceInput {
            worker_id,
            user_id,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            status: status.to_string(),
            check_in: NaiveTime::from_hms_opt(9, 0, 0),
            check_out: NaiveTime::from_hms_opt(18, 0, 0),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_user_ref_materializes_profile() -> Result<()> {
        let (ctx, worker) = setup_with_worker("shop1").await?;

        let record = add_attendance(
            &ctx.database,
            ctx.owner_id,
            entry(WorkerRef::User(worker.id), 4, "Present"),
        )
        .await?;

        let profile = worker_profile(&ctx, &worker).await?;
        assert_eq!(record.worker_id, profile.id);
        assert_eq!(record.status, "present");
        Ok(())
    }

    #[tokio::test]
    async fn test_month_listing() -> Result<()> {
        let (ctx, worker) = setup_with_worker("shop1").await?;
        let profile = worker_profile(&ctx, &worker).await?;
        for day in [1, 15, 31] {
            add_attendance(
                &ctx.database,
                ctx.owner_id,
                entry(WorkerRef::Worker(profile.id), day, "present"),
            )
            .await?;
        }

        let march = list_attendance(&ctx.database, ctx.owner_id, profile.id, 2024, 3).await?;
        let days: Vec<_> = march.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(days, vec!["2024-03-31", "2024-03-15", "2024-03-01"]);

        let april = list_attendance(&ctx.database, ctx.owner_id, profile.id, 2024, 4).await?;
        assert!(april.is_empty());

        let result = list_attendance(&ctx.database, ctx.owner_id, profile.id, 2024, 13).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_correct_and_remove_a_day() -> Result<()> {
        let (ctx, worker) = setup_with_worker("shop1").await?;
        let record = add_attendance(
            &ctx.database,
            ctx.owner_id,
            entry(WorkerRef::User(worker.id), 4, "present"),
        )
        .await?;

        let changes = AttendanceChanges {
            status: Some("Half-Day".to_string()),
            check_out: NaiveTime::from_hms_opt(13, 0, 0),
            notes: Some("left early".to_string()),
            ..Default::default()
        };
        let corrected = update_attendance(&ctx.database, ctx.owner_id, record.id, changes).await?;
        assert_eq!(corrected.status, "half-day");
        assert_eq!(corrected.check_in, record.check_in);
        assert_eq!(corrected.check_out, NaiveTime::from_hms_opt(13, 0, 0));
        assert_eq!(corrected.notes.as_deref(), Some("left early"));

        let backwards = AttendanceChanges {
            check_out: NaiveTime::from_hms_opt(8, 0, 0),
            ..Default::default()
        };
        let result = update_attendance(&ctx.database, ctx.owner_id, record.id, backwards).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));

        let result = delete_attendance(&ctx.database, worker.id, record.id).await;
        assert!(matches!(result.unwrap_err(), Error::Unauthorized));

        delete_attendance(&ctx.database, ctx.owner_id, record.id).await?;
        assert!(matches!(
            get_attendance(&ctx.database, record.id).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        let result = delete_attendance(&ctx.database, ctx.owner_id, record.id).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_attendance_requires_admin_and_worker() -> Result<()> {
        let (ctx, worker) = setup_with_worker("shop1").await?;

        let result = add_attendance(
            &ctx.database,
            worker.id,
            entry(WorkerRef::User(worker.id), 4, "present"),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Unauthorized));

        let result = add_attendance(
            &ctx.database,
            ctx.owner_id,
            entry(WorkerRef::Worker(404), 4, "present"),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }
}
