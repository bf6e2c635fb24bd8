//! Attendance endpoints (admin only).

use super::extract::CurrentUser;
use crate::{
    core::{
        attendance::{self, AttendanceChanges, AttendanceInput},
        context::AppContext,
    },
    entities::AttendanceModel,
    errors::Result,
};
use axum::{
    Extension, Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, put},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonthQuery {
    worker_id: i64,
    year: i32,
    month: u32,
}

pub(crate) fn routes() -> Router {
    Router::new()
        .route("/api/attendance", get(list).post(create))
        .route("/api/attendance/:id", put(update).delete(remove))
}

async fn list(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(admin_id): CurrentUser,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<AttendanceModel>>> {
    Ok(Json(
        attendance::list_attendance(
            &ctx.database,
            admin_id,
            query.worker_id,
            query.year,
            query.month,
        )
        .await?,
    ))
}

async fn create(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(admin_id): CurrentUser,
    Json(input): Json<AttendanceInput>,
) -> Result<(StatusCode, Json<AttendanceModel>)> {
    let record = attendance::add_attendance(&ctx.database, admin_id, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(admin_id): CurrentUser,
    Path(attendance_id): Path<i64>,
    Json(changes): Json<AttendanceChanges>,
) -> Result<Json<AttendanceModel>> {
    Ok(Json(
        attendance::update_attendance(&ctx.database, admin_id, attendance_id, changes).await?,
    ))
}

async fn remove(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(admin_id): CurrentUser,
    Path(attendance_id): Path<i64>,
) -> Result<Json<AttendanceModel>> {
    Ok(Json(
        attendance::delete_attendance(&ctx.database, admin_id, attendance_id).await?,
    ))
}
