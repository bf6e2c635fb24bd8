//! Worker administration endpoints (admin only).

use super::extract::CurrentUser;
use crate::{
    core::{
        context::AppContext,
        worker::{self, NewWorker, WorkerChanges, WorkerDetail, WorkerView},
    },
    errors::Result,
};
use axum::{
    Extension, Json, Router,
    extract::Path,
    http::StatusCode,
    routing::get,
};

pub(crate) fn routes() -> Router {
    Router::new()
        .route("/api/workers", get(list).post(create))
        .route("/api/workers/:id", get(detail).put(update).delete(remove))
}

async fn list(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(admin_id): CurrentUser,
) -> Result<Json<Vec<WorkerView>>> {
    Ok(Json(worker::list_workers(&ctx.database, admin_id).await?))
}

async fn create(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(admin_id): CurrentUser,
    Json(input): Json<NewWorker>,
) -> Result<(StatusCode, Json<WorkerView>)> {
    let view = worker::add_worker(&ctx, admin_id, input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn detail(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(admin_id): CurrentUser,
    Path(worker_id): Path<i64>,
) -> Result<Json<WorkerDetail>> {
    Ok(Json(
        worker::get_worker_detail(&ctx.database, admin_id, worker_id).await?,
    ))
}

async fn update(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(admin_id): CurrentUser,
    Path(worker_id): Path<i64>,
    Json(changes): Json<WorkerChanges>,
) -> Result<Json<WorkerView>> {
    Ok(Json(
        worker::update_worker(&ctx.database, admin_id, worker_id, changes).await?,
    ))
}

async fn remove(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(admin_id): CurrentUser,
    Path(worker_id): Path<i64>,
) -> Result<StatusCode> {
    worker::delete_worker(&ctx.database, admin_id, worker_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
