//! Purchase endpoints.

use super::{AmountRequest, extract::CurrentUser};
use crate::{
    core::{
        context::AppContext,
        listing::{ListFilter, Page},
        purchase::{self, PurchaseInput},
        settlement,
    },
    entities::PurchaseModel,
    errors::Result,
};
use axum::{
    Extension, Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post, put},
};

pub(crate) fn routes() -> Router {
    Router::new()
        .route("/api/purchases", get(list).post(create))
        .route("/api/purchases/:id", put(update).delete(remove))
        .route("/api/purchases/:id/pay-borrow", post(pay_borrow))
}

async fn list(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Page<PurchaseModel>>> {
    Ok(Json(
        purchase::list_purchases(&ctx.database, user_id, &filter).await?,
    ))
}

async fn create(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<PurchaseInput>,
) -> Result<(StatusCode, Json<PurchaseModel>)> {
    let record = purchase::create_purchase(&ctx, user_id, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Path(purchase_id): Path<i64>,
    Json(input): Json<PurchaseInput>,
) -> Result<Json<PurchaseModel>> {
    Ok(Json(
        purchase::update_purchase(&ctx, user_id, purchase_id, input).await?,
    ))
}

async fn remove(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Path(purchase_id): Path<i64>,
) -> Result<Json<PurchaseModel>> {
    Ok(Json(
        purchase::delete_purchase(&ctx, user_id, purchase_id).await?,
    ))
}

async fn pay_borrow(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(_): CurrentUser,
    Path(purchase_id): Path<i64>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<PurchaseModel>> {
    Ok(Json(
        settlement::settle_purchase_borrow(&ctx, purchase_id, request.amount).await?,
    ))
}
