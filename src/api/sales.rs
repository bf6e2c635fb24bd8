//! Sale endpoints.

use super::{AmountRequest, extract::CurrentUser};
use crate::{
    core::{
        context::AppContext,
        listing::{ListFilter, Page},
        sale::{self, SaleInput},
        settlement,
    },
    entities::SaleModel,
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
        .route("/api/sales", get(list).post(create))
        .route("/api/sales/:id", put(update).delete(remove))
        .route("/api/sales/:id/pay-borrow", post(pay_borrow))
}

async fn list(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Page<SaleModel>>> {
    Ok(Json(sale::list_sales(&ctx.database, user_id, &filter).await?))
}

async fn create(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<SaleInput>,
) -> Result<(StatusCode, Json<SaleModel>)> {
    let record = sale::create_sale(&ctx.database, user_id, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Path(sale_id): Path<i64>,
    Json(input): Json<SaleInput>,
) -> Result<Json<SaleModel>> {
    Ok(Json(
        sale::update_sale(&ctx.database, user_id, sale_id, input).await?,
    ))
}

async fn remove(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Path(sale_id): Path<i64>,
) -> Result<Json<SaleModel>> {
    Ok(Json(sale::delete_sale(&ctx.database, user_id, sale_id).await?))
}

async fn pay_borrow(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(_): CurrentUser,
    Path(sale_id): Path<i64>,
    Json(request): Json<AmountRequest>,
) -> Result<Json<SaleModel>> {
    Ok(Json(
        settlement::settle_sale_borrow(&ctx.database, sale_id, request.amount).await?,
    ))
}
