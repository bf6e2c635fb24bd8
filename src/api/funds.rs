//! Shop fund endpoints.

use super::extract::CurrentUser;
use crate::{
    core::{
        context::AppContext,
        ledger::{self, FundSummary},
    },
    entities::WorkerFundModel,
    errors::Result,
};
use axum::{Extension, Json, Router, http::StatusCode, routing::get};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreditRequest {
    amount: f64,
    given_by: Option<String>,
}

pub(crate) fn routes() -> Router {
    Router::new().route("/api/funds", get(summary).post(add_fund))
}

async fn summary(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<FundSummary>> {
    Ok(Json(ledger::query(&ctx, user_id).await?))
}

async fn add_fund(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<CreditRequest>,
) -> Result<(StatusCode, Json<WorkerFundModel>)> {
    let given_by = request.given_by.unwrap_or_else(|| "owner".to_string());
    let entry = ledger::credit(&ctx, user_id, request.amount, given_by).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
