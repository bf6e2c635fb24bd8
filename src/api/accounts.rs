//! Account registration and health check.

use crate::{
    core::{context::AppContext, user},
    entities::UserModel,
    errors::Result,
};
use axum::{Extension, Json, Router, http::StatusCode, routing::{get, post}};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    name: String,
    #[serde(default)]
    role: user::Role,
    shop_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

pub(crate) fn routes() -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/register", post(register))
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn register(
    Extension(ctx): Extension<AppContext>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserModel>)> {
    let account =
        user::register_user(&ctx.database, &request.name, request.role, request.shop_id).await?;
    Ok((StatusCode::CREATED, Json(account)))
}
