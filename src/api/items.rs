//! Item endpoints.

use super::extract::CurrentUser;
use crate::{
    core::{context::AppContext, item, user::require_user},
    entities::ItemModel,
    errors::Result,
};
use axum::{Extension, Json, Router, http::StatusCode, routing::get};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NewItem {
    name: String,
    #[serde(default = "default_unit")]
    unit: String,
    #[serde(default = "default_category")]
    category: String,
}

fn default_unit() -> String {
    "kg".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

pub(crate) fn routes() -> Router {
    Router::new().route("/api/items", get(list).post(create))
}

async fn list(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<ItemModel>>> {
    Ok(Json(item::list_items(&ctx.database, user_id).await?))
}

async fn create(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<NewItem>,
) -> Result<(StatusCode, Json<ItemModel>)> {
    require_user(&ctx.database, user_id).await?;
    let created = item::create_item(
        &ctx.database,
        user_id,
        &request.name,
        &request.unit,
        &request.category,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
