//! Read-only report endpoints (admin only).

use super::extract::CurrentUser;
use crate::{
    core::{
        context::AppContext,
        report::{self, ShopSummary},
    },
    errors::Result,
};
use axum::{Extension, Json, Router, extract::Path, routing::get};

pub(crate) fn routes() -> Router {
    Router::new().route("/api/reports/shops/:shop_id", get(shop_summary))
}

async fn shop_summary(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(admin_id): CurrentUser,
    Path(shop_id): Path<String>,
) -> Result<Json<ShopSummary>> {
    Ok(Json(
        report::shop_summary(&ctx.database, admin_id, &shop_id).await?,
    ))
}
