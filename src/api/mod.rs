//! HTTP API - a thin axum layer over [`crate::core`].
//!
//! Handlers decode JSON, pass the caller id from the `x-user-id` header to
//! the core operation and encode the result. Failures become
//! `{ "error": "<message>" }` with the status from [`Error::status_code`].
//!
//! [`Error::status_code`]: crate::errors::Error::status_code

mod accounts;
mod attendance;
pub mod error;
mod expenses;
pub mod extract;
mod funds;
mod items;
mod purchases;
mod reports;
mod sales;
mod workers;

use crate::core::context::AppContext;
use axum::{Extension, Router};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Body of the settlement endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct AmountRequest {
    pub amount: f64,
}

/// Builds the application router.
pub fn create_app(ctx: AppContext) -> Router {
    Router::new()
        .merge(accounts::routes())
        .merge(funds::routes())
        .merge(items::routes())
        .merge(purchases::routes())
        .merge(sales::routes())
        .merge(expenses::routes())
        .merge(workers::routes())
        .merge(attendance::routes())
        .merge(reports::routes())
        .layer(Extension(ctx))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
