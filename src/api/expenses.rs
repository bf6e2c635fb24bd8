//! Worker expense endpoints.

use super::extract::CurrentUser;
use crate::{
    core::{
        context::AppContext,
        expense::{self, ExpenseReceipt},
    },
    entities::WorkerExpenseModel,
    errors::Result,
};
use axum::{
    Extension, Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{delete, get},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NewExpense {
    title: String,
    amount: f64,
}

pub(crate) fn routes() -> Router {
    Router::new()
        .route("/api/worker-expense", get(list).post(create))
        .route("/api/worker-expense/:id", delete(remove))
}

async fn list(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<WorkerExpenseModel>>> {
    Ok(Json(expense::list_expenses(&ctx.database, user_id).await?))
}

async fn create(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Json(request): Json<NewExpense>,
) -> Result<(StatusCode, Json<ExpenseReceipt>)> {
    let receipt = expense::create_expense(&ctx, user_id, &request.title, request.amount).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn remove(
    Extension(ctx): Extension<AppContext>,
    CurrentUser(user_id): CurrentUser,
    Path(expense_id): Path<i64>,
) -> Result<Json<WorkerExpenseModel>> {
    Ok(Json(
        expense::delete_expense(&ctx, user_id, expense_id).await?,
    ))
}
