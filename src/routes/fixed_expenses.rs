// /api/fixed-expenses

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::AppState;
use super::owner::Owner;
use crate::error::{ApiError, ApiResult};
use crate::models::{FixedExpense, FixedExpenseToggle, NewFixedExpense};

pub(super) async fn list(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> ApiResult<Json<Vec<FixedExpense>>> {
    Ok(Json(state.repo.list_fixed_expenses(&owner).await?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(expense): Json<NewFixedExpense>,
) -> ApiResult<(StatusCode, Json<FixedExpense>)> {
    expense.validate().map_err(ApiError::BadRequest)?;
    let created = state.repo.create_fixed_expense(&owner, &expense).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/fixed-expenses/{id} — pause or resume.
pub(super) async fn toggle(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<i64>,
    Json(toggle): Json<FixedExpenseToggle>,
) -> ApiResult<Json<FixedExpense>> {
    let expense = state
        .repo
        .set_fixed_expense_active(&owner, id, toggle.active)
        .await?
        .ok_or(ApiError::NotFound("fixed expense"))?;
    Ok(Json(expense))
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if state.repo.delete_fixed_expense(&owner, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("fixed expense"))
    }
}
