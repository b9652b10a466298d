// /api/goals: CRUD, manual deposits, and the auto-deposit backfill pass

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use super::AppState;
use super::owner::Owner;
use crate::backfill::{self, BackfillReport, GoalStore};
use crate::error::{ApiError, ApiResult};
use crate::models::{GoalUpdate, GoalView, ManualDeposit, NewGoal};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GoalsResponse {
    goals: Vec<GoalView>,
    notification: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BackfillResponse {
    #[serde(flatten)]
    report: BackfillReport,
    notification: Option<String>,
}

/// GET /api/goals — reads the owner's goals, applying due auto-deposits first.
pub(super) async fn list(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> ApiResult<Json<GoalsResponse>> {
    let (goals, notification) = if state.config.goals.backfill_on_read {
        let (goals, report) =
            backfill::load_and_backfill(state.repo.as_ref(), &owner, state.clock.as_ref())
                .await?;
        (goals, report.notification())
    } else {
        (state.repo.list_goals(&owner).await?, None)
    };
    Ok(Json(GoalsResponse {
        goals: goals.into_iter().map(GoalView::from).collect(),
        notification,
    }))
}

/// POST /api/goals/backfill — explicit refresh.
pub(super) async fn refresh(
    State(state): State<AppState>,
    Owner(owner): Owner,
) -> ApiResult<Json<BackfillResponse>> {
    let (_, report) =
        backfill::load_and_backfill(state.repo.as_ref(), &owner, state.clock.as_ref()).await?;
    let notification = report.notification();
    Ok(Json(BackfillResponse {
        report,
        notification,
    }))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(goal): Json<NewGoal>,
) -> ApiResult<(StatusCode, Json<GoalView>)> {
    goal.validate().map_err(ApiError::BadRequest)?;
    let created = state.repo.create_goal(&owner, &goal).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /api/goals/{id}. Applies due auto-deposits first, same as the list read.
pub(super) async fn get_one(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<i64>,
) -> ApiResult<Json<GoalView>> {
    let mut goal = state
        .repo
        .get_goal(&owner, id)
        .await?
        .ok_or(ApiError::NotFound("goal"))?;
    if state.config.goals.backfill_on_read {
        backfill::run_backfill(
            state.repo.as_ref(),
            std::slice::from_mut(&mut goal),
            state.clock.now(),
        )
        .await;
    }
    Ok(Json(goal.into()))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<i64>,
    Json(update): Json<GoalUpdate>,
) -> ApiResult<Json<GoalView>> {
    update.validate().map_err(ApiError::BadRequest)?;
    let goal = state
        .repo
        .update_goal(&owner, id, &update)
        .await?
        .ok_or(ApiError::NotFound("goal"))?;
    Ok(Json(goal.into()))
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if state.repo.delete_goal(&owner, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("goal"))
    }
}

/// POST /api/goals/{id}/deposits
pub(super) async fn deposit(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<i64>,
    Json(deposit): Json<ManualDeposit>,
) -> ApiResult<Json<GoalView>> {
    if !(deposit.amount.is_finite() && deposit.amount > 0.0) {
        return Err(ApiError::BadRequest(format!(
            "amount must be > 0, got {}",
            deposit.amount
        )));
    }
    let goal = state
        .repo
        .add_manual_deposit(&owner, id, deposit.amount)
        .await?
        .ok_or(ApiError::NotFound("goal"))?;
    Ok(Json(goal.into()))
}
