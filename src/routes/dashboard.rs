// GET /api/dashboard?month=YYYY-MM

use axum::{
    Json,
    extract::{Query, State},
};

use super::AppState;
use super::entries::MonthQuery;
use super::owner::Owner;
use crate::error::ApiResult;
use crate::models::{Dashboard, Month};

/// Defaults to the current local month.
pub(super) async fn get_dashboard(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<Dashboard>> {
    let month = query
        .parse()?
        .unwrap_or_else(|| Month::containing(state.clock.today()));
    Ok(Json(state.repo.dashboard(&owner, month).await?))
}
