// /api/entries

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use super::AppState;
use super::owner::Owner;
use crate::error::{ApiError, ApiResult};
use crate::models::{Entry, Month, NewEntry};

#[derive(Debug, Deserialize)]
pub(super) struct MonthQuery {
    pub(super) month: Option<String>,
}

impl MonthQuery {
    /// Parses `?month=YYYY-MM`; absent means no month filter.
    pub(super) fn parse(&self) -> ApiResult<Option<Month>> {
        self.month
            .as_deref()
            .map(|m| {
                Month::parse(m)
                    .ok_or_else(|| ApiError::BadRequest(format!("month must be YYYY-MM, got {m}")))
            })
            .transpose()
    }
}

pub(super) async fn list(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<Vec<Entry>>> {
    let month = query.parse()?;
    Ok(Json(state.repo.list_entries(&owner, month).await?))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Json(entry): Json<NewEntry>,
) -> ApiResult<(StatusCode, Json<Entry>)> {
    entry.validate().map_err(ApiError::BadRequest)?;
    let created = state.repo.create_entry(&owner, &entry).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Owner(owner): Owner,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if state.repo.delete_entry(&owner, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("entry"))
    }
}
