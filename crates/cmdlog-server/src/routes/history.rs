use axum::{
    Json,
    extract::{Path, Query, State},
};
use cmdlog_core::record::UsageRecord;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize, Default)]
pub struct HistoryParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

const fn default_limit() -> i64 {
    50
}

// ── GET /api/history ──────────────────────────────────────────────────────────

/// Recent records, newest first.
///
/// `command` filters by case-insensitive substring, `category` by exact
/// equality; an empty result is an empty JSON array, not an error.
///
/// # Errors
///
/// - `500 Internal Server Error` on database failures.
pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<UsageRecord>>, AppError> {
    let limit = params.limit.clamp(1, MAX_LIMIT);
    // Empty query-string values mean "no filter", matching ?command=&category=.
    let command = params.command.as_deref().filter(|c| !c.is_empty());
    let category = params.category.as_deref().filter(|c| !c.is_empty());
    let rows = state.store.history(limit, command, category).await?;
    Ok(Json(rows))
}

// ── DELETE /api/history/{id} ──────────────────────────────────────────────────

/// Delete one record by id.
///
/// Always returns 200; `deleted` reports whether a row was actually removed,
/// so deleting an absent id is not an error.
///
/// # Errors
///
/// - `500 Internal Server Error` on database failures.
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = state.store.delete(id).await?;
    Ok(Json(json!({ "id": id, "deleted": deleted })))
}
