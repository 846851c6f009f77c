use axum::{
    Json,
    extract::{Query, State},
};
use cmdlog_core::record::UsageRecord;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

const MAX_LIMIT: i64 = 100;
const MAX_QUERY_LEN: usize = 200;

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

const fn default_limit() -> i64 {
    20
}

// ── GET /api/search ───────────────────────────────────────────────────────────

/// Search records by case-insensitive substring across the command,
/// category, and context fields, newest first.
///
/// # Errors
///
/// - `400 Bad Request` when `q` is missing, blank, or longer than 200
///   characters.
/// - `500 Internal Server Error` on database failures.
pub async fn search_records(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<UsageRecord>>, AppError> {
    if params.q.trim().is_empty() {
        return Err(AppError::BadRequest("q parameter required".to_string()));
    }
    // Reject unreasonably long queries to prevent DB performance issues.
    if params.q.len() > MAX_QUERY_LEN {
        return Err(AppError::BadRequest(
            "search query must not exceed 200 characters".to_string(),
        ));
    }
    let limit = params.limit.clamp(1, MAX_LIMIT);
    let rows = state.store.search(&params.q, limit).await?;
    Ok(Json(rows))
}
