use axum::{
    Json,
    extract::{Query, State},
};
use cmdlog_core::record::StatsSnapshot;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

const MAX_TOP_N: i64 = 100;

#[derive(Debug, Deserialize, Default)]
pub struct StatsParams {
    #[serde(default = "default_top_n")]
    pub top_n: i64,
}

const fn default_top_n() -> i64 {
    10
}

// ── GET /api/stats ────────────────────────────────────────────────────────────

/// Aggregate usage statistics: total count, top commands, top categories,
/// and per-day counts for the trailing 7 days.
///
/// # Errors
///
/// - `500 Internal Server Error` on database failures.
pub async fn get_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<StatsSnapshot>, AppError> {
    let top_n = params.top_n.clamp(1, MAX_TOP_N);
    let stats = state.store.stats(top_n).await?;
    Ok(Json(stats))
}
