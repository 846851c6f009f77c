mod health;
mod history;
mod live;
mod log;
mod ready;
mod search;
mod stats;

#[cfg(test)]
pub(crate) mod test_helpers;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(ready::ready))
        .route("/api/log", post(log::log_record))
        .route("/api/history", get(history::get_history))
        .route("/api/history/{id}", delete(history::delete_record))
        .route("/api/stats", get(stats::get_stats))
        .route("/api/search", get(search::search_records))
        .route("/api/live", get(live::live))
        .with_state(state)
}
