use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::{Stream, StreamExt as _};

use crate::error::AppError;
use crate::feed;
use crate::state::AppState;

// ── GET /api/live ─────────────────────────────────────────────────────────────

/// SSE stream pushing one JSON-encoded record per newly logged row.
///
/// Only records created after the subscription are delivered; closing the
/// connection cancels the underlying polling task.
///
/// # Errors
///
/// - `500 Internal Server Error` if the feed cannot establish its baseline.
pub async fn live(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let records = feed::subscribe(state.store.clone(), state.feed.clone()).await?;
    let events = records.map(|record| Event::default().json_data(&record));
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
