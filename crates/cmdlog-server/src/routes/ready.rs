use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

/// Readiness probe: returns 200 only when the database is reachable and
/// migrations have been applied. Returns 503 otherwise.
///
/// For a lighter liveness check that never queries the DB, use `GET /health`.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    // Querying _sqlx_migrations (rather than SELECT 1) confirms both
    // connectivity and that at least one migration has been applied.
    let db_ok = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(state.store.pool())
        .await
        .is_ok();

    let (status, db_status) = if db_ok {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "error")
    };
    (
        status,
        Json(json!({
            "status": if db_ok { "ok" } else { "degraded" },
            "version": env!("CARGO_PKG_VERSION"),
            "database": db_status
        })),
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::routes::test_helpers::down_state;

    #[tokio::test]
    async fn ready_returns_503_and_degraded_status_when_db_is_down() {
        let app = crate::routes::create_router(down_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("failed to get response");

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("failed to parse JSON");
        assert_eq!(json["status"], "degraded", "status should be degraded");
        assert_eq!(json["database"], "error", "database should be error");
    }
}
