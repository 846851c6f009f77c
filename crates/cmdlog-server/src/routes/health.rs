use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// Liveness probe: always returns 200 while the process is running.
///
/// This endpoint never queries the database, so it remains responsive even
/// when the DB is unavailable. For a readiness check that verifies DB
/// connectivity, use `GET /ready`.
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
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

    use crate::routes::test_helpers::make_state;

    #[tokio::test]
    async fn health_always_returns_200() {
        let app = crate::routes::create_router(make_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("failed to get response");

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_returns_status_and_version_fields() {
        let app = crate::routes::create_router(make_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("failed to build request"),
            )
            .await
            .expect("failed to get response");

        let body = resp
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).expect("failed to parse JSON");
        assert_eq!(json["status"], "ok", "status should always be ok");
        assert!(
            json["version"].is_string(),
            "version field should be present"
        );
    }
}
