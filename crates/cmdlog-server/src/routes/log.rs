use axum::{Json, extract::State, http::StatusCode};
use cmdlog_core::record::NewRecord;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

// ── POST /api/log ─────────────────────────────────────────────────────────────

/// Log one command-usage record.
///
/// Accepts `{command, category?, context?, extra?, used_at?}` and returns the
/// assigned id with a human-readable confirmation.
///
/// # Errors
///
/// - `400 Bad Request` when `command` is blank.
/// - `500 Internal Server Error` on database failures.
pub async fn log_record(
    State(state): State<AppState>,
    Json(record): Json<NewRecord>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let id = state.store.insert(&record).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "message": format!("logged '{}' (id={id})", record.command),
        })),
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::routes::test_helpers::make_state;

    #[tokio::test]
    async fn blank_command_is_rejected_before_touching_the_db() {
        let app = crate::routes::create_router(make_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/log")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"command":"   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "command must not be blank");
    }

    #[tokio::test]
    async fn missing_command_field_is_rejected() {
        let app = crate::routes::create_router(make_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/log")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"category":"git"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
