use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Creates a connection pool with sensible production defaults.
///
/// # Errors
///
/// Returns an error if the database URL is invalid or a connection cannot be
/// established within the acquire timeout.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .context("failed to connect to database")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[tokio::test]
    async fn create_pool_fails_on_invalid_url() {
        let result = create_pool("not-a-valid-url").await;
        assert!(result.is_err(), "expected error for invalid URL");
    }
}
