//! PostgreSQL store for command-usage records.
//!
//! Every operation is a single round trip against an explicitly constructed
//! [`Store`] handle; there is no global connection state and no transaction
//! spanning calls.

use anyhow::Context as _;
use sqlx::PgPool;

use crate::record::{CategoryCount, CommandCount, DailyCount, NewRecord, StatsSnapshot, UsageRecord};

/// Errors surfaced by store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The database was unreachable or the connection was lost.
    Connection(String),
    /// The write violated a schema constraint (e.g. a blank command).
    Constraint(String),
    /// Any other database failure.
    Query(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(msg) => write!(f, "database unreachable: {msg}"),
            Self::Constraint(msg) => write!(f, "constraint violation: {msg}"),
            Self::Query(msg) => write!(f, "query failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db)
                if matches!(
                    db.kind(),
                    sqlx::error::ErrorKind::UniqueViolation
                        | sqlx::error::ErrorKind::ForeignKeyViolation
                        | sqlx::error::ErrorKind::NotNullViolation
                        | sqlx::error::ErrorKind::CheckViolation
                ) =>
            {
                Self::Constraint(err.to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                Self::Connection(err.to_string())
            }
            _ => Self::Query(err.to_string()),
        }
    }
}

/// Applies all pending migrations to the pool.
///
/// # Errors
///
/// Returns an error if the migrations table cannot be created or a migration
/// fails to apply.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to apply database migrations")?;
    tracing::debug!("database migrations applied");
    Ok(())
}

/// Escape `\`, `%`, and `_` for use in a SQL ILIKE pattern.
///
/// Without escaping, user-supplied `%` or `_` characters would act as ILIKE
/// wildcards instead of matching literally. Backslashes must be escaped first
/// because the queries use `ESCAPE '\\'`.
fn escape_ilike(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Handle to the `command_log` table.
///
/// Cheap to clone; every clone shares the same connection pool.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert one usage record and return the assigned id.
    ///
    /// `used_at` defaults to the database clock when unset.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Constraint`] for a blank `command`, and
    /// [`StoreError::Connection`] / [`StoreError::Query`] on database
    /// failures.
    pub async fn insert(&self, record: &NewRecord) -> Result<i64, StoreError> {
        if record.command.trim().is_empty() {
            return Err(StoreError::Constraint(
                "command must not be blank".to_string(),
            ));
        }
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO command_log (command, category, context, extra, used_at)
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW()))
             RETURNING id",
        )
        .bind(&record.command)
        .bind(record.category.as_deref())
        .bind(record.context.as_deref())
        .bind(record.extra.as_ref())
        .bind(record.used_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Return recent records, newest first.
    ///
    /// `command` filters by case-insensitive substring containment,
    /// `category` by exact equality; both combine with AND.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn history(
        &self,
        limit: i64,
        command: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<UsageRecord>, StoreError> {
        let pattern = command.map(|c| format!("%{}%", escape_ilike(c)));
        let rows = sqlx::query_as::<_, UsageRecord>(
            "SELECT id, command, category, context, extra, used_at
             FROM command_log
             WHERE ($1::TEXT IS NULL OR command ILIKE $1 ESCAPE '\\')
               AND ($2::TEXT IS NULL OR category = $2)
             ORDER BY used_at DESC, id DESC
             LIMIT $3",
        )
        .bind(pattern.as_deref())
        .bind(category)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Compute aggregate usage statistics.
    ///
    /// The daily breakdown covers the trailing 7 calendar days inclusive of
    /// today, ascending by day; days without records are omitted rather than
    /// zero-filled.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the aggregate queries fail.
    pub async fn stats(&self, top_n: i64) -> Result<StatsSnapshot, StoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM command_log")
            .fetch_one(&self.pool)
            .await?;

        let top_commands = sqlx::query_as::<_, CommandCount>(
            "SELECT command, COUNT(*) AS count
             FROM command_log
             GROUP BY command
             ORDER BY count DESC, command
             LIMIT $1",
        )
        .bind(top_n)
        .fetch_all(&self.pool)
        .await?;

        let top_categories = sqlx::query_as::<_, CategoryCount>(
            "SELECT COALESCE(category, '(none)') AS category, COUNT(*) AS count
             FROM command_log
             GROUP BY command_log.category
             ORDER BY count DESC, category
             LIMIT $1",
        )
        .bind(top_n)
        .fetch_all(&self.pool)
        .await?;

        let last_7_days = sqlx::query_as::<_, DailyCount>(
            "SELECT DATE(used_at) AS day, COUNT(*) AS count
             FROM command_log
             WHERE used_at >= CURRENT_DATE - INTERVAL '6 days'
             GROUP BY day
             ORDER BY day",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(StatsSnapshot {
            total,
            top_commands,
            top_categories,
            last_7_days,
        })
    }

    /// Search by case-insensitive substring across `command`, `category`,
    /// and `context`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<UsageRecord>, StoreError> {
        let pattern = format!("%{}%", escape_ilike(query));
        let rows = sqlx::query_as::<_, UsageRecord>(
            "SELECT id, command, category, context, extra, used_at
             FROM command_log
             WHERE command  ILIKE $1 ESCAPE '\\'
                OR category ILIKE $1 ESCAPE '\\'
                OR context  ILIKE $1 ESCAPE '\\'
             ORDER BY used_at DESC, id DESC
             LIMIT $2",
        )
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Delete one record by id; returns whether a row was actually removed.
    ///
    /// Deleting an absent id is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the DELETE fails.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM command_log WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The highest assigned id, or 0 when the table is empty.
    ///
    /// Used by the live feed to establish its no-backlog baseline.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn latest_id(&self) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(id), 0) FROM command_log")
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }
}
