use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One logged command-usage event.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UsageRecord {
    pub id: i64,
    pub command: String,
    pub category: Option<String>,
    pub context: Option<String>,
    /// Opaque structured side-data; stored and returned verbatim, never queried.
    pub extra: Option<serde_json::Value>,
    pub used_at: DateTime<Utc>,
}

/// Parameters for inserting one usage record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewRecord {
    pub command: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub extra: Option<serde_json::Value>,
    /// Defaults to the database clock when unset.
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
}

/// Aggregate usage statistics.
#[derive(Debug, Serialize)]
pub struct StatsSnapshot {
    pub total: i64,
    pub top_commands: Vec<CommandCount>,
    pub top_categories: Vec<CategoryCount>,
    pub last_7_days: Vec<DailyCount>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CommandCount {
    pub command: String,
    pub count: i64,
}

/// Records without a category are grouped under the `(none)` label.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}
