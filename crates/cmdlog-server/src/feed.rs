//! Live feed: polls the store and forwards newly inserted records.
//!
//! Each subscriber gets its own polling task. The task re-reads the newest
//! records every interval and forwards those with an id above the
//! last-forwarded one, oldest first. Bursts larger than the query window
//! within a single interval are silently missed; that is a known limitation
//! of the polling design.

use std::time::Duration;

use cmdlog_core::record::UsageRecord;
use cmdlog_core::store::{Store, StoreError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub poll_interval: Duration,
    /// How many of the newest records each poll re-reads.
    pub window: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            window: 20,
        }
    }
}

/// Subscribe to records created after this call.
///
/// The baseline is the newest id at subscription time, so no backlog is
/// replayed. Dropping the returned stream cancels the polling task.
///
/// # Errors
///
/// Returns an error if the initial baseline read fails.
pub async fn subscribe(
    store: Store,
    config: FeedConfig,
) -> Result<ReceiverStream<UsageRecord>, StoreError> {
    let last_id = store.latest_id().await?;
    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(poll_loop(store, config, last_id, tx));
    Ok(ReceiverStream::new(rx))
}

async fn poll_loop(
    store: Store,
    config: FeedConfig,
    mut last_id: i64,
    tx: mpsc::Sender<UsageRecord>,
) {
    let mut ticker = tokio::time::interval(config.poll_interval);
    // The first tick completes immediately; consume it so the loop sleeps
    // a full interval before its first poll.
    ticker.tick().await;
    loop {
        tokio::select! {
            () = tx.closed() => return,
            _ = ticker.tick() => {}
        }
        let batch = match store.history(config.window, None, None).await {
            Ok(batch) => batch,
            Err(err) => {
                tracing::warn!("feed poll failed: {err}");
                continue;
            }
        };
        for record in fresh_records(batch, last_id) {
            last_id = record.id;
            if tx.send(record).await.is_err() {
                return;
            }
        }
    }
}

/// Records newer than `last_id`, reordered oldest-to-newest for delivery.
fn fresh_records(batch: Vec<UsageRecord>, last_id: i64) -> Vec<UsageRecord> {
    let mut fresh: Vec<UsageRecord> = batch.into_iter().filter(|r| r.id > last_id).collect();
    fresh.sort_by_key(|r| r.id);
    fresh
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::Utc;

    fn record(id: i64) -> UsageRecord {
        UsageRecord {
            id,
            command: format!("/cmd-{id}"),
            category: None,
            context: None,
            extra: None,
            used_at: Utc::now(),
        }
    }

    #[test]
    fn forwards_only_records_above_the_cursor_oldest_first() {
        // Subscriber connected at id 5; 6 and 7 arrived within one interval.
        let batch = vec![record(7), record(6), record(5), record(4)];
        let fresh = fresh_records(batch, 5);
        let ids: Vec<i64> = fresh.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![6, 7]);
    }

    #[test]
    fn empty_batch_yields_nothing() {
        assert!(fresh_records(Vec::new(), 5).is_empty());
    }

    #[test]
    fn batch_with_no_new_records_yields_nothing() {
        let batch = vec![record(5), record(4)];
        assert!(fresh_records(batch, 5).is_empty());
    }

    #[test]
    fn cursor_zero_forwards_everything() {
        let batch = vec![record(2), record(1)];
        let ids: Vec<i64> = fresh_records(batch, 0).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
