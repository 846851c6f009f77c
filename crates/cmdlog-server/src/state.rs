use cmdlog_core::store::Store;

use crate::feed::FeedConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub feed: FeedConfig,
}
