use async_trait::async_trait;
use logreport_core::AppResult;
use logreport_domain::{ActivityLogEntry, ActivityLogQuery};

/// Port executing activity log queries, one page at a time.
#[async_trait]
pub trait ActivityLogReader: Send + Sync {
    /// Returns the rows selected by the query's window and ordering.
    async fn fetch_page(&self, query: &ActivityLogQuery) -> AppResult<Vec<ActivityLogEntry>>;

    /// Returns how many rows match the query's filter, ignoring the window.
    async fn count(&self, query: &ActivityLogQuery) -> AppResult<u64>;
}
