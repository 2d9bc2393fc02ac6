use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};

use stockroom_inventory::{Item, ItemQuery};

/// A live, filtered view over the item set.
///
/// Backed by the directory's snapshot channel: every committed write
/// publishes a new full snapshot, which each view re-filters. A slow reader
/// sees the latest snapshot; intermediate ones may be skipped.
#[derive(Debug, Clone)]
pub struct LiveItems {
    query: ItemQuery,
    rx: watch::Receiver<Arc<Vec<Item>>>,
}

impl LiveItems {
    pub(crate) fn new(query: ItemQuery, mut rx: watch::Receiver<Arc<Vec<Item>>>) -> Self {
        // Only writes committed after subscription count as "next".
        let _ = rx.borrow_and_update();
        Self { query, rx }
    }

    pub fn query(&self) -> &ItemQuery {
        &self.query
    }

    /// Items matching the query in the latest snapshot.
    pub fn current(&self) -> Vec<Item> {
        self.query.apply(&self.rx.borrow())
    }

    /// Wait for the next committed write and return the refreshed view.
    ///
    /// Returns `None` once the directory has shut down.
    pub async fn next(&mut self) -> Option<Vec<Item>> {
        self.rx.changed().await.ok()?;
        let snapshot = self.rx.borrow_and_update().clone();
        Some(self.query.apply(&snapshot))
    }

    /// Stream that yields the current view immediately, then a refreshed view
    /// after every committed write.
    pub fn into_stream(self) -> impl Stream<Item = Vec<Item>> + Send + 'static {
        let query = self.query;
        WatchStream::new(self.rx).map(move |snapshot| query.apply(&snapshot))
    }
}
