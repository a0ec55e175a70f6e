use crate::db;
use crate::models::Feed;
use crate::store::{FeedStore, PostStore, StoreError};
use crate::sync::sync_feed_job::SyncFeedJob;
use chrono::Duration;
use log::{debug, error, info};
use std::sync::Arc;
use tokio::task::JoinSet;

/// One scheduler cycle: claims up to `workers` of the stalest feeds and syncs them.
#[derive(Clone)]
pub struct SyncJob {
    feed_store: Arc<dyn FeedStore>,
    post_store: Arc<dyn PostStore>,
    workers: usize,
    lease: Duration,
}

impl SyncJob {
    pub fn new(
        feed_store: Arc<dyn FeedStore>,
        post_store: Arc<dyn PostStore>,
        workers: usize,
        lease: std::time::Duration,
    ) -> Self {
        Self {
            feed_store,
            post_store,
            workers: workers.max(1),
            lease: Duration::from_std(lease).unwrap_or_else(|_| Duration::minutes(5)),
        }
    }

    /// Returns the number of feeds synced successfully.
    pub async fn execute(&self) -> Result<usize, StoreError> {
        let job = self.clone();

        let feeds = match tokio::task::spawn_blocking(move || job.claim_feeds()).await {
            Ok(result) => result?,
            Err(join_error) => {
                error!("Feed selection panicked: {}", join_error);
                return Ok(0);
            }
        };

        if feeds.is_empty() {
            debug!("No feeds to sync");
            return Ok(0);
        }

        let mut tasks = JoinSet::new();

        for feed in feeds {
            let sync_feed_job =
                SyncFeedJob::new(feed, self.feed_store.clone(), self.post_store.clone());

            tasks.spawn_blocking(move || sync_feed_job.sync_feed());
        }

        let mut synced = 0;

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Some(_)) => synced += 1,
                Ok(None) => (),
                Err(join_error) => error!("Feed sync task panicked: {}", join_error),
            }
        }

        info!("Synced {} feeds", synced);

        Ok(synced)
    }

    /// Selects and claims feeds in staleness order. A feed claimed by someone
    /// else in between is skipped, and a feed is never handed out twice.
    pub fn claim_feeds(&self) -> Result<Vec<Feed>, StoreError> {
        let mut claimed = Vec::with_capacity(self.workers);
        let max_attempts = self.workers * 2;

        for _ in 0..max_attempts {
            if claimed.len() == self.workers {
                break;
            }

            let feed = match self.feed_store.next_stale()? {
                Some(feed) => feed,
                None => break,
            };

            if claimed.iter().any(|taken: &Feed| taken.id == feed.id) {
                debug!("Feed {} is already claimed by this cycle", feed.name);
                break;
            }

            let until = db::current_time() + self.lease;

            if self.feed_store.claim(feed.id, until)? {
                claimed.push(feed);
            } else {
                debug!("Feed {} was claimed by another worker", feed.name);
            }
        }

        Ok(claimed)
    }
}
