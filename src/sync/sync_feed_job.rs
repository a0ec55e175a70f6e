use crate::db;
use crate::models::Feed;
use crate::store::{FeedStore, PostStore, StoreError};
use crate::sync::ingestor::Ingestor;
use crate::sync::reader::{FeedReaderError, ReadFeed, RssReader};
use log::{error, info};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedSyncError {
    #[error(transparent)]
    Reader(#[from] FeedReaderError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fetches one claimed feed, stores its new posts and marks it fetched.
pub struct SyncFeedJob {
    feed: Feed,
    feed_store: Arc<dyn FeedStore>,
    post_store: Arc<dyn PostStore>,
}

impl SyncFeedJob {
    pub fn new(feed: Feed, feed_store: Arc<dyn FeedStore>, post_store: Arc<dyn PostStore>) -> Self {
        Self {
            feed,
            feed_store,
            post_store,
        }
    }

    /// Never fails: errors are logged and the claim on the feed is released.
    pub fn sync_feed(&self) -> Option<usize> {
        info!("Fetching feed {} ({})", self.feed.name, self.feed.url);

        match self.execute() {
            Ok(created) => {
                info!(
                    "Fetched feed {}: {} new posts",
                    self.feed.name, created
                );

                Some(created)
            }
            Err(error) => {
                match &error {
                    FeedSyncError::Store(_) => {
                        error!("Storage failure while syncing feed {}: {}", self.feed.name, error)
                    }
                    FeedSyncError::Reader(_) => {
                        error!("Failed to sync feed {}: {}", self.feed.name, error)
                    }
                }

                self.release_claim();

                None
            }
        }
    }

    fn execute(&self) -> Result<usize, FeedSyncError> {
        let fetched_feed = self.read_feed()?;

        let created = Ingestor::new(self.post_store.as_ref()).store(&self.feed, fetched_feed.items)?;

        self.feed_store
            .mark_fetched(self.feed.id, db::current_time())?;

        Ok(created)
    }

    fn read_feed(&self) -> Result<crate::sync::FetchedFeed, FeedReaderError> {
        RssReader {
            url: self.feed.url.clone(),
        }
        .read()
    }

    fn release_claim(&self) {
        if let Err(error) = self.feed_store.release(self.feed.id) {
            error!(
                "Failed to release the claim on feed {}: {}",
                self.feed.name, error
            );
        }
    }
}
