use crate::db;
use crate::models::Feed;
use crate::store::{NewPost, PostStore, StoreError, Upsert};
use crate::sync::FetchedFeedItem;
use log::{debug, error, warn};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("item {title:?} has no link")]
    MissingLink { title: String },
}

/// Turns fetched items into posts, skipping the ones already stored.
pub struct Ingestor<'a> {
    posts: &'a dyn PostStore,
}

impl<'a> Ingestor<'a> {
    pub fn new(posts: &'a dyn PostStore) -> Self {
        Self { posts }
    }

    /// Returns the number of created posts. A storage failure stops ingestion;
    /// posts written before it stay.
    pub fn store(&self, feed: &Feed, items: Vec<FetchedFeedItem>) -> Result<usize, StoreError> {
        let mut created = 0;

        for item in items {
            let post = match new_post(feed, item) {
                Ok(post) => post,
                Err(error) => {
                    warn!("Skipping item of feed {}: {}", feed.name, error);
                    continue;
                }
            };

            match self.posts.upsert(post) {
                Ok(Upsert::Created) => created += 1,
                Ok(Upsert::AlreadyExists) => (),
                Err(error) => {
                    error!(
                        "Failed to store posts of feed {} after {} new posts: {}",
                        feed.name, created, error
                    );

                    return Err(error);
                }
            }
        }

        debug!("Stored {} new posts for feed {}", created, feed.name);

        Ok(created)
    }
}

fn new_post(feed: &Feed, item: FetchedFeedItem) -> Result<NewPost, ItemError> {
    if item.link.trim().is_empty() {
        return Err(ItemError::MissingLink { title: item.title });
    }

    Ok(NewPost {
        feed_id: feed.id,
        title: item.title,
        url: item.link,
        description: item.description,
        published_at: item.publication_date,
        created_at: db::current_time(),
    })
}
