//! Data-access contracts the sync pipeline depends on.
//!
//! `db::PgStore` implements them on top of PostgreSQL.

use crate::models::Feed;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[cfg(test)]
pub mod memory;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("database error: {msg}")]
    Database { msg: String },
    #[error("failed to fetch a connection from the pool: {msg}")]
    Pool { msg: String },
}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => StoreError::NotFound,
            error => StoreError::Database {
                msg: format!("{error:?}"),
            },
        }
    }
}

impl From<diesel::r2d2::PoolError> for StoreError {
    fn from(error: diesel::r2d2::PoolError) -> Self {
        StoreError::Pool {
            msg: format!("{error:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub feed_id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    AlreadyExists,
}

#[cfg_attr(test, automock)]
pub trait FeedStore: Send + Sync {
    /// Oldest `last_fetched_at` first, never-fetched feeds before all others.
    /// Feeds holding a live claim are skipped.
    fn next_stale(&self) -> Result<Option<Feed>, StoreError>;

    /// Takes the lease on a feed. Returns `false` if someone else holds it.
    fn claim(&self, feed_id: i64, until: DateTime<Utc>) -> Result<bool, StoreError>;

    fn release(&self, feed_id: i64) -> Result<(), StoreError>;

    /// Sets `last_fetched_at` and drops the lease.
    fn mark_fetched(&self, feed_id: i64, fetched_at: DateTime<Utc>) -> Result<(), StoreError>;
}

#[cfg_attr(test, automock)]
pub trait PostStore: Send + Sync {
    /// Inserts unless a post with the same `(feed_id, url)` exists.
    fn upsert(&self, post: NewPost) -> Result<Upsert, StoreError>;
}
