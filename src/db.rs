use crate::models::Feed;
use crate::store::{FeedStore, NewPost, PostStore, StoreError, Upsert};
use chrono::prelude::*;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::r2d2;

#[cfg(test)]
use diesel::connection::Connection;

pub mod feed_follows;
pub mod feeds;
pub mod posts;
pub mod users;

pub type DbPool = r2d2::Pool<r2d2::ConnectionManager<PgConnection>>;

#[cfg(test)]
pub fn establish_test_connection() -> PgConnection {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests");

    PgConnection::establish(&url).unwrap_or_else(|_| panic!("Error connecting to {}", url))
}

pub fn current_time() -> DateTime<Utc> {
    Utc::now().round_subsecs(0)
}

pub fn create_connection_pool(url: &str, max_size: u32) -> Result<DbPool, StoreError> {
    let manager = r2d2::ConnectionManager::<PgConnection>::new(url);

    r2d2::Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|error| StoreError::Pool {
            msg: format!("{error:?}"),
        })
}

/// Feed and post storage backed by the connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl FeedStore for PgStore {
    fn next_stale(&self) -> Result<Option<Feed>, StoreError> {
        let mut connection = self.pool.get()?;

        Ok(feeds::next_stale(&mut connection, Utc::now())?)
    }

    fn claim(&self, feed_id: i64, until: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut connection = self.pool.get()?;

        Ok(feeds::claim(&mut connection, feed_id, Utc::now(), until)?)
    }

    fn release(&self, feed_id: i64) -> Result<(), StoreError> {
        let mut connection = self.pool.get()?;

        feeds::release(&mut connection, feed_id)?;

        Ok(())
    }

    fn mark_fetched(&self, feed_id: i64, fetched_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut connection = self.pool.get()?;

        match feeds::mark_fetched(&mut connection, feed_id, fetched_at)? {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }
}

impl PostStore for PgStore {
    fn upsert(&self, post: NewPost) -> Result<Upsert, StoreError> {
        let mut connection = self.pool.get()?;

        match posts::create(&mut connection, &post)? {
            0 => Ok(Upsert::AlreadyExists),
            _ => Ok(Upsert::Created),
        }
    }
}
