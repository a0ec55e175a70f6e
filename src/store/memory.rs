use super::{FeedStore, NewPost, PostStore, StoreError, Upsert};
use crate::db;
use crate::models::Feed;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

fn is_claimed_at(feed: &Feed, time: DateTime<Utc>) -> bool {
    matches!(feed.claimed_until, Some(until) if until > time)
}

#[derive(Default)]
pub struct MemoryStore {
    feeds: Mutex<Vec<Feed>>,
    posts: Mutex<Vec<NewPost>>,
    failing_upserts_after: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_feed(&self, name: &str, url: &str, last_fetched_at: Option<DateTime<Utc>>) -> Feed {
        let mut feeds = self.feeds.lock().unwrap();
        let now = db::current_time();

        let feed = Feed {
            id: feeds.len() as i64 + 1,
            name: name.to_string(),
            url: url.to_string(),
            user_id: 1,
            last_fetched_at,
            claimed_until: None,
            created_at: now,
            updated_at: now,
        };

        feeds.push(feed.clone());

        feed
    }

    pub fn feed(&self, feed_id: i64) -> Option<Feed> {
        self.feeds
            .lock()
            .unwrap()
            .iter()
            .find(|feed| feed.id == feed_id)
            .cloned()
    }

    pub fn posts(&self, feed_id: i64) -> Vec<NewPost> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .filter(|post| post.feed_id == feed_id)
            .cloned()
            .collect()
    }

    /// Makes every upsert after the first `count` successful ones fail.
    pub fn fail_upserts_after(&self, count: usize) {
        *self.failing_upserts_after.lock().unwrap() = Some(count);
    }
}

impl FeedStore for MemoryStore {
    fn next_stale(&self) -> Result<Option<Feed>, StoreError> {
        let now = Utc::now();

        let feed = self
            .feeds
            .lock()
            .unwrap()
            .iter()
            .filter(|feed| !is_claimed_at(feed, now))
            .min_by_key(|feed| (feed.last_fetched_at, feed.id))
            .cloned();

        Ok(feed)
    }

    fn claim(&self, feed_id: i64, until: DateTime<Utc>) -> Result<bool, StoreError> {
        let now = Utc::now();
        let mut feeds = self.feeds.lock().unwrap();
        let feed = feeds
            .iter_mut()
            .find(|feed| feed.id == feed_id)
            .ok_or(StoreError::NotFound)?;

        if is_claimed_at(feed, now) {
            return Ok(false);
        }

        feed.claimed_until = Some(until);

        Ok(true)
    }

    fn release(&self, feed_id: i64) -> Result<(), StoreError> {
        let mut feeds = self.feeds.lock().unwrap();
        let feed = feeds
            .iter_mut()
            .find(|feed| feed.id == feed_id)
            .ok_or(StoreError::NotFound)?;

        feed.claimed_until = None;

        Ok(())
    }

    fn mark_fetched(&self, feed_id: i64, fetched_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut feeds = self.feeds.lock().unwrap();
        let feed = feeds
            .iter_mut()
            .find(|feed| feed.id == feed_id)
            .ok_or(StoreError::NotFound)?;

        feed.last_fetched_at = Some(fetched_at);
        feed.claimed_until = None;
        feed.updated_at = fetched_at;

        Ok(())
    }
}

impl PostStore for MemoryStore {
    fn upsert(&self, post: NewPost) -> Result<Upsert, StoreError> {
        let mut posts = self.posts.lock().unwrap();

        if let Some(limit) = *self.failing_upserts_after.lock().unwrap() {
            if posts.len() >= limit {
                return Err(StoreError::Database {
                    msg: "connection reset".to_string(),
                });
            }
        }

        if posts
            .iter()
            .any(|existing| existing.feed_id == post.feed_id && existing.url == post.url)
        {
            return Ok(Upsert::AlreadyExists);
        }

        posts.push(post);

        Ok(Upsert::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryStore;
    use crate::store::FeedStore;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn next_stale_follows_staleness_for_every_insertion_order() {
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let t2 = t1 + Duration::hours(1);
        let feeds = [("A", None), ("B", Some(t1)), ("C", Some(t2))];
        let orders = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        for order in orders {
            let store = MemoryStore::new();

            for index in order {
                let (name, last_fetched_at) = feeds[index];
                store.add_feed(name, &format!("https://{name}.example.com/rss"), last_fetched_at);
            }

            let mut visited = vec![];

            for _ in 0..3 {
                let feed = store.next_stale().unwrap().unwrap();
                visited.push(feed.name.clone());
                store.mark_fetched(feed.id, Utc::now()).unwrap();
            }

            assert_eq!(visited, vec!["A", "B", "C"], "insertion order {order:?}");
        }
    }

    #[test]
    fn next_stale_skips_claimed_feeds() {
        let store = MemoryStore::new();
        let first = store.add_feed("first", "https://first.example.com/rss", None);
        let second = store.add_feed("second", "https://second.example.com/rss", None);

        assert!(store
            .claim(first.id, Utc::now() + Duration::minutes(5))
            .unwrap());

        assert_eq!(store.next_stale().unwrap().unwrap().id, second.id);
        assert!(!store
            .claim(first.id, Utc::now() + Duration::minutes(5))
            .unwrap());
    }
}
