use crate::db;
use crate::models::Feed;
use crate::schema::{feeds, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};

#[derive(Insertable)]
#[diesel(table_name = feeds)]
struct NewFeed {
    name: String,
    url: String,
    user_id: i64,
}

pub fn create(conn: &mut PgConnection, name: &str, url: &str, user_id: i64) -> Result<Feed, Error> {
    let new_feed = NewFeed {
        name: name.trim().to_string(),
        url: url.trim().to_string(),
        user_id,
    };

    diesel::insert_into(feeds::table)
        .values(new_feed)
        .get_result::<Feed>(conn)
}

pub fn find(conn: &mut PgConnection, id: i64) -> Option<Feed> {
    feeds::table.filter(feeds::id.eq(id)).first::<Feed>(conn).ok()
}

pub fn find_by_url(conn: &mut PgConnection, url: &str) -> Option<Feed> {
    feeds::table
        .filter(feeds::url.eq(url.trim()))
        .first::<Feed>(conn)
        .ok()
}

/// All feeds paired with their owner's name, oldest first.
pub fn load_with_owners(conn: &mut PgConnection) -> Result<Vec<(Feed, String)>, Error> {
    feeds::table
        .inner_join(users::table)
        .select((Feed::as_select(), users::name))
        .order((feeds::created_at, feeds::id))
        .load::<(Feed, String)>(conn)
}

pub fn next_stale(conn: &mut PgConnection, now: DateTime<Utc>) -> Result<Option<Feed>, Error> {
    feeds::table
        .filter(
            feeds::claimed_until
                .is_null()
                .or(feeds::claimed_until.le(now)),
        )
        .order((feeds::last_fetched_at.asc().nulls_first(), feeds::id.asc()))
        .first::<Feed>(conn)
        .optional()
}

/// Conditional update: succeeds only when nobody holds a live claim on the feed.
pub fn claim(
    conn: &mut PgConnection,
    feed_id: i64,
    now: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<bool, Error> {
    let claimable = feeds::table.filter(feeds::id.eq(feed_id)).filter(
        feeds::claimed_until
            .is_null()
            .or(feeds::claimed_until.le(now)),
    );

    let updated = diesel::update(claimable)
        .set(feeds::claimed_until.eq(until))
        .execute(conn)?;

    Ok(updated == 1)
}

pub fn release(conn: &mut PgConnection, feed_id: i64) -> Result<usize, Error> {
    let no_claim: Option<DateTime<Utc>> = None;

    diesel::update(feeds::table.filter(feeds::id.eq(feed_id)))
        .set(feeds::claimed_until.eq(no_claim))
        .execute(conn)
}

pub fn mark_fetched(
    conn: &mut PgConnection,
    feed_id: i64,
    fetched_at: DateTime<Utc>,
) -> Result<usize, Error> {
    let no_claim: Option<DateTime<Utc>> = None;

    diesel::update(feeds::table.filter(feeds::id.eq(feed_id)))
        .set((
            feeds::last_fetched_at.eq(fetched_at),
            feeds::claimed_until.eq(no_claim),
            feeds::updated_at.eq(db::current_time()),
        ))
        .execute(conn)
}

#[cfg(test)]
mod tests {
    use crate::db;
    use crate::db::users;
    use crate::models::Feed;
    use chrono::{Duration, Utc};
    use diesel::connection::Connection;
    use diesel::result::Error;
    use diesel::PgConnection;

    fn create_feed(connection: &mut PgConnection, name: &str) -> Feed {
        let user = match users::find_by_name(connection, "owner") {
            Some(user) => user,
            None => users::create(connection, "owner").unwrap(),
        };

        super::create(
            connection,
            name,
            &format!("https://{name}.example.com/rss.xml"),
            user.id,
        )
        .unwrap()
    }

    #[test]
    #[ignore]
    fn create_creates_new_feed() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let feed = create_feed(connection, "blog");

            assert_eq!(feed.name, "blog");
            assert_eq!(feed.url, "https://blog.example.com/rss.xml");
            assert_eq!(feed.last_fetched_at, None);
            assert_eq!(feed.claimed_until, None);

            let found_feed = super::find_by_url(connection, &feed.url).unwrap();
            assert_eq!(found_feed.id, feed.id);

            Ok(())
        });
    }

    #[test]
    #[ignore]
    fn create_fails_on_duplicate_url() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let feed = create_feed(connection, "blog");

            let result = super::create(connection, "copy", &feed.url, feed.user_id);

            match result {
                Err(Error::DatabaseError(kind, _)) => assert!(matches!(
                    kind,
                    diesel::result::DatabaseErrorKind::UniqueViolation
                )),
                _ => panic!("Error doesn't match"),
            };

            Ok(())
        });
    }

    #[test]
    #[ignore]
    fn next_stale_returns_never_fetched_feeds_first() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let older = create_feed(connection, "older");
            let newer = create_feed(connection, "newer");
            let never = create_feed(connection, "never");

            let t1 = db::current_time() - Duration::hours(2);
            let t2 = db::current_time() - Duration::hours(1);

            super::mark_fetched(connection, newer.id, t2).unwrap();
            super::mark_fetched(connection, older.id, t1).unwrap();

            let mut visited = vec![];

            for _ in 0..3 {
                let feed = super::next_stale(connection, Utc::now()).unwrap().unwrap();
                visited.push(feed.id);
                super::mark_fetched(connection, feed.id, db::current_time()).unwrap();
            }

            assert_eq!(visited, vec![never.id, older.id, newer.id]);

            Ok(())
        });
    }

    #[test]
    #[ignore]
    fn next_stale_returns_none_without_feeds() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            assert_eq!(super::next_stale(connection, Utc::now()).unwrap(), None);

            Ok(())
        });
    }

    #[test]
    #[ignore]
    fn claim_is_exclusive_until_released() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let feed = create_feed(connection, "blog");
            let until = Utc::now() + Duration::minutes(5);

            assert!(super::claim(connection, feed.id, Utc::now(), until).unwrap());
            assert!(!super::claim(connection, feed.id, Utc::now(), until).unwrap());
            assert_eq!(super::next_stale(connection, Utc::now()).unwrap(), None);

            super::release(connection, feed.id).unwrap();

            assert!(super::claim(connection, feed.id, Utc::now(), until).unwrap());

            Ok(())
        });
    }

    #[test]
    #[ignore]
    fn claim_takes_over_expired_lease() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let feed = create_feed(connection, "blog");
            let expired = Utc::now() - Duration::minutes(1);

            assert!(super::claim(connection, feed.id, Utc::now(), expired).unwrap());
            assert!(super::claim(
                connection,
                feed.id,
                Utc::now(),
                Utc::now() + Duration::minutes(5)
            )
            .unwrap());

            Ok(())
        });
    }

    #[test]
    #[ignore]
    fn mark_fetched_sets_timestamp_and_drops_claim() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            let feed = create_feed(connection, "blog");
            let fetched_at = db::current_time();

            super::claim(
                connection,
                feed.id,
                Utc::now(),
                Utc::now() + Duration::minutes(5),
            )
            .unwrap();

            assert_eq!(super::mark_fetched(connection, feed.id, fetched_at).unwrap(), 1);

            let updated_feed = super::find(connection, feed.id).unwrap();

            assert_eq!(updated_feed.last_fetched_at, Some(fetched_at));
            assert_eq!(updated_feed.claimed_until, None);

            Ok(())
        });
    }

    #[test]
    #[ignore]
    fn mark_fetched_updates_nothing_for_unknown_feed() {
        let mut connection = db::establish_test_connection();

        connection.test_transaction::<_, Error, _>(|connection| {
            assert_eq!(super::mark_fetched(connection, 42, db::current_time()).unwrap(), 0);

            Ok(())
        });
    }
}
