use crate::models::{Feed, FeedFollow};
use crate::schema::{feed_follows, feeds};
use diesel::prelude::*;
use diesel::result::Error;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};

#[derive(Insertable)]
#[diesel(table_name = feed_follows)]
struct NewFeedFollow {
    user_id: i64,
    feed_id: i64,
}

pub fn create(conn: &mut PgConnection, user_id: i64, feed_id: i64) -> Result<FeedFollow, Error> {
    diesel::insert_into(feed_follows::table)
        .values(NewFeedFollow { user_id, feed_id })
        .get_result::<FeedFollow>(conn)
}

pub fn find(conn: &mut PgConnection, user_id: i64, feed_id: i64) -> Option<FeedFollow> {
    feed_follows::table
        .filter(feed_follows::user_id.eq(user_id))
        .filter(feed_follows::feed_id.eq(feed_id))
        .first::<FeedFollow>(conn)
        .ok()
}

pub fn find_feeds_by_user_id(conn: &mut PgConnection, user_id: i64) -> Result<Vec<Feed>, Error> {
    feed_follows::table
        .inner_join(feeds::table)
        .filter(feed_follows::user_id.eq(user_id))
        .select(Feed::as_select())
        .order(feeds::name)
        .load::<Feed>(conn)
}

pub fn remove(conn: &mut PgConnection, user_id: i64, feed_id: i64) -> Result<usize, Error> {
    let record_query = feed_follows::table
        .filter(feed_follows::user_id.eq(user_id))
        .filter(feed_follows::feed_id.eq(feed_id));

    diesel::delete(record_query).execute(conn)
}
