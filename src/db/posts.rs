use crate::db;
use crate::models::Post;
use crate::schema::{feed_follows, feeds, posts};
use crate::store::NewPost;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};

#[derive(Insertable)]
#[diesel(table_name = posts)]
struct NewPostRecord<'a> {
    feed_id: i64,
    title: &'a str,
    url: &'a str,
    description: Option<&'a str>,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Returns the number of inserted rows: 0 when the post already exists.
pub fn create(conn: &mut PgConnection, post: &NewPost) -> Result<usize, Error> {
    let record = NewPostRecord {
        feed_id: post.feed_id,
        title: &post.title,
        url: &post.url,
        description: post.description.as_deref(),
        published_at: post.published_at,
        created_at: post.created_at,
        updated_at: db::current_time(),
    };

    diesel::insert_into(posts::table)
        .values(record)
        .on_conflict((posts::feed_id, posts::url))
        .do_nothing()
        .execute(conn)
}

pub fn find_by_feed(conn: &mut PgConnection, feed_id: i64) -> Result<Vec<Post>, Error> {
    posts::table
        .filter(posts::feed_id.eq(feed_id))
        .order(posts::id)
        .load::<Post>(conn)
}

/// Newest posts from the feeds a user follows, with the feed name.
pub fn find_for_user(
    conn: &mut PgConnection,
    user_id: i64,
    limit: i64,
) -> Result<Vec<(Post, String)>, Error> {
    let followed_feeds = feed_follows::table
        .filter(feed_follows::user_id.eq(user_id))
        .select(feed_follows::feed_id);

    posts::table
        .inner_join(feeds::table)
        .filter(feeds::id.eq_any(followed_feeds))
        .select((Post::as_select(), feeds::name))
        .order((
            posts::published_at.desc().nulls_last(),
            posts::created_at.desc(),
            posts::id.desc(),
        ))
        .limit(limit)
        .load::<(Post, String)>(conn)
}
