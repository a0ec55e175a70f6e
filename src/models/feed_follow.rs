use crate::schema::feed_follows;
use chrono::{DateTime, Utc};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone, Eq, PartialEq)]
#[diesel(table_name = feed_follows)]
pub struct FeedFollow {
    pub id: i64,
    pub user_id: i64,
    pub feed_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
