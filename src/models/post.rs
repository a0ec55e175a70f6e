use crate::schema::posts;
use chrono::{DateTime, Utc};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone, Eq, PartialEq)]
#[diesel(table_name = posts)]
pub struct Post {
    pub id: i64,
    pub feed_id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,

    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
