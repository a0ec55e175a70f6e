use crate::schema::feeds;
use chrono::{DateTime, Utc};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone, Eq, PartialEq)]
#[diesel(table_name = feeds)]
pub struct Feed {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub user_id: i64,

    pub last_fetched_at: Option<DateTime<Utc>>,
    pub claimed_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
