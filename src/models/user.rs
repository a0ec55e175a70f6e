use crate::schema::users;
use chrono::{DateTime, Utc};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone, Eq, PartialEq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i64,
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
