use crate::models::User;
use crate::schema::users;
use diesel::prelude::*;
use diesel::result::Error;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};

#[derive(Insertable)]
#[diesel(table_name = users)]
struct NewUser {
    name: String,
}

pub fn create(conn: &mut PgConnection, name: &str) -> Result<User, Error> {
    let new_user = NewUser {
        name: name.trim().to_string(),
    };

    diesel::insert_into(users::table)
        .values(new_user)
        .get_result::<User>(conn)
}

pub fn find_by_name(conn: &mut PgConnection, name: &str) -> Option<User> {
    users::table
        .filter(users::name.eq(name))
        .first::<User>(conn)
        .ok()
}

pub fn find(conn: &mut PgConnection, id: i64) -> Option<User> {
    users::table.filter(users::id.eq(id)).first::<User>(conn).ok()
}

pub fn load_all(conn: &mut PgConnection) -> Result<Vec<User>, Error> {
    users::table.order(users::name).load::<User>(conn)
}

/// Feeds, follows and posts go with their users through `ON DELETE CASCADE`.
pub fn delete_all(conn: &mut PgConnection) -> Result<usize, Error> {
    diesel::delete(users::table).execute(conn)
}
