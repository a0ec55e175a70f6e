use super::follow::find_feed;
use super::{Command, CommandError, Context};
use crate::db::feed_follows;
use crate::models::User;
use diesel::PgConnection;

static COMMAND: &str = "unfollow";

pub struct Unfollow {}

impl Unfollow {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn unfollow(
        &self,
        connection: &mut PgConnection,
        user: &User,
        url: &str,
    ) -> Result<String, CommandError> {
        let feed = find_feed(connection, url)?;

        match feed_follows::remove(connection, user.id, feed.id)? {
            0 => Err(CommandError::NotFollowing { url: feed.url }),
            _ => Ok(format!("{} unfollowed {}", user.name, feed.name)),
        }
    }
}

impl Command for Unfollow {
    fn command(&self) -> &'static str {
        Self::command()
    }

    fn usage(&self) -> &'static str {
        "unfollow <url>"
    }

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        self.expect_args(args, 1)?;

        let user_name = self.current_user_name(context)?;
        let mut connection = self.fetch_db_connection(context)?;
        let user = self.find_user(&mut connection, &user_name)?;

        self.unfollow(&mut connection, &user, &args[0])
    }
}
