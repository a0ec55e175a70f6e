use super::{is_unique_violation, Command, CommandError, Context};
use crate::db::{feed_follows, feeds};
use crate::models::{Feed, User};
use diesel::PgConnection;

static COMMAND: &str = "follow";

pub struct Follow {}

impl Follow {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn follow(
        &self,
        connection: &mut PgConnection,
        user: &User,
        url: &str,
    ) -> Result<String, CommandError> {
        let feed = find_feed(connection, url)?;

        if feed_follows::find(connection, user.id, feed.id).is_some() {
            return Err(CommandError::AlreadyFollowing { url: feed.url });
        }

        match feed_follows::create(connection, user.id, feed.id) {
            Ok(_) => Ok(format!("{} now follows {}", user.name, feed.name)),
            Err(error) if is_unique_violation(&error) => {
                Err(CommandError::AlreadyFollowing { url: feed.url })
            }
            Err(error) => Err(error.into()),
        }
    }
}

pub fn find_feed(connection: &mut PgConnection, url: &str) -> Result<Feed, CommandError> {
    feeds::find_by_url(connection, url).ok_or_else(|| CommandError::FeedNotFound {
        url: url.trim().to_string(),
    })
}

impl Command for Follow {
    fn command(&self) -> &'static str {
        Self::command()
    }

    fn usage(&self) -> &'static str {
        "follow <url>"
    }

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        self.expect_args(args, 1)?;

        let user_name = self.current_user_name(context)?;
        let mut connection = self.fetch_db_connection(context)?;
        let user = self.find_user(&mut connection, &user_name)?;

        self.follow(&mut connection, &user, &args[0])
    }
}
