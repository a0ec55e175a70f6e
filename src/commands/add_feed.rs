use super::{is_unique_violation, Command, CommandError, Context};
use crate::db::{feed_follows, feeds};
use crate::models::User;
use diesel::{Connection, PgConnection};
use url::Url;

static COMMAND: &str = "addfeed";

/// Creates a feed owned by the current user, who follows it right away.
pub struct AddFeed {}

impl AddFeed {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn add_feed(
        &self,
        connection: &mut PgConnection,
        user: &User,
        name: &str,
        url: &str,
    ) -> Result<String, CommandError> {
        let feed = connection.transaction::<_, CommandError, _>(|connection| {
            let feed = match feeds::create(connection, name, url, user.id) {
                Ok(feed) => feed,
                Err(error) if is_unique_violation(&error) => {
                    return Err(CommandError::FeedAlreadyExists {
                        url: url.to_string(),
                    })
                }
                Err(error) => return Err(error.into()),
            };

            feed_follows::create(connection, user.id, feed.id)?;

            Ok(feed)
        })?;

        Ok(format!(
            "Added feed {} ({})\n{} now follows {}",
            feed.name, feed.url, user.name, feed.name
        ))
    }
}

pub fn validate_url(url: &str) -> Result<String, CommandError> {
    let invalid = || CommandError::InvalidUrl {
        url: url.to_string(),
    };

    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;

    match parsed.scheme() {
        "http" | "https" => Ok(url.trim().to_string()),
        _ => Err(invalid()),
    }
}

impl Command for AddFeed {
    fn command(&self) -> &'static str {
        Self::command()
    }

    fn usage(&self) -> &'static str {
        "addfeed <name> <url>"
    }

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        self.expect_args(args, 2)?;

        if args[0].trim().is_empty() {
            return Err(CommandError::InvalidArguments {
                usage: self.usage(),
            });
        }

        let url = validate_url(&args[1])?;
        let user_name = self.current_user_name(context)?;

        let mut connection = self.fetch_db_connection(context)?;
        let user = self.find_user(&mut connection, &user_name)?;

        self.add_feed(&mut connection, &user, &args[0], &url)
    }
}
