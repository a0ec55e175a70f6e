use super::{Command, CommandError, Context};
use crate::db::feed_follows;

static COMMAND: &str = "following";

pub struct Following {}

impl Following {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Following {
    fn command(&self) -> &'static str {
        Self::command()
    }

    fn usage(&self) -> &'static str {
        "following"
    }

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        self.expect_args(args, 0)?;

        let user_name = self.current_user_name(context)?;
        let mut connection = self.fetch_db_connection(context)?;
        let user = self.find_user(&mut connection, &user_name)?;

        let feeds = feed_follows::find_feeds_by_user_id(&mut connection, user.id)?;

        if feeds.is_empty() {
            return Ok(format!("{} doesn't follow any feeds", user.name));
        }

        let names = feeds
            .into_iter()
            .map(|feed| format!("* {}", feed.name))
            .collect::<Vec<String>>()
            .join("\n");

        Ok(format!("Feeds followed by {}:\n{}", user.name, names))
    }
}

#[cfg(test)]
mod tests {
    use super::Following;
    use crate::commands::test_support::{args, offline_context};
    use crate::commands::{Command, CommandError};

    #[test]
    fn it_takes_no_arguments() {
        assert!(matches!(
            Following {}.response(&offline_context(Some("amy")), &args(&["amy"])),
            Err(CommandError::InvalidArguments { .. })
        ));
    }
}
