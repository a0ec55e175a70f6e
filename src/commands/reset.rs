use super::{Command, CommandError, Context};
use crate::db::users;
use log::warn;

static COMMAND: &str = "reset";

/// Deletes every user together with their feeds, follows and posts.
pub struct Reset {}

impl Reset {
    pub fn command() -> &'static str {
        COMMAND
    }
}

impl Command for Reset {
    fn command(&self) -> &'static str {
        Self::command()
    }

    fn usage(&self) -> &'static str {
        "reset"
    }

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        self.expect_args(args, 0)?;

        let mut connection = self.fetch_db_connection(context)?;
        let deleted = users::delete_all(&mut connection)?;

        warn!("Deleted {} users with all their data", deleted);

        Ok(format!("Deleted {} users", deleted))
    }
}
