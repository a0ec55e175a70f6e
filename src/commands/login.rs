use super::{Command, CommandError, Context};
use crate::session::Session;
use diesel::PgConnection;
use log::warn;
use std::path::Path;

static COMMAND: &str = "login";

/// Saves an existing user as the current one.
pub struct Login {}

impl Login {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn login(
        &self,
        connection: &mut PgConnection,
        session_file: &Path,
        name: &str,
    ) -> Result<String, CommandError> {
        let user = self.find_user(connection, name.trim())?;

        Session::set_user(session_file, &user.name)?;

        Ok(format!("Logged in as {}", user.name))
    }
}

impl Command for Login {
    fn command(&self) -> &'static str {
        Self::command()
    }

    fn usage(&self) -> &'static str {
        "login <name>"
    }

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        self.expect_args(args, 1)?;

        if args[0].trim().is_empty() {
            return Err(CommandError::InvalidArguments {
                usage: self.usage(),
            });
        }

        if let Some(name) = &context.config.current_user_name {
            warn!("GATOR_USER={} takes precedence over the saved user", name);
        }

        let mut connection = self.fetch_db_connection(context)?;

        self.login(&mut connection, &context.config.session_file, &args[0])
    }
}
