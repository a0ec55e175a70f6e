use super::{is_unique_violation, Command, CommandError, Context};
use crate::db::users;
use crate::session::Session;
use diesel::PgConnection;
use std::path::Path;

static COMMAND: &str = "register";

pub struct Register {}

impl Register {
    pub fn command() -> &'static str {
        COMMAND
    }

    /// Creates the user and saves it as the current one.
    fn register(
        &self,
        connection: &mut PgConnection,
        session_file: &Path,
        name: &str,
    ) -> Result<String, CommandError> {
        let user = match users::create(connection, name) {
            Ok(user) => user,
            Err(error) if is_unique_violation(&error) => {
                return Err(CommandError::UserAlreadyExists {
                    name: name.trim().to_string(),
                })
            }
            Err(error) => return Err(error.into()),
        };

        Session::set_user(session_file, &user.name)?;

        Ok(format!("Registered user {} and logged in", user.name))
    }
}

impl Command for Register {
    fn command(&self) -> &'static str {
        Self::command()
    }

    fn usage(&self) -> &'static str {
        "register <name>"
    }

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        self.expect_args(args, 1)?;

        if args[0].trim().is_empty() {
            return Err(CommandError::InvalidArguments {
                usage: self.usage(),
            });
        }

        let mut connection = self.fetch_db_connection(context)?;

        self.register(&mut connection, &context.config.session_file, &args[0])
    }
}
