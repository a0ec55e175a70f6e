use super::{Command, CommandError, Context};
use crate::db::users;
use crate::models::User;

static COMMAND: &str = "users";

pub struct Users {}

impl Users {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn list_users(&self, users: &[User], current_user_name: Option<&str>) -> String {
        if users.is_empty() {
            return "No users registered".to_string();
        }

        users
            .iter()
            .map(|user| {
                if Some(user.name.as_str()) == current_user_name {
                    format!("* {} (current)", user.name)
                } else {
                    format!("* {}", user.name)
                }
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl Command for Users {
    fn command(&self) -> &'static str {
        Self::command()
    }

    fn usage(&self) -> &'static str {
        "users"
    }

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        self.expect_args(args, 0)?;

        let current_user_name = match self.current_user_name(context) {
            Ok(name) => Some(name),
            Err(CommandError::NoCurrentUser) => None,
            Err(error) => return Err(error),
        };

        let mut connection = self.fetch_db_connection(context)?;
        let users = users::load_all(&mut connection)?;

        Ok(self.list_users(&users, current_user_name.as_deref()))
    }
}
