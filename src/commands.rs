use crate::config::{Config, ConfigError};
use crate::db::{users, DbPool};
use crate::models::User;
use crate::session::{Session, SessionError};
use crate::store::StoreError;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::DatabaseErrorKind;
use diesel::PgConnection;
use log::{debug, error};
use std::collections::HashMap;
use thiserror::Error;

pub mod add_feed;
pub mod agg;
pub mod browse;
pub mod feeds;
pub mod follow;
pub mod following;
pub mod login;
pub mod register;
pub mod reset;
pub mod unfollow;
pub mod users_list;

pub use add_feed::AddFeed;
pub use agg::Agg;
pub use browse::Browse;
pub use feeds::Feeds;
pub use follow::Follow;
pub use following::Following;
pub use login::Login;
pub use register::Register;
pub use reset::Reset;
pub use unfollow::Unfollow;
pub use users_list::Users;

pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command {name:?}")]
    UnknownCommand { name: String },
    #[error("usage: gator {usage}")]
    InvalidArguments { usage: &'static str },
    #[error("no current user, run `gator login <name>` or set GATOR_USER")]
    NoCurrentUser,
    #[error("user {name:?} does not exist")]
    UserNotFound { name: String },
    #[error("user {name:?} already exists")]
    UserAlreadyExists { name: String },
    #[error("invalid feed url {url:?}")]
    InvalidUrl { url: String },
    #[error("feed {url} does not exist")]
    FeedNotFound { url: String },
    #[error("feed {url} already exists")]
    FeedAlreadyExists { url: String },
    #[error("already following {url}")]
    AlreadyFollowing { url: String },
    #[error("not following {url}")]
    NotFollowing { url: String },
    #[error("limit must be a positive number, got {value:?}")]
    InvalidLimit { value: String },
    #[error("failed to start the scheduler: {msg}")]
    Runtime { msg: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<diesel::result::Error> for CommandError {
    fn from(error: diesel::result::Error) -> Self {
        CommandError::Store(error.into())
    }
}

pub fn is_unique_violation(error: &diesel::result::Error) -> bool {
    matches!(
        error,
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Everything a command may need: settings and the database pool.
pub struct Context {
    pub config: Config,
    pub pool: DbPool,
}

pub trait Command: Send + Sync {
    fn command(&self) -> &'static str;

    /// Shown when the arguments don't fit, without the binary name.
    fn usage(&self) -> &'static str;

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError>;

    fn execute(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        debug!("Running {} with {:?}", self.command(), args);

        self.response(context, args)
    }

    fn expect_args(&self, args: &[String], count: usize) -> Result<(), CommandError> {
        if args.len() == count {
            Ok(())
        } else {
            Err(CommandError::InvalidArguments {
                usage: self.usage(),
            })
        }
    }

    fn fetch_db_connection(&self, context: &Context) -> Result<DbConnection, CommandError> {
        match context.pool.get() {
            Ok(connection) => Ok(connection),
            Err(err) => {
                error!("Failed to fetch a connection from the pool {:?}", err);

                Err(CommandError::Store(err.into()))
            }
        }
    }

    /// `GATOR_USER` first, then the user saved by `login` or `register`.
    fn current_user_name(&self, context: &Context) -> Result<String, CommandError> {
        if let Some(name) = &context.config.current_user_name {
            return Ok(name.clone());
        }

        Session::load(&context.config.session_file)?
            .current_user_name()
            .map(str::to_string)
            .ok_or(CommandError::NoCurrentUser)
    }

    fn find_user(&self, connection: &mut PgConnection, name: &str) -> Result<User, CommandError> {
        users::find_by_name(connection, name).ok_or_else(|| CommandError::UserNotFound {
            name: name.to_string(),
        })
    }
}

/// Name to handler dispatch table.
pub struct Commands {
    handlers: HashMap<&'static str, Box<dyn Command>>,
}

impl Default for Commands {
    fn default() -> Self {
        let mut commands = Self {
            handlers: HashMap::new(),
        };

        commands.register(Box::new(Login {}));
        commands.register(Box::new(Register {}));
        commands.register(Box::new(Reset {}));
        commands.register(Box::new(Users {}));
        commands.register(Box::new(AddFeed {}));
        commands.register(Box::new(Feeds {}));
        commands.register(Box::new(Follow {}));
        commands.register(Box::new(Following {}));
        commands.register(Box::new(Unfollow {}));
        commands.register(Box::new(Browse {}));
        commands.register(Box::new(Agg {}));

        commands
    }
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Box<dyn Command>) {
        self.handlers.insert(handler.command(), handler);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn usages(&self) -> Vec<&'static str> {
        let mut usages: Vec<&'static str> =
            self.handlers.values().map(|handler| handler.usage()).collect();

        usages.sort_unstable();

        usages
    }

    pub fn run(
        &self,
        context: &Context,
        name: &str,
        args: &[String],
    ) -> Result<String, CommandError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand {
                name: name.to_string(),
            })?;

        handler.execute(context, args)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Context;
    use crate::config::Config;
    use diesel::r2d2::{ConnectionManager, Pool};
    use diesel::PgConnection;
    use std::path::Path;
    use std::time::Duration;

    /// A context whose pool never connects; enough for argument handling.
    /// No user is saved in its session file.
    pub fn offline_context(current_user_name: Option<&str>) -> Context {
        let session_file = std::env::temp_dir()
            .join("gator-test-missing-dir")
            .join(crate::session::FILE_NAME);

        offline_context_with_session(current_user_name, &session_file)
    }

    pub fn offline_context_with_session(
        current_user_name: Option<&str>,
        session_file: &Path,
    ) -> Context {
        let manager =
            ConnectionManager::<PgConnection>::new("postgres://gator@127.0.0.1:1/unreachable");
        let pool = Pool::builder()
            .max_size(1)
            .min_idle(Some(0))
            .connection_timeout(Duration::from_millis(100))
            .build_unchecked(manager);

        Context {
            config: Config {
                database_url: "postgres://gator@127.0.0.1:1/unreachable".to_string(),
                database_pool_size: 1,
                request_timeout: Duration::from_secs(1),
                sync_workers: 1,
                sync_lease: Duration::from_secs(300),
                current_user_name: current_user_name.map(str::to_string),
                session_file: session_file.to_path_buf(),
            },
            pool,
        }
    }

    pub fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }
}
