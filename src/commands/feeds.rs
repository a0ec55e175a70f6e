use super::{Command, CommandError, Context};
use crate::db::feeds;
use crate::models::Feed;

static COMMAND: &str = "feeds";

pub struct Feeds {}

impl Feeds {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn list_feeds(&self, feeds: &[(Feed, String)]) -> String {
        if feeds.is_empty() {
            return "No feeds added yet".to_string();
        }

        feeds
            .iter()
            .map(|(feed, owner)| format!("{}\t{}\t{}", feed.name, feed.url, owner))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl Command for Feeds {
    fn command(&self) -> &'static str {
        Self::command()
    }

    fn usage(&self) -> &'static str {
        "feeds"
    }

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        self.expect_args(args, 0)?;

        let mut connection = self.fetch_db_connection(context)?;
        let feeds = feeds::load_with_owners(&mut connection)?;

        Ok(self.list_feeds(&feeds))
    }
}
