use super::{Command, CommandError, Context};
use crate::db::posts;
use crate::models::Post;

static COMMAND: &str = "browse";
const DEFAULT_LIMIT: i64 = 2;
const SEPARATOR: &str = "=====================================";

/// Newest posts from the feeds the current user follows.
pub struct Browse {}

impl Browse {
    pub fn command() -> &'static str {
        COMMAND
    }

    fn parse_limit(&self, args: &[String]) -> Result<i64, CommandError> {
        match args {
            [] => Ok(DEFAULT_LIMIT),
            [value] => match value.trim().parse::<i64>() {
                Ok(limit) if limit > 0 => Ok(limit),
                _ => Err(CommandError::InvalidLimit {
                    value: value.to_string(),
                }),
            },
            _ => Err(CommandError::InvalidArguments {
                usage: self.usage(),
            }),
        }
    }

    fn render_post(&self, post: &Post, feed_name: &str) -> String {
        let date = post
            .published_at
            .map(|date| date.format("%a %b %-d %Y").to_string())
            .unwrap_or_else(|| "Unknown date".to_string());

        let mut lines = vec![
            format!("{} from {}", date, feed_name),
            format!("--- {} ---", post.title),
        ];

        if let Some(description) = &post.description {
            lines.push(format!("    {}", description));
        }

        lines.push(format!("Link: {}", post.url));
        lines.push(SEPARATOR.to_string());

        lines.join("\n")
    }
}

impl Command for Browse {
    fn command(&self) -> &'static str {
        Self::command()
    }

    fn usage(&self) -> &'static str {
        "browse [limit]"
    }

    fn response(&self, context: &Context, args: &[String]) -> Result<String, CommandError> {
        let limit = self.parse_limit(args)?;

        let user_name = self.current_user_name(context)?;
        let mut connection = self.fetch_db_connection(context)?;
        let user = self.find_user(&mut connection, &user_name)?;

        let found = posts::find_for_user(&mut connection, user.id, limit)?;

        let mut output = vec![format!("Found {} posts for {}", found.len(), user.name)];

        for (post, feed_name) in &found {
            output.push(self.render_post(post, feed_name));
        }

        Ok(output.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::Browse;
    use crate::commands::test_support::args;
    use crate::commands::CommandError;
    use crate::db;
    use crate::models::Post;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parse_limit_defaults_to_two() {
        assert_eq!(Browse {}.parse_limit(&[]).unwrap(), 2);
        assert_eq!(Browse {}.parse_limit(&args(&["10"])).unwrap(), 10);
    }

    #[test]
    fn parse_limit_rejects_bad_values() {
        for value in ["0", "-3", "ten"] {
            assert!(matches!(
                Browse {}.parse_limit(&args(&[value])),
                Err(CommandError::InvalidLimit { .. })
            ));
        }

        assert!(matches!(
            Browse {}.parse_limit(&args(&["1", "2"])),
            Err(CommandError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn render_post_shows_date_feed_and_link() {
        let now = db::current_time();
        let post = Post {
            id: 1,
            feed_id: 1,
            title: "Rock & Roll".to_string(),
            url: "https://example.com/a".to_string(),
            description: Some("First post".to_string()),
            published_at: Some(Utc.with_ymd_and_hms(2004, 10, 19, 15, 9, 11).unwrap()),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(
            Browse {}.render_post(&post, "Example"),
            "Tue Oct 19 2004 from Example\n--- Rock & Roll ---\n    First post\nLink: https://example.com/a\n====================================="
        );
    }

    #[test]
    fn render_post_handles_missing_fields() {
        let now = db::current_time();
        let post = Post {
            id: 2,
            feed_id: 1,
            title: "Untitled".to_string(),
            url: "https://example.com/b".to_string(),
            description: None,
            published_at: None,
            created_at: now,
            updated_at: now,
        };

        let rendered = Browse {}.render_post(&post, "Example");

        assert!(rendered.starts_with("Unknown date from Example\n--- Untitled ---\nLink:"));
    }
}
