use crate::http_client;
use chrono::{DateTime, Utc};
use isahc::prelude::*;
use isahc::Request;
use std::io;
use thiserror::Error;

pub mod rss;

pub use self::rss::RssReader;

const USER_AGENT: &str = "gator";
const MAX_ENTITY_LEN: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedReaderError {
    #[error("failed to fetch feed: {msg}")]
    Fetch { msg: String },
    #[error("failed to parse feed: {msg}")]
    Parse { msg: String },
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FetchedFeedItem {
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub publication_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Eq, PartialEq)]
pub struct FetchedFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub items: Vec<FetchedFeedItem>,
}

pub trait ReadFeed {
    fn read(&self) -> Result<FetchedFeed, FeedReaderError> {
        let body = read_url(&self.url())?;

        self.read_from_bytes(&body)
    }

    fn read_from_bytes(&self, data: &[u8]) -> Result<FetchedFeed, FeedReaderError>;

    fn url(&self) -> String;
}

pub fn read_url(url: &str) -> Result<Vec<u8>, FeedReaderError> {
    let client = http_client::client().map_err(|error| FeedReaderError::Fetch {
        msg: format!("{error:?}"),
    })?;

    let request = Request::get(url)
        .header("User-Agent", USER_AGENT)
        .body(())
        .map_err(|_| FeedReaderError::Fetch {
            msg: "Invalid URL".to_string(),
        })?;

    let mut response = client.send(request).map_err(|error| FeedReaderError::Fetch {
        msg: format!("{error:?}"),
    })?;

    if !response.status().is_success() {
        return Err(FeedReaderError::Fetch {
            msg: format!("unexpected status {}", response.status()),
        });
    }

    let mut writer: Vec<u8> = vec![];

    if let Err(err) = io::copy(response.body_mut(), &mut writer) {
        return Err(FeedReaderError::Fetch {
            msg: format!("{err:?}"),
        });
    }

    Ok(writer)
}

/// Decodes HTML entities left in text after XML unescaping, e.g. `&#8217;` or `&amp;`.
/// Each `&...;` run is decoded on its own; bare ampersands and unknown
/// entities are kept as they are.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);

        let candidate = &rest[start..];

        match entity_end(candidate) {
            Some(end) => {
                let entity = &candidate[..=end];

                match htmlescape::decode_html(entity) {
                    Ok(value) => decoded.push_str(&value),
                    Err(_) => decoded.push_str(entity),
                }

                rest = &candidate[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = &candidate[1..];
            }
        }
    }

    decoded.push_str(rest);

    decoded
}

/// Byte index of the `;` closing the entity that starts at `text[0]`.
fn entity_end(text: &str) -> Option<usize> {
    text.char_indices()
        .skip(1)
        .take(MAX_ENTITY_LEN)
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '#'))
        .and_then(|(index, c)| (c == ';').then_some(index))
}

pub fn normalize_title(title: &str) -> String {
    decode_entities(title)
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

pub fn normalize_description(description: &str) -> Option<String> {
    let decoded = decode_entities(description);
    let trimmed = decoded.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Best effort: a date that can't be parsed is dropped, it never fails the item.
pub fn parse_publication_date(date: Option<&str>) -> Option<DateTime<Utc>> {
    let date = date?.trim();

    DateTime::parse_from_rfc2822(date)
        .or_else(|_| DateTime::parse_from_rfc3339(date))
        .map(|date| date.with_timezone(&Utc))
        .ok()
}
