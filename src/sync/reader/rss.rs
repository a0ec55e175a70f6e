use crate::sync::reader::{
    normalize_description, normalize_title, parse_publication_date, FeedReaderError, FetchedFeed,
    FetchedFeedItem, ReadFeed,
};
use rss::{Channel, Item};

pub struct RssReader {
    pub url: String,
}

impl ReadFeed for RssReader {
    fn read_from_bytes(&self, data: &[u8]) -> Result<FetchedFeed, FeedReaderError> {
        match Channel::read_from(data) {
            Ok(channel) => Ok(FetchedFeed::from(channel)),
            Err(err) => {
                let msg = format!("{}", err);
                Err(FeedReaderError::Parse { msg })
            }
        }
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}

impl From<Channel> for FetchedFeed {
    fn from(channel: Channel) -> Self {
        let items = channel
            .items()
            .iter()
            .map(FetchedFeedItem::from)
            .collect::<Vec<FetchedFeedItem>>();

        FetchedFeed {
            title: normalize_title(channel.title()),
            link: channel.link().to_string(),
            description: normalize_description(channel.description()).unwrap_or_default(),
            items,
        }
    }
}

impl From<&Item> for FetchedFeedItem {
    fn from(item: &Item) -> Self {
        FetchedFeedItem {
            title: item.title().map(normalize_title).unwrap_or_default(),
            description: item.description().and_then(normalize_description),
            link: item.link().map(|link| link.trim().to_string()).unwrap_or_default(),
            publication_date: parse_publication_date(item.pub_date()),
        }
    }
}
