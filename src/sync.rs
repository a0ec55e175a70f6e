pub mod ingestor;
pub mod reader;
pub mod scheduler;
pub mod sync_feed_job;
pub mod sync_job;

pub use ingestor::Ingestor;
pub use reader::{FetchedFeed, FetchedFeedItem};
pub use scheduler::Scheduler;
pub use sync_feed_job::{FeedSyncError, SyncFeedJob};
pub use sync_job::SyncJob;
