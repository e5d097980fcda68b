//! Feed ingestion and normalization: source detection, RSS/Atom parsing,
//! field extraction, thumbnail discovery, and multi-source orchestration.

pub mod client;
pub mod dates;
pub mod entry;
pub mod error;
pub mod extract;
pub mod html;
pub mod orchestrator;
pub mod processor;
pub mod registry;
pub mod thumbnail;

pub use client::FeedClient;
pub use entry::{parse_feed, FeedEntry};
pub use error::CrawlerError;
pub use orchestrator::{CrawlReport, IngestRun, Orchestrator};
pub use processor::{EntryOutcome, FeedProcessor, FeedResult, SkipReason};
pub use registry::{HostMatcher, SourceRegistry, SourceRule, SourceType};
pub use thumbnail::ThumbnailResolver;
