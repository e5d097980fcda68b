//! Enrichment collaborators and the transactional persist pipeline.

pub mod error;
pub mod images;
pub mod pipeline;
mod retry;
pub mod summarizer;

pub use error::EnrichError;
pub use images::{HttpImageStore, ImageStore, ThumbnailRelocator};
pub use pipeline::{PersistPipeline, PersistReport, PostStore, StoreError};
pub use summarizer::{OpenAiSummarizer, Summarizer, Summary};
