use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title used when a page exposes neither `og:title` nor `<title>`.
pub const PLACEHOLDER_TITLE: &str = "Unknown eBay Item";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub image: Option<String>,
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to fetch {url}: {reason}")]
    Unreachable { url: String, reason: String },
    #[error("Fetch failed with HTTP {status} for {url}")]
    FetchFailed { url: String, status: u16 },
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_metadata(&self, url: &str) -> Result<PageMetadata, MetadataError>;
}
