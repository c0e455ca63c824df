//! Core business logic abstractions

pub mod aggregate;
pub mod card;
pub mod config;
pub mod log;
pub mod metadata;
pub mod price;
pub mod refresh;

// Re-export main types for cleaner imports
pub use aggregate::{AggregateError, Aggregator, Summarize};
pub use metadata::{MetadataProvider, PageMetadata};
pub use price::{NoData, PriceSource, PriceSummary, Variant};
pub use refresh::{RefreshFailure, Refresher};
