//! Pricing abstractions and core types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// Search terms that exclude graded listings from the ungraded query.
const GRADED_EXCLUSIONS: &str = "-psa -bgs -cgc -sgc";

/// One of the four pricing tiers queried for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Variant {
    Ungraded,
    Grade8,
    Grade9,
    Grade10,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Ungraded,
        Variant::Grade8,
        Variant::Grade9,
        Variant::Grade10,
    ];

    /// Builds the search query for this tier.
    pub fn query(&self, card_name: &str) -> String {
        match self {
            Variant::Ungraded => format!("{card_name} {GRADED_EXCLUSIONS}"),
            Variant::Grade8 => format!("{card_name} PSA 8"),
            Variant::Grade9 => format!("{card_name} PSA 9"),
            Variant::Grade10 => format!("{card_name} PSA 10"),
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Variant::Ungraded => "Ungraded",
                Variant::Grade8 => "Grade 8",
                Variant::Grade9 => "Grade 9",
                Variant::Grade10 => "Grade 10",
            }
        )
    }
}

/// Median sold prices per variant. `None` means no data was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    pub ungraded_median: Option<f64>,
    pub grade8_median: Option<f64>,
    pub grade9_median: Option<f64>,
    pub grade10_median: Option<f64>,
}

impl PriceSummary {
    pub fn get(&self, variant: Variant) -> Option<f64> {
        match variant {
            Variant::Ungraded => self.ungraded_median,
            Variant::Grade8 => self.grade8_median,
            Variant::Grade9 => self.grade9_median,
            Variant::Grade10 => self.grade10_median,
        }
    }

    pub fn set(&mut self, variant: Variant, value: Option<f64>) {
        let slot = match variant {
            Variant::Ungraded => &mut self.ungraded_median,
            Variant::Grade8 => &mut self.grade8_median,
            Variant::Grade9 => &mut self.grade9_median,
            Variant::Grade10 => &mut self.grade10_median,
        };
        *slot = value;
    }

    pub fn is_empty(&self) -> bool {
        Variant::ALL.iter().all(|v| self.get(*v).is_none())
    }
}

/// Why a lookup produced no prices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoData {
    #[error("no access credential configured")]
    MissingCredential,
    #[error("price source unreachable: {0}")]
    Unreachable(String),
    #[error("price source returned HTTP {0}")]
    Status(u16),
    #[error("malformed price payload: {0}")]
    Malformed(String),
    #[error("no priced listings found")]
    Empty,
}

impl NoData {
    /// True when the request never completed (connect error, timeout).
    pub fn is_transport(&self) -> bool {
        matches!(self, NoData::Unreachable(_))
    }
}

/// A search backend that returns raw sold prices for a free-text query.
///
/// An `Ok` list is never empty; an empty search is reported as
/// [`NoData::Empty`].
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<f64>, NoData>;
}
