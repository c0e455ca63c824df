//! Concurrent per-variant price aggregation

use super::price::{NoData, PriceSource, PriceSummary, Variant};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("card name is empty")]
    EmptyName,
    #[error("price source unreachable for every variant: {0}")]
    Unreachable(String),
}

impl AggregateError {
    /// Transport failures are worth retrying; bad input is not.
    pub fn is_transient(&self) -> bool {
        matches!(self, AggregateError::Unreachable(_))
    }
}

/// Median of the given prices, or `None` for an empty slice.
pub fn median(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    let mut sorted = prices.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Summary plus the raw lookup outcome behind each field.
#[derive(Debug, Clone)]
pub struct Survey {
    pub summary: PriceSummary,
    pub outcomes: Vec<(Variant, Result<usize, NoData>)>,
}

impl Survey {
    /// True when no lookup got through to the price source at all.
    pub fn is_unreachable(&self) -> bool {
        self.outcomes
            .iter()
            .all(|(_, outcome)| matches!(outcome, Err(e) if e.is_transport()))
    }

    fn first_transport_error(&self) -> String {
        self.outcomes
            .iter()
            .find_map(|(_, outcome)| match outcome {
                Err(e) if e.is_transport() => Some(e.to_string()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

pub struct Aggregator {
    source: Arc<dyn PriceSource>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self { source }
    }

    /// Median prices for all four variants of `card_name`.
    ///
    /// Lookups that fail leave their field empty; only a blank name is an
    /// error.
    pub async fn aggregate(&self, card_name: &str) -> Result<PriceSummary, AggregateError> {
        Ok(self.survey(card_name).await?.summary)
    }

    #[instrument(name = "Aggregate", skip(self), fields(card = %card_name))]
    pub async fn survey(&self, card_name: &str) -> Result<Survey, AggregateError> {
        let name = card_name.trim();
        if name.is_empty() {
            return Err(AggregateError::EmptyName);
        }

        let lookups = Variant::ALL.into_iter().map(|variant| {
            let query = variant.query(name);
            let source = Arc::clone(&self.source);
            async move { (variant, source.lookup(&query).await) }
        });

        let mut summary = PriceSummary::default();
        let mut outcomes = Vec::with_capacity(Variant::ALL.len());
        for (variant, result) in join_all(lookups).await {
            match result {
                Ok(prices) => {
                    let value = median(&prices);
                    debug!(%variant, count = prices.len(), ?value, "Variant priced");
                    summary.set(variant, value);
                    outcomes.push((variant, Ok(prices.len())));
                }
                Err(reason) => {
                    debug!(%variant, %reason, "No data for variant");
                    outcomes.push((variant, Err(reason)));
                }
            }
        }

        Ok(Survey { summary, outcomes })
    }
}

/// Something that can produce a summary for a card name, distinguishing
/// transient failures from completed (possibly empty) results.
#[async_trait]
pub trait Summarize: Send + Sync {
    async fn summarize(&self, card_name: &str) -> Result<PriceSummary, AggregateError>;
}

#[async_trait]
impl Summarize for Aggregator {
    async fn summarize(&self, card_name: &str) -> Result<PriceSummary, AggregateError> {
        let survey = self.survey(card_name).await?;
        if survey.is_unreachable() {
            let cause = survey.first_transport_error();
            warn!(card = %card_name, %cause, "Price source unreachable for all variants");
            return Err(AggregateError::Unreachable(cause));
        }
        Ok(survey.summary)
    }
}
