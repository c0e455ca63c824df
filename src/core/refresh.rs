//! Bounded-retry wrapper around a single aggregation

use super::aggregate::{AggregateError, Summarize};
use super::config::RefreshConfig;
use super::price::PriceSummary;
use crate::providers::util::with_retry;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Terminal, user-facing refresh failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RefreshFailure {
    pub message: String,
}

impl From<AggregateError> for RefreshFailure {
    fn from(err: AggregateError) -> Self {
        let message = match err {
            AggregateError::EmptyName => "Card name is empty.".to_string(),
            AggregateError::Unreachable(cause) => {
                format!("Network error. Please try again. ({cause})")
            }
        };
        Self { message }
    }
}

pub struct Refresher {
    inner: Arc<dyn Summarize>,
    attempts: usize,
    delay_ms: u64,
}

impl Refresher {
    pub fn new(inner: Arc<dyn Summarize>, config: &RefreshConfig) -> Self {
        Self {
            inner,
            attempts: config.attempts.max(1),
            delay_ms: config.delay_ms,
        }
    }

    /// Fresh summary for `card_name`, retrying transport failures only.
    #[instrument(name = "Refresh", skip(self), fields(card = %card_name))]
    pub async fn refresh(&self, card_name: &str) -> Result<PriceSummary, RefreshFailure> {
        let inner = &self.inner;
        let result = with_retry(
            || inner.summarize(card_name),
            self.attempts - 1,
            self.delay_ms,
            AggregateError::is_transient,
        )
        .await;

        match result {
            Ok(summary) => {
                info!("Refreshed prices");
                Ok(summary)
            }
            Err(err) => {
                warn!(error = %err, "Refresh failed");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    struct ScriptedSummarizer {
        script: Mutex<VecDeque<Result<PriceSummary, AggregateError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSummarizer {
        fn new(script: Vec<Result<PriceSummary, AggregateError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Summarize for ScriptedSummarizer {
        async fn summarize(&self, _card_name: &str) -> Result<PriceSummary, AggregateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Err(AggregateError::Unreachable("script exhausted".into())))
        }
    }

    fn config() -> RefreshConfig {
        RefreshConfig {
            attempts: 2,
            delay_ms: 0,
        }
    }

    fn priced() -> PriceSummary {
        PriceSummary {
            ungraded_median: Some(120.0),
            ..Default::default()
        }
    }

    fn unreachable() -> Result<PriceSummary, AggregateError> {
        Err(AggregateError::Unreachable("connection reset".into()))
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let inner = ScriptedSummarizer::new(vec![unreachable(), Ok(priced())]);
        let refresher = Refresher::new(inner.clone(), &config());

        let result = refresher.refresh("Charizard").await;

        assert_eq!(result, Ok(priced()));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_two_transients_fail() {
        let inner = ScriptedSummarizer::new(vec![unreachable(), unreachable(), Ok(priced())]);
        let refresher = Refresher::new(inner.clone(), &config());

        let failure = refresher.refresh("Charizard").await.unwrap_err();

        assert!(failure.message.contains("Network error"));
        assert!(failure.message.contains("connection reset"));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_summary_is_not_retried() {
        let inner = ScriptedSummarizer::new(vec![Ok(PriceSummary::default()), Ok(priced())]);
        let refresher = Refresher::new(inner.clone(), &config());

        let summary = refresher.refresh("Charizard").await.unwrap();

        assert!(summary.is_empty());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_name_fails_without_retry() {
        let inner = ScriptedSummarizer::new(vec![Err(AggregateError::EmptyName)]);
        let refresher = Refresher::new(inner.clone(), &config());

        let failure = refresher.refresh("").await.unwrap_err();

        assert_eq!(failure.message, "Card name is empty.");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let inner = ScriptedSummarizer::new(vec![Ok(priced())]);
        let refresher = Refresher::new(
            inner.clone(),
            &RefreshConfig {
                attempts: 0,
                delay_ms: 0,
            },
        );

        assert!(refresher.refresh("Charizard").await.is_ok());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }
}
