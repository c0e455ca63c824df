use crate::core::config::CountdownProviderConfig;
use crate::core::price::{NoData, PriceSource};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

const RESULT_CAP: &str = "60";

/// Price fields checked on each listing. The first one present decides.
const PRICE_POINTERS: [&str; 3] = ["/price/value", "/buy_now_price/value", "/raw_price"];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    search_results: Option<Vec<Value>>,
}

fn extract_price(item: &Value) -> Option<f64> {
    PRICE_POINTERS
        .iter()
        .find_map(|pointer| item.pointer(pointer).filter(|v| !v.is_null()))
        .and_then(Value::as_f64)
        .filter(|price| price.is_finite())
}

/// Sold-listing search against the Countdown eBay API.
pub struct CountdownProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl CountdownProvider {
    pub fn new(config: &CountdownProviderConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("cardwatch/1.0")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = config.api_key.clone().filter(|k| !k.is_empty());
        if api_key.is_none() {
            warn!("No price source API key configured, every lookup will return no data");
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn search_url(&self, api_key: &str, query: &str) -> Result<Url, NoData> {
        Url::parse_with_params(
            &format!("{}/request", self.base_url),
            &[
                ("api_key", api_key),
                ("type", "search"),
                ("ebay_domain", "ebay.com"),
                ("search_term", query),
                ("sold_items", "true"),
                ("completed_items", "true"),
                ("sort_by", "ending_soonest"),
                ("num", RESULT_CAP),
            ],
        )
        .map_err(|e| NoData::Malformed(format!("invalid endpoint: {e}")))
    }
}

#[async_trait]
impl PriceSource for CountdownProvider {
    #[instrument(
        name = "CountdownLookup",
        skip(self),
        fields(query = %query)
    )]
    async fn lookup(&self, query: &str) -> Result<Vec<f64>, NoData> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(NoData::MissingCredential);
        };

        let url = self.search_url(api_key, query)?;
        let response = self.client.get(url).send().await.map_err(|e| {
            debug!(error = %e, "Price search request failed");
            NoData::Unreachable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "Price search returned an error status");
            return Err(NoData::Status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| NoData::Unreachable(e.to_string()))?;

        let data: SearchResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, response = %text, "Failed to parse price search response");
                return Err(NoData::Malformed(e.to_string()));
            }
        };

        let prices: Vec<f64> = data
            .search_results
            .unwrap_or_default()
            .iter()
            .filter_map(extract_price)
            .collect();
        debug!(count = prices.len(), "Extracted prices");

        if prices.is_empty() {
            return Err(NoData::Empty);
        }
        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer, api_key: Option<&str>) -> CountdownProvider {
        CountdownProvider::new(&CountdownProviderConfig {
            base_url: server.uri(),
            api_key: api_key.map(str::to_string),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_extract_price_field_order() {
        assert_eq!(
            extract_price(&json!({"price": {"value": 10.5}, "buy_now_price": {"value": 99.0}})),
            Some(10.5)
        );
        assert_eq!(
            extract_price(&json!({"buy_now_price": {"value": 20}, "raw_price": 30.0})),
            Some(20.0)
        );
        assert_eq!(extract_price(&json!({"raw_price": 30.0})), Some(30.0));
        assert_eq!(
            extract_price(&json!({"price": {"value": "12.00"}, "raw_price": 7.0})),
            None
        );
        assert_eq!(
            extract_price(&json!({"price": {"value": null}, "raw_price": 7.0})),
            Some(7.0)
        );
        assert_eq!(
            extract_price(&json!({"price": {"currency": "USD"}, "buy_now_price": {"value": 9}})),
            Some(9.0)
        );
        assert_eq!(extract_price(&json!({"raw_price": "$30.00"})), None);
        assert_eq!(extract_price(&json!({"title": "No price"})), None);
    }

    #[tokio::test]
    async fn test_lookup_sends_search_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/request"))
            .and(query_param("api_key", "secret"))
            .and(query_param("type", "search"))
            .and(query_param("ebay_domain", "ebay.com"))
            .and(query_param("search_term", "Charizard PSA 9"))
            .and(query_param("sold_items", "true"))
            .and(query_param("completed_items", "true"))
            .and(query_param("sort_by", "ending_soonest"))
            .and(query_param("num", "60"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "search_results": [
                    {"price": {"value": 300.0}},
                    {"title": "lot without price"},
                    {"buy_now_price": {"value": 280.0}},
                    {"raw_price": 310.0}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, Some("secret"));
        let prices = provider.lookup("Charizard PSA 9").await.unwrap();

        assert_eq!(prices, vec![300.0, 280.0, 310.0]);
    }

    #[tokio::test]
    async fn test_missing_credential_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = provider_for(&server, None);

        assert_eq!(
            provider.lookup("Charizard").await,
            Err(NoData::MissingCredential)
        );
    }

    #[tokio::test]
    async fn test_error_status_is_no_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/request"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider = provider_for(&server, Some("secret"));

        assert_eq!(provider.lookup("Charizard").await, Err(NoData::Status(500)));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_no_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/request"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let provider = provider_for(&server, Some("secret"));

        assert!(matches!(
            provider.lookup("Charizard").await,
            Err(NoData::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_no_results_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/request"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "request_info": {"success": true}
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server, Some("secret"));

        assert_eq!(provider.lookup("Charizard").await, Err(NoData::Empty));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/request"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"search_results": [{"raw_price": 1.0}]}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let provider = provider_for(&server, Some("secret"));
        let err = provider.lookup("Charizard").await.unwrap_err();

        assert!(err.is_transport(), "expected transport failure, got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let provider = CountdownProvider::new(&CountdownProviderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: Some("secret".to_string()),
            timeout_secs: 1,
        })
        .unwrap();

        let err = provider.lookup("Charizard").await.unwrap_err();

        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_not_transport_failure() {
        let provider = CountdownProvider::new(&CountdownProviderConfig {
            base_url: "not a url".to_string(),
            api_key: Some("secret".to_string()),
            timeout_secs: 1,
        })
        .unwrap();

        let err = provider.lookup("Charizard").await.unwrap_err();

        assert!(matches!(err, NoData::Malformed(_)), "got {err:?}");
        assert!(!err.is_transport());
    }
}
