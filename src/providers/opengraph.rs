use crate::core::config::MetadataProviderConfig;
use crate::core::metadata::{MetadataError, MetadataProvider, PLACEHOLDER_TITLE, PageMetadata};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument};

static TITLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title[^>]*>([^<]+)</title>").expect("title pattern is valid")
});

fn meta_property(html: &str, property: &str) -> Option<String> {
    let pattern = format!(
        r#"(?i)<meta[^>]+property=["']{}["'][^>]+content=["']([^"']+)["']"#,
        regex::escape(property)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|s| !s.is_empty())
}

fn clean_text(raw: &str) -> String {
    raw.trim()
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

/// Title and image from a page's Open Graph tags, falling back to `<title>`.
pub fn extract_metadata(html: &str) -> PageMetadata {
    let title = meta_property(html, "og:title")
        .or_else(|| {
            TITLE_TAG
                .captures(html)
                .and_then(|caps| caps.get(1))
                .map(|m| clean_text(m.as_str()))
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());
    let image = meta_property(html, "og:image");

    PageMetadata { title, image }
}

pub struct OpenGraphProvider {
    client: reqwest::Client,
}

impl OpenGraphProvider {
    pub fn new(config: &MetadataProviderConfig) -> anyhow::Result<Self> {
        let user_agent = config.user_agent.as_deref().unwrap_or("cardwatch/1.0");
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MetadataProvider for OpenGraphProvider {
    #[instrument(name = "MetadataFetch", skip(self), fields(url = %url))]
    async fn fetch_metadata(&self, url: &str) -> Result<PageMetadata, MetadataError> {
        let parsed = Url::parse(url.trim())
            .map_err(|e| MetadataError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MetadataError::InvalidUrl(format!(
                "{url}: unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let unreachable = |e: reqwest::Error| MetadataError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::FetchFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(unreachable)?;
        let metadata = extract_metadata(&html);
        debug!(?metadata, "Extracted page metadata");
        Ok(metadata)
    }
}
