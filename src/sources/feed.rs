use crate::models::Property;
use crate::sources::traits::ListingSource;
use crate::sources::ListingPayload;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pulls listings from a remote JSON feed
pub struct FeedSource {
    client: Client,
    url: String,
}

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ListingSource for FeedSource {
    async fn fetch(&self) -> Result<Vec<Property>> {
        debug!("Fetching URL: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to fetch listings feed")?;

        if !response.status().is_success() {
            warn!("Listings feed returned status: {}", response.status());
            anyhow::bail!("Failed to fetch listings feed: {}", response.status());
        }

        let body = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes of listings", body.len());

        let payload: ListingPayload =
            serde_json::from_str(&body).context("Listings feed is not valid listing JSON")?;
        let properties = payload.into_properties();

        info!("Fetched {} properties from feed", properties.len());
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "feed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_client() {
        let source = FeedSource::new("https://listings.example/api/properties").unwrap();
        assert_eq!(source.url(), "https://listings.example/api/properties");
        assert_eq!(source.source_name(), "feed");
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_an_error() {
        // Port 9 (discard) on localhost is not expected to speak HTTP
        let source = FeedSource::new("http://127.0.0.1:9/properties").unwrap();
        assert!(source.fetch().await.is_err());
    }
}
