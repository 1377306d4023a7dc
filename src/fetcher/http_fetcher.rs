use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::app::Result;
use crate::config::ScraperConfig;
use crate::fetcher::{FetchedAsset, FetchedPage, Fetcher};

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage> {
        debug!(url, "fetching page");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let final_url = response.url().clone();
        let body = response.text().await?;

        Ok(FetchedPage { final_url, body })
    }

    async fn fetch_asset(&self, url: &str) -> Result<FetchedAsset> {
        debug!(url, "fetching asset");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = response.bytes().await?.to_vec();

        Ok(FetchedAsset {
            final_url,
            content_type,
            bytes,
        })
    }
}
