pub mod http_fetcher;
pub mod images;

use async_trait::async_trait;
use url::Url;

use crate::app::Result;

pub use http_fetcher::HttpFetcher;
pub use images::{Downloads, ImageDownloader, ReportEntry, ScrapeReport};

/// A fetched HTML page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Address after following redirects.
    pub final_url: Url,
    pub body: String,
}

/// A fetched binary asset such as an image.
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub final_url: Url,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait Fetcher {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage>;

    async fn fetch_asset(&self, url: &str) -> Result<FetchedAsset>;
}
