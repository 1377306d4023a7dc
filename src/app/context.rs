use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::store::FsStore;

pub struct AppContext {
    pub config: Config,
    pub store: FsStore,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
}

impl AppContext {
    /// Context for the project directory `root`. Command-line overrides
    /// must already be applied to `config`.
    pub fn new(root: PathBuf, config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new(&config.scraper)?);
        Ok(Self::with_fetcher(root, config, fetcher))
    }

    pub fn with_fetcher(
        root: PathBuf,
        config: Config,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Self {
        Self {
            config,
            store: FsStore::new(root),
            fetcher,
        }
    }
}
