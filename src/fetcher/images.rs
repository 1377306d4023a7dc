use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::app::Result;
use crate::fetcher::Fetcher;

/// Extension used when neither the content type nor the URL tells.
const UNKNOWN_EXTENSION: &str = ".img";

/// Outcome of one requested image, as written to `scrape-report.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    #[serde(rename_all = "camelCase")]
    Saved {
        requested: String,
        final_url: String,
        file_name: String,
        content_type: String,
    },
    #[serde(rename_all = "camelCase")]
    Failed { requested: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub source: String,
    pub report: Vec<ReportEntry>,
}

/// Files saved by a download run, in request order, plus the per-URL report.
#[derive(Debug, Default)]
pub struct Downloads {
    pub files: Vec<String>,
    pub report: Vec<ReportEntry>,
}

/// Downloads candidate images one after another into a directory.
pub struct ImageDownloader<'a> {
    fetcher: &'a (dyn Fetcher + Send + Sync),
    dir: PathBuf,
}

impl<'a> ImageDownloader<'a> {
    pub fn new(fetcher: &'a (dyn Fetcher + Send + Sync), dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            dir: dir.into(),
        }
    }

    /// Try each of the first `max_images` URLs once. Failures are logged,
    /// reported and skipped.
    pub async fn download_all(&self, urls: &[String], max_images: usize) -> Downloads {
        let urls = &urls[..urls.len().min(max_images)];
        let mut downloads = Downloads::default();

        for (i, url) in urls.iter().enumerate() {
            let base = format!("img-{:03}", i + 1);
            info!("Downloading ({}/{}): {}", i + 1, urls.len(), url);

            match self.download_one(url, &base).await {
                Ok(entry) => {
                    if let ReportEntry::Saved { file_name, .. } = &entry {
                        downloads.files.push(file_name.clone());
                    }
                    downloads.report.push(entry);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Skipped image");
                    downloads.report.push(ReportEntry::Failed {
                        requested: url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        downloads
    }

    async fn download_one(&self, url: &str, base: &str) -> Result<ReportEntry> {
        let asset = self.fetcher.fetch_asset(url).await?;
        let content_type = asset.content_type.unwrap_or_default();
        let extension = extension_from_content_type(&content_type)
            .or_else(|| extension_from_url(&asset.final_url))
            .unwrap_or(UNKNOWN_EXTENSION);

        let file_name = format!("{}{}", base, extension);
        fs::write(self.dir.join(&file_name), &asset.bytes)?;

        Ok(ReportEntry::Saved {
            requested: url.to_string(),
            final_url: asset.final_url.to_string(),
            file_name,
            content_type,
        })
    }
}

pub fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let content_type = content_type.to_lowercase();
    [
        ("image/jpeg", ".jpg"),
        ("image/png", ".png"),
        ("image/webp", ".webp"),
        ("image/gif", ".gif"),
    ]
    .into_iter()
    .find(|(mime, _)| content_type.contains(mime))
    .map(|(_, ext)| ext)
}

pub fn extension_from_url(url: &Url) -> Option<&'static str> {
    let path = url.path().to_lowercase();
    [
        (".jpg", ".jpg"),
        (".jpeg", ".jpg"),
        (".png", ".png"),
        (".webp", ".webp"),
        (".gif", ".gif"),
    ]
    .into_iter()
    .find(|(suffix, _)| path.ends_with(suffix))
    .map(|(_, ext)| ext)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::app::AutopilotError;
    use crate::fetcher::{FetchedAsset, FetchedPage};

    /// Serves canned assets keyed by URL; anything else is a 404.
    struct FakeFetcher {
        assets: HashMap<String, (Option<&'static str>, &'static [u8])>,
    }

    #[async_trait]
    impl Fetcher for FakeFetcher {
        async fn fetch_page(&self, url: &str) -> crate::app::Result<FetchedPage> {
            Err(AutopilotError::Other(format!("no page for {}", url)))
        }

        async fn fetch_asset(&self, url: &str) -> crate::app::Result<FetchedAsset> {
            let (content_type, bytes) = self
                .assets
                .get(url)
                .ok_or_else(|| AutopilotError::Other(format!("HTTP 404 Not Found: {}", url)))?;
            Ok(FetchedAsset {
                final_url: Url::parse(url)?,
                content_type: content_type.map(String::from),
                bytes: bytes.to_vec(),
            })
        }
    }

    fn fetcher() -> FakeFetcher {
        let mut assets = HashMap::new();
        assets.insert(
            "https://cdn.example/a".to_string(),
            (Some("image/jpeg; charset=binary"), &b"jpeg"[..]),
        );
        assets.insert("https://cdn.example/b.jpeg".to_string(), (None, &b"b"[..]));
        assets.insert("https://cdn.example/c".to_string(), (Some("text/plain"), &b"c"[..]));
        FakeFetcher { assets }
    }

    #[tokio::test]
    async fn test_downloads_in_order_and_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher();
        let downloader = ImageDownloader::new(&fetcher, dir.path());

        let urls: Vec<String> = [
            "https://cdn.example/a",
            "https://cdn.example/missing.png",
            "https://cdn.example/b.jpeg",
            "https://cdn.example/c",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let downloads = downloader.download_all(&urls, 8).await;

        assert_eq!(downloads.files, vec!["img-001.jpg", "img-003.jpg", "img-004.img"]);
        assert_eq!(downloads.report.len(), 4);
        assert!(matches!(&downloads.report[1], ReportEntry::Failed { requested, .. }
            if requested == "https://cdn.example/missing.png"));
        assert_eq!(fs::read(dir.path().join("img-001.jpg")).unwrap(), b"jpeg");
        assert!(dir.path().join("img-004.img").exists());
    }

    #[tokio::test]
    async fn test_respects_max_images() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher();
        let downloader = ImageDownloader::new(&fetcher, dir.path());
        let urls = vec![
            "https://cdn.example/a".to_string(),
            "https://cdn.example/b.jpeg".to_string(),
        ];

        let downloads = downloader.download_all(&urls, 1).await;
        assert_eq!(downloads.files, vec!["img-001.jpg"]);
        assert_eq!(downloads.report.len(), 1);

        assert!(downloader.download_all(&urls, 0).await.files.is_empty());
    }

    #[test]
    fn test_extension_from_content_type() {
        assert_eq!(extension_from_content_type("image/JPEG"), Some(".jpg"));
        assert_eq!(extension_from_content_type("image/webp"), Some(".webp"));
        assert_eq!(extension_from_content_type("application/octet-stream"), None);
    }

    #[test]
    fn test_extension_from_url() {
        let url = Url::parse("https://x.example/photo.JPEG?w=200").unwrap();
        assert_eq!(extension_from_url(&url), Some(".jpg"));
        let url = Url::parse("https://x.example/photo").unwrap();
        assert_eq!(extension_from_url(&url), None);
    }

    #[test]
    fn test_report_entry_shape() {
        let saved = ReportEntry::Saved {
            requested: "r".into(),
            final_url: "f".into(),
            file_name: "img-001.jpg".into(),
            content_type: "image/jpeg".into(),
        };
        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(value["finalUrl"], "f");
        assert_eq!(value["fileName"], "img-001.jpg");

        let failed = ReportEntry::Failed {
            requested: "r".into(),
            error: "boom".into(),
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value, serde_json::json!({"requested": "r", "error": "boom"}));
    }
}
