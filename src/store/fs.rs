use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::warn;

use crate::app::{AutopilotError, Result};
use crate::domain::ContentDocument;
use crate::fetcher::ScrapeReport;
use crate::store::Store;

pub const DOCUMENT_FILE: &str = "landing.json";
pub const REPORT_FILE: &str = "scrape-report.json";

/// Project-directory storage: `landing.json`, `scrape-report.json` and
/// `src/images/`.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self) -> PathBuf {
        self.root.join(DOCUMENT_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(REPORT_FILE)
    }

    /// Image directory, created on demand.
    pub fn images_dir(&self) -> Result<PathBuf> {
        let dir = self.root.join("src").join("images");
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Write pretty JSON through a temporary file renamed over `path`, so
    /// readers see either the old or the new content.
    fn write_json_atomic<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');

        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path)?;
        Ok(())
    }
}

impl Store for FsStore {
    fn load_document(&self) -> Result<ContentDocument> {
        let path = self.document_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ContentDocument::default()),
            Err(e) => return Err(e.into()),
        };

        Ok(ContentDocument::from_json_lenient(&raw).unwrap_or_else(|| {
            warn!(path = %path.display(), "Content document is malformed, starting empty");
            ContentDocument::default()
        }))
    }

    fn load_document_strict(&self) -> Result<ContentDocument> {
        let path = self.document_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AutopilotError::MissingInput(format!(
                    "{} not found, run scrape first",
                    path.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn save_document(&self, document: &ContentDocument) -> Result<()> {
        self.write_json_atomic(&self.document_path(), document)
    }

    fn save_report(&self, report: &ScrapeReport) -> Result<()> {
        self.write_json_atomic(&self.report_path(), report)
    }
}
