pub mod fs;

use crate::app::Result;
use crate::domain::ContentDocument;
use crate::fetcher::ScrapeReport;

pub use fs::FsStore;

pub trait Store {
    /// The persisted document read field by field; an absent file or text
    /// that is not JSON loads as empty.
    fn load_document(&self) -> Result<ContentDocument>;

    /// The persisted document exactly as stored. A missing file or any
    /// value that does not fit the model is an error.
    fn load_document_strict(&self) -> Result<ContentDocument>;

    /// Replace the persisted document as a whole.
    fn save_document(&self, document: &ContentDocument) -> Result<()>;

    fn save_report(&self, report: &ScrapeReport) -> Result<()>;
}
