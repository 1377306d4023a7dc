pub mod candidate;
pub mod content;
pub mod text;

pub use candidate::CandidateRecord;
pub use content::{
    Brand, ContentDocument, Footer, Hero, Media, ScrapeMeta, Section, Site,
};
pub use text::{first_text, normalize_whitespace, Text};
