//! # landing-autopilot
//!
//! Turns a reference website into the content model of a static landing
//! page, optionally rewrites its copy, and publishes the project to GitHub.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Extractor → ImageDownloader → Merger → Store
//!                                           ↑
//!                               Store (prior document)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Scrape a page into ./landing.json, filling only empty fields
//! landing-autopilot scrape --url https://example.com
//!
//! # Let scraped text replace existing text
//! landing-autopilot scrape --url https://example.com --overwrite
//!
//! # Rewrite the copy, then publish
//! landing-autopilot rewrite
//! landing-autopilot deploy --repo owner/site --create-repo
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config, store
/// and fetcher.
pub mod app;

/// Command-line interface using clap.
///
/// - `scrape` - Scrape a page and merge it into `landing.json`
/// - `extract` - Print the extracted candidate record
/// - `rewrite` - Rewrite the copy with a language model
/// - `deploy` - Upload the project tree to GitHub
pub mod cli;

/// Configuration loaded from `~/.config/landing-autopilot/config.toml`.
pub mod config;

/// Publishing through the GitHub contents API.
pub mod deploy;

/// Core domain models.
///
/// - [`ContentDocument`](domain::ContentDocument): the persisted landing page model
/// - [`CandidateRecord`](domain::CandidateRecord): content extracted from one page
/// - [`Text`](domain::Text): a normalized, non-empty string
pub mod domain;

/// Markup to candidate record extraction.
pub mod extractor;

/// HTTP fetching of pages and images.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ImageDownloader`](fetcher::ImageDownloader): Sequential image downloads with a report
pub mod fetcher;

/// Merge of a candidate record into the prior content document.
pub mod merger;

/// Copy rewrite through the OpenAI Responses API.
pub mod rewriter;

/// Project-directory persistence.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`FsStore`](store::FsStore): JSON files with atomic replacement
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
