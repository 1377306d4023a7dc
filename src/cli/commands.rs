use tracing::info;
use url::Url;

use crate::app::{AppContext, AutopilotError, Result};
use crate::deploy::{self, GithubClient, RepoStatus, Target};
use crate::domain::{CandidateRecord, ContentDocument};
use crate::extractor;
use crate::fetcher::{ImageDownloader, ScrapeReport};
use crate::merger;
use crate::rewriter::Rewriter;
use crate::store::Store;

/// Result of a scrape run.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub document: ContentDocument,
    pub downloaded: usize,
}

fn reference_url(url: Option<&str>) -> Result<Url> {
    let url = url.map(str::trim).unwrap_or_default();
    if url.is_empty() {
        return Err(AutopilotError::MissingInput(
            "reference URL is required (--url or REFERENCE_URL)".into(),
        ));
    }
    Ok(Url::parse(url)?)
}

/// Fetch the page and extract against the address it was served from.
async fn fetch_candidate(ctx: &AppContext, url: &Url) -> Result<(Url, CandidateRecord)> {
    info!("Fetching: {}", url);
    let page = ctx.fetcher.fetch_page(url.as_str()).await?;
    let candidate = extractor::extract(&page.final_url, &page.body);
    Ok((page.final_url, candidate))
}

pub async fn run_scrape(ctx: &AppContext, url: Option<&str>, overwrite: bool) -> Result<ScrapeOutcome> {
    let url = reference_url(url)?;
    let (final_url, candidate) = fetch_candidate(ctx, &url).await?;

    let downloader = ImageDownloader::new(ctx.fetcher.as_ref(), ctx.store.images_dir()?);
    let downloads = downloader
        .download_all(&candidate.image_urls, ctx.config.scraper.max_images)
        .await;

    let existing = ctx.store.load_document()?;
    let document = merger::merge(
        &existing,
        &candidate,
        &downloads.files,
        final_url.as_str(),
        overwrite,
    );
    ctx.store.save_document(&document)?;
    ctx.store.save_report(&ScrapeReport {
        source: final_url.to_string(),
        report: downloads.report,
    })?;

    Ok(ScrapeOutcome {
        document,
        downloaded: downloads.files.len(),
    })
}

pub async fn scrape(ctx: &AppContext, url: Option<&str>, overwrite: bool) -> Result<()> {
    let outcome = run_scrape(ctx, url, overwrite).await?;

    println!("Updated {}", ctx.store.document_path().display());
    println!("Saved {}", ctx.store.report_path().display());
    println!("Downloaded images: {}", outcome.downloaded);
    Ok(())
}

pub async fn extract(ctx: &AppContext, url: Option<&str>) -> Result<()> {
    let url = reference_url(url)?;
    let (_, candidate) = fetch_candidate(ctx, &url).await?;

    println!("{}", serde_json::to_string_pretty(&candidate)?);
    Ok(())
}

pub async fn rewrite(ctx: &AppContext, api_key: Option<&str>) -> Result<()> {
    let rewriter = Rewriter::new(&ctx.config.rewrite, api_key.unwrap_or_default())?;

    let document = ctx.store.load_document_strict()?;
    let rewritten = rewriter.rewrite(&document).await?;
    ctx.store.save_document(&rewritten)?;

    println!("Rewrite applied to {}", ctx.store.document_path().display());
    Ok(())
}

pub async fn deploy(
    ctx: &AppContext,
    repo: &str,
    token: Option<&str>,
    create_repo: bool,
) -> Result<()> {
    let (owner, repo) = deploy::parse_repo(repo)?;
    let client = GithubClient::new(&ctx.config.deploy, token.unwrap_or_default())?;
    let target = Target {
        owner,
        repo,
        branch: &ctx.config.deploy.branch,
    };

    let report = deploy::deploy(
        &client,
        &ctx.config.deploy,
        ctx.store.root(),
        &target,
        create_repo,
    )
    .await?;

    if let RepoStatus::Created(name) = &report.repo {
        println!("Created repo: {}", name);
    }
    println!(
        "Uploaded {} file(s) to {}/{}@{} ({} created, {} updated)",
        report.uploaded, owner, repo, target.branch, report.created, report.updated
    );
    println!("Next: in the GitHub repo open Settings > Pages and set Source to GitHub Actions (once).");
    println!("Pushing to the branch triggers the deploy workflow.");
    Ok(())
}
