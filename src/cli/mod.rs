pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "landing-autopilot")]
#[command(about = "Turn a reference website into a landing page and publish it", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/landing-autopilot/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Project directory holding landing.json and src/images
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape a reference page and merge it into landing.json
    Scrape {
        /// Reference page URL
        #[arg(long, env = "REFERENCE_URL")]
        url: Option<String>,

        /// Maximum number of images to download
        #[arg(long)]
        max_images: Option<usize>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Replace existing text with scraped text instead of only filling gaps
        #[arg(long)]
        overwrite: bool,
    },
    /// Print the candidate record extracted from a page without saving anything
    Extract {
        /// Reference page URL
        #[arg(long, env = "REFERENCE_URL")]
        url: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Rewrite the copy of landing.json with a language model
    Rewrite {
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Model name (default from config: gpt-5)
        #[arg(long)]
        model: Option<String>,
    },
    /// Upload the project tree to a GitHub repository
    Deploy {
        /// Target repository as owner/repo
        #[arg(long)]
        repo: String,

        /// Target branch (default from config: main)
        #[arg(long)]
        branch: Option<String>,

        /// Create the repository when it does not exist
        #[arg(long)]
        create_repo: bool,

        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

impl Commands {
    /// Apply command-line flags on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        match self {
            Commands::Scrape {
                max_images,
                timeout,
                ..
            } => {
                if let Some(max_images) = max_images {
                    config.scraper.max_images = *max_images;
                }
                if let Some(timeout) = timeout {
                    config.scraper.timeout_secs = *timeout;
                }
            }
            Commands::Extract { timeout, .. } => {
                if let Some(timeout) = timeout {
                    config.scraper.timeout_secs = *timeout;
                }
            }
            Commands::Rewrite { model, .. } => {
                if let Some(model) = model {
                    config.rewrite.model.clone_from(model);
                }
            }
            Commands::Deploy { branch, .. } => {
                if let Some(branch) = branch {
                    config.deploy.branch.clone_from(branch);
                }
            }
        }
    }
}
