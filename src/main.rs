use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use landing_autopilot::app::AppContext;
use landing_autopilot::cli::{commands, Cli, Commands};
use landing_autopilot::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    cli.command.apply_overrides(&mut config);
    let ctx = AppContext::new(cli.root.clone(), config)?;

    match &cli.command {
        Commands::Scrape { url, overwrite, .. } => {
            commands::scrape(&ctx, url.as_deref(), *overwrite).await?;
        }
        Commands::Extract { url, .. } => {
            commands::extract(&ctx, url.as_deref()).await?;
        }
        Commands::Rewrite { api_key, .. } => {
            commands::rewrite(&ctx, api_key.as_deref()).await?;
        }
        Commands::Deploy {
            repo,
            create_repo,
            token,
            ..
        } => {
            commands::deploy(&ctx, repo, token.as_deref(), *create_repo).await?;
        }
    }

    Ok(())
}
