//! alt-scribe - fills in missing alt text for markdown images
//!
//! ## Commands
//!
//! - `rewrite`: rewrite markdown files in a working tree in place
//! - `comment`: post one comment with suggestions on a pull request
//! - `review`: post a review with line-anchored suggestions on a pull request

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};

use cli::{Cli, Commands};
use scribe_core::telemetry::init_tracing;
use scribe_core::{build_generator, AltTextGenerator, GitHubClient, Scribe};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let provider = cli.provider.provider_config()?;
    let generator = build_generator(&provider)?;
    let scribe = Scribe::new(AltTextGenerator::new(generator, cli.provider.fallback()))
        .with_extensions(cli.provider.extensions.clone())
        .with_concurrency(cli.provider.concurrency);

    info!(
        "Using {} model {} for alt text",
        provider.kind, provider.model
    );

    let summary = match cli.command {
        Commands::Rewrite { root, dry_run } => {
            let summary = scribe
                .rewrite_tree(&root, dry_run)
                .await
                .with_context(|| format!("Failed to rewrite {}", root.display()))?;
            for preview in &summary.previews {
                print!("{}", preview);
            }
            summary
        }
        Commands::Comment {
            pull_request,
            format,
        } => {
            let number = pull_request.number()?;
            let hosting = pull_request.hosting_config()?;
            let host = GitHubClient::new(&hosting)?;
            scribe
                .comment_on_pull_request(&host, number, pull_request.policy(), format.into())
                .await
                .with_context(|| format!("Failed to comment on pull request #{}", number))?
        }
        Commands::Review { pull_request } => {
            let number = pull_request.number()?;
            let hosting = pull_request.hosting_config()?;
            let host = GitHubClient::new(&hosting)?;
            scribe
                .review_pull_request(&host, number, pull_request.policy())
                .await
                .with_context(|| format!("Failed to review pull request #{}", number))?
        }
    };

    info!("Done: {}", summary);
    Ok(())
}
