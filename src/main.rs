use std::fs;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mergeflow::cli::Args;
use mergeflow::collector;
use mergeflow::diff::HttpDiffFetcher;
use mergeflow::github::GitHubClient;
use mergeflow::report;
use mergeflow::stats::{size_buckets, Bucket, DurationSample, StatsError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mergeflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Args::parse().into_config()?;

    let token = fs::read_to_string(&config.token_path)
        .with_context(|| format!("reading token file {}", config.token_path.display()))?
        .trim()
        .to_string();

    let source = GitHubClient::new(token, config.repo.clone())?;
    let diffs = HttpDiffFetcher::new()?;

    tracing::info!(repo = %config.repo, days = config.days, "collecting merged pull requests");
    let pulls = collector::collect(&source, &diffs, config.days, Utc::now()).await?;

    let sample = DurationSample::from_pulls(pulls)?;
    print!("{}", report::render_pulls(&sample));
    println!();

    for bucket in std::iter::once(Bucket::ALL).chain(size_buckets()) {
        match sample.report(bucket) {
            Ok(stats) => {
                print!("{}", report::render_report(&stats, &config));
                println!();
            }
            Err(StatsError::EmptyBucket(filter)) => {
                print!("{}", report::render_empty(&filter, &config));
                println!();
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
