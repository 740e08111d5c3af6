use anyhow::{Context, Result};

use crate::collector::DiffSizeFetcher;

/// Fetches pull request diffs over plain HTTP.
pub struct HttpDiffFetcher {
    http: reqwest::Client,
}

impl HttpDiffFetcher {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mergeflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self { http })
    }
}

impl DiffSizeFetcher for HttpDiffFetcher {
    /// Any client or server error status fails the run; there is no retry.
    async fn diff_line_count(&self, url: &str) -> Result<u64> {
        let text = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(count_lines(&text))
    }
}

/// Number of newline-delimited segments in the diff body.
fn count_lines(text: &str) -> u64 {
    text.lines().count() as u64
}
