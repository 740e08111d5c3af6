use anyhow::Result;
use octocrab::Octocrab;

use crate::collector::{PullEntry, PullSource};
use crate::config::RepoId;

const PAGE_SIZE: u8 = 100;

/// GitHub-backed pull request source.
pub struct GitHubClient {
    octocrab: Octocrab,
    repo: RepoId,
}

impl GitHubClient {
    pub fn new(token: String, repo: RepoId) -> Result<Self> {
        let octocrab = Octocrab::builder().personal_token(token).build()?;
        Ok(Self { octocrab, repo })
    }
}

impl PullSource for GitHubClient {
    /// Lists closed pull requests sorted by creation date descending, which
    /// is the newest-first ordering the collector's early exit relies on.
    /// GitHub pages are 1-based, so the seam's 0-based index is shifted.
    async fn closed_pulls_page(&self, page: u32) -> Result<Vec<PullEntry>> {
        let page = self
            .octocrab
            .pulls(self.repo.owner.clone(), self.repo.repo.clone())
            .list()
            .state(octocrab::params::State::Closed)
            .sort(octocrab::params::pulls::Sort::Created)
            .direction(octocrab::params::Direction::Descending)
            .per_page(PAGE_SIZE)
            .page(page + 1)
            .send()
            .await?;

        let entries = page
            .items
            .into_iter()
            .filter_map(|pr| {
                Some(PullEntry {
                    number: pr.number,
                    // A pull without a creation timestamp cannot be aged;
                    // drop it.
                    created_at: pr.created_at?,
                    merged_at: pr.merged_at,
                    diff_url: pr.diff_url.map(|url| url.to_string()),
                })
            })
            .collect();

        Ok(entries)
    }
}
