//! Run configuration and repository identification.
//!
//! Arguments are parsed once at startup (see `cli`) into a [`Config`] that is
//! passed explicitly to collection and reporting; nothing reads flags from
//! ambient global state.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A unique identifier for a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    /// The owner of the repository (e.g., "NordSecurity").
    pub owner: String,
    /// The name of the repository (e.g., "libtelio").
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        match parts.as_slice() {
            [owner, repo] if !owner.is_empty() && !repo.is_empty() => Ok(RepoId {
                owner: (*owner).to_string(),
                repo: (*repo).to_string(),
            }),
            _ => bail!("expected a repository as OWNER/NAME, got '{s}'"),
        }
    }
}

/// Settings for a single run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Repository to analyze.
    pub repo: RepoId,
    /// Maximum age, in days, of a merged pull request to include.
    pub days: i64,
    /// Path to a file containing a GitHub personal access token.
    pub token_path: PathBuf,
}
