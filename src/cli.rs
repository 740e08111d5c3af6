use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, RepoId};

#[derive(Debug, Parser)]
#[command(
    name = "mergeflow",
    about = "Check how long it takes to get a pull request merged in"
)]
pub struct Args {
    /// Path to a file containing your GitHub token.
    #[arg(short, long, env = "MERGEFLOW_TOKEN_FILE", default_value = "token.txt")]
    pub token: PathBuf,

    /// Repository to check, as OWNER/NAME.
    #[arg(
        short,
        long,
        env = "MERGEFLOW_REPOSITORY",
        default_value = "NordSecurity/libtelio"
    )]
    pub repository: RepoId,

    /// Maximum age of a merged pull request, in days.
    #[arg(short, long, env = "MERGEFLOW_DAYS", default_value_t = 30)]
    pub days: i64,
}

impl Args {
    pub fn into_config(self) -> anyhow::Result<Config> {
        if self.days <= 0 {
            anyhow::bail!("--days must be a positive number of days, got {}", self.days);
        }
        Ok(Config {
            repo: self.repository,
            days: self.days,
            token_path: self.token,
        })
    }
}
