//! CLI argument parsing and run orchestration

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use gist2repo::config::{
    Config, DEFAULT_API_URL, DEFAULT_CONCURRENCY, DEFAULT_MESSAGE, TOKEN_ENV,
};
use gist2repo::git::SystemGit;
use gist2repo::github::GitHubClient;
use gist2repo::pipeline;

/// gist2repo - Merge the history of every gist of a user into one repository
#[derive(Parser, Debug)]
#[command(name = "gist2repo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// OAuth token https://github.com/settings/tokens
    #[arg(long, value_name = "TOKEN", env = TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    /// Path to a destination repository on the filesystem
    #[arg(long, value_name = "PATH")]
    repo: Option<PathBuf>,

    /// Name of the user owning the source gists
    #[arg(long, value_name = "NAME")]
    user: Option<String>,

    /// Base URL of the GitHub API
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Maximum number of simultaneous clones
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Branch of every gist to merge (defaults to the branch each gist has checked out)
    #[arg(long, value_name = "BRANCH")]
    branch: Option<String>,

    /// Commit message of every merge
    #[arg(long, value_name = "MESSAGE", default_value = DEFAULT_MESSAGE)]
    message: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Execute one run
    ///
    /// Only startup failures end the process with an error: a missing or
    /// invalid argument, an unusable temporary directory, or a clone worker
    /// pool that cannot be created. Pipeline errors are logged and the run
    /// still succeeds.
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();

        let mut config = Config::new(self.token, self.user, self.repo)?
            .with_api_url(self.api_url)
            .with_concurrency(self.concurrency)?
            .with_message(self.message);
        if let Some(branch) = self.branch {
            config = config.with_branch(branch);
        }

        let clone_root = tempfile::Builder::new()
            .prefix("gist2repo-")
            .tempdir()
            .context("Cannot create temp directory")?;

        info!(
            "Merging gists of {} into {}",
            config.user(),
            config.repo().display()
        );

        let source = Arc::new(GitHubClient::new(config.api_url(), config.token())?);
        let errors = pipeline::run(&config, source, Arc::new(SystemGit), clone_root.path())?;

        let mut count = 0usize;
        for err in errors {
            error!("{}", err);
            count += 1;
        }

        if count == 0 {
            info!("Done");
        } else {
            warn!("Done with {} errors", count);
        }

        // Every stage has finished once the error stream closes
        if let Err(e) = clone_root.close() {
            warn!("Failed to remove temp directory: {}", e);
        }

        Ok(())
    }
}
