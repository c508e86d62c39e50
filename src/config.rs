//! Run configuration.
//!
//! A [`Config`] is built once at startup from the command line and passed by
//! reference to [`crate::pipeline::run`]. No pipeline stage reads ambient
//! process state for its settings.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable consulted for the API token when `--token` is absent
pub const TOKEN_ENV: &str = "SYNC2REPO_TOKEN";

/// Default base URL of the listing API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default ceiling of simultaneous clone operations
pub const DEFAULT_CONCURRENCY: usize = 30;

/// Branch merged from a source whose checked-out branch cannot be read
pub const DEFAULT_BRANCH: &str = "master";

/// Default commit message of every history merge
pub const DEFAULT_MESSAGE: &str = "move gists to repo";

/// Immutable settings of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    token: String,
    user: String,
    repo: PathBuf,
    api_url: String,
    concurrency: NonZeroUsize,
    /// `None` merges the branch each source has checked out
    branch: Option<String>,
    message: String,
}

impl Config {
    /// Builds a configuration from the three mandatory values.
    ///
    /// Absent and blank values are rejected with [`Error::MissingArgument`],
    /// naming the first one found missing in the order token, user, repo.
    pub fn new(token: Option<String>, user: Option<String>, repo: Option<PathBuf>) -> Result<Self> {
        let token = require("token", token)?;
        let user = require("user", user)?;
        let repo = repo
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::MissingArgument {
                name: "repo".to_string(),
            })?;

        Ok(Self {
            token,
            user,
            repo,
            api_url: DEFAULT_API_URL.to_string(),
            concurrency: NonZeroUsize::new(DEFAULT_CONCURRENCY).unwrap_or(NonZeroUsize::MIN),
            branch: None,
            message: DEFAULT_MESSAGE.to_string(),
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the clone concurrency ceiling; zero is rejected.
    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self> {
        self.concurrency = NonZeroUsize::new(concurrency).ok_or_else(|| Error::InvalidArgument {
            name: "concurrency".to_string(),
            message: "must be at least 1".to_string(),
        })?;
        Ok(self)
    }

    /// Merges `branch` of every source instead of its checked-out branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Destination repository all sources are merged into
    pub fn repo(&self) -> &Path {
        &self.repo
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn require(name: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::MissingArgument {
            name: name.to_string(),
        }),
    }
}
