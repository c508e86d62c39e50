use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// Trait for git command execution - allows mocking in tests
///
/// Every pipeline stage talks to git only through this trait. The working
/// directory is passed per call, so no caller ever changes the directory of
/// the whole process.
pub trait GitExecutor: Send + Sync {
    /// Runs `git <args>` inside `dir` (or the inherited directory when `None`).
    ///
    /// Returns the combined stdout and stderr on success. A non-zero exit is
    /// reported as [`Error::GitCommand`] carrying that same combined output.
    fn run(&self, dir: Option<&Path>, args: &[&str]) -> Result<String>;
}

/// The default implementation of `GitExecutor`, which uses the system's
/// `git` command.
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Any authentication configured in ~/.gitconfig
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGit;

impl GitExecutor for SystemGit {
    fn run(&self, dir: Option<&Path>, args: &[&str]) -> Result<String> {
        let command = args.join(" ");
        debug!("git {} (in {:?})", command, dir);

        let mut cmd = Command::new("git");
        cmd.args(args)
            // Never block on an interactive credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null());
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| Error::GitSpawn {
            command: command.clone(),
            message: e.to_string(),
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(Error::GitCommand {
                command,
                output: combined.trim_end().to_string(),
            });
        }

        Ok(combined)
    }
}

/// Derive a repository name from a clone URL or path.
///
/// Takes the final path segment (after the last `/` or `:`, ignoring trailing
/// slashes) and removes one trailing `.git` suffix. The result names both the
/// local clone directory and the remote registered during the merge.
///
/// ```
/// use gist2repo::git::repo_name;
///
/// assert_eq!(repo_name("https://gist.github.com/aa5a315d61ae9438b18d.git"), "aa5a315d61ae9438b18d");
/// assert_eq!(repo_name("git@gist.github.com:aa5a315d61ae9438b18d.git"), "aa5a315d61ae9438b18d");
/// assert_eq!(repo_name("/tmp/clones/aa5a315d61ae9438b18d"), "aa5a315d61ae9438b18d");
/// ```
pub fn repo_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let segment = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed);

    segment.strip_suffix(".git").unwrap_or(segment).to_string()
}
