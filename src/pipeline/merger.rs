//! Stage 4: Sequential history merge
//!
//! Local clones are merged into the destination repository strictly one at a
//! time, since two merges into the same working tree would race on its index
//! and HEAD. Every git command is run with the destination as its working
//! directory; the process directory is never changed.
//!
//! For each clone the sequence is:
//! 1. `git remote add <name> <path>`
//! 2. `git fetch <name>`
//! 3. `git merge --allow-unrelated-histories -m <message> <name>/<branch>`
//! 4. `git remote rm <name>`
//!
//! `<branch>` is the configured branch when one is set. Otherwise it is the
//! branch checked out in the clone, which is the default branch of the source
//! it was cloned from. `master` is used when that cannot be read.
//!
//! When step 1, 2 or 3 fails the error is reported and the remaining fetch and
//! merge steps for that clone are skipped. Once step 1 has succeeded, step 4
//! always runs, enforced by the [`RemoteLink`] guard. A failed merge is
//! aborted so that the next clone starts from a clean tree; the conflict itself
//! is reported, never resolved.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use log::{debug, info, warn};

use crate::config::DEFAULT_BRANCH;
use crate::error::{Error, Result};
use crate::git::{repo_name, GitExecutor};

/// A remote registered in the destination for the duration of one merge.
///
/// Call [`RemoteLink::remove`] to unregister it and observe the outcome. If the
/// link is dropped without that, the removal is still attempted and a failure
/// is logged.
pub struct RemoteLink<'a> {
    git: &'a dyn GitExecutor,
    repo: &'a Path,
    name: String,
    removed: bool,
}

impl<'a> RemoteLink<'a> {
    /// Registers `url` as remote `name` in `repo`.
    pub fn add(git: &'a dyn GitExecutor, repo: &'a Path, name: &str, url: &str) -> Result<Self> {
        git.run(Some(repo), &["remote", "add", name, url])?;
        Ok(Self {
            git,
            repo,
            name: name.to_string(),
            removed: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unregisters the remote.
    pub fn remove(mut self) -> Result<()> {
        self.removed = true;
        self.git
            .run(Some(self.repo), &["remote", "rm", &self.name])
            .map(|_| ())
    }
}

impl Drop for RemoteLink<'_> {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = self.git.run(Some(self.repo), &["remote", "rm", &self.name]) {
            warn!("Failed to remove remote {}: {}", self.name, e);
        }
    }
}

pub struct Merger {
    git: Arc<dyn GitExecutor>,
    repo: PathBuf,
    branch: Option<String>,
    message: String,
}

impl Merger {
    /// Creates a merger into `repo` with commit message `message`.
    ///
    /// With `branch` set, that branch of every source is merged. With `None`,
    /// each source's own checked-out branch is.
    pub fn new(
        git: Arc<dyn GitExecutor>,
        repo: &Path,
        branch: Option<&str>,
        message: &str,
    ) -> Self {
        Self {
            git,
            repo: repo.to_path_buf(),
            branch: branch.map(str::to_string),
            message: message.to_string(),
        }
    }

    /// Starts merging every path received on `paths`, in arrival order.
    ///
    /// The returned error stream closes after the last path is processed.
    pub fn spawn(self, paths: Receiver<PathBuf>) -> Receiver<Error> {
        let (err_tx, err_rx) = mpsc::channel();

        thread::spawn(move || {
            let mut attempted = 0usize;
            let mut merged = 0usize;

            for path in paths {
                attempted += 1;
                let errors = self.merge_one(&path);
                if errors.is_empty() {
                    merged += 1;
                }
                for e in errors {
                    if err_tx.send(e).is_err() {
                        return;
                    }
                }
            }

            info!("Merged {} of {} repositories", merged, attempted);
        });

        err_rx
    }

    /// Runs the four-step merge sequence for one local clone.
    ///
    /// Returns every error encountered, each tagged with the clone path and
    /// the failing step. An empty result means the clone was merged.
    pub fn merge_one(&self, path: &Path) -> Vec<Error> {
        let display = path.display().to_string();
        let fail = |step: &str, e: Error| Error::MergeStep {
            path: display.clone(),
            step: step.to_string(),
            source: Box::new(e),
        };

        let url = path.to_string_lossy();
        let name = repo_name(&url);
        debug!("merging {} as remote {}", display, name);

        let link = match RemoteLink::add(self.git.as_ref(), &self.repo, &name, &url) {
            Ok(link) => link,
            Err(e) => return vec![fail("remote add", e)],
        };

        let mut errors = Vec::new();
        if let Err((step, e)) = self.fetch_and_merge(path, &link) {
            errors.push(fail(step, e));
        }
        if let Err(e) = link.remove() {
            errors.push(fail("remote rm", e));
        }
        errors
    }

    /// Branch to merge from the clone at `path`
    fn source_branch(&self, path: &Path) -> String {
        if let Some(branch) = &self.branch {
            return branch.clone();
        }

        match self.git.run(Some(path), &["symbolic-ref", "--short", "HEAD"]) {
            Ok(out) if !out.trim().is_empty() => out.trim().to_string(),
            Ok(_) => DEFAULT_BRANCH.to_string(),
            Err(e) => {
                debug!("no checked-out branch in {}: {}", path.display(), e);
                DEFAULT_BRANCH.to_string()
            }
        }
    }

    fn fetch_and_merge(
        &self,
        path: &Path,
        link: &RemoteLink<'_>,
    ) -> std::result::Result<(), (&'static str, Error)> {
        self.git
            .run(Some(&self.repo), &["fetch", link.name()])
            .map_err(|e| ("fetch", e))?;

        let head = format!("{}/{}", link.name(), self.source_branch(path));
        let merge = self.git.run(
            Some(&self.repo),
            &[
                "merge",
                "--allow-unrelated-histories",
                "-m",
                &self.message,
                &head,
            ],
        );
        if let Err(e) = merge {
            if let Err(abort) = self.git.run(Some(&self.repo), &["merge", "--abort"]) {
                warn!("Failed to abort merge of {}: {}", head, abort);
            }
            return Err(("merge", e));
        }

        Ok(())
    }
}
