//! Stage 3: Bounded cloning
//!
//! Every incoming clone URL becomes one task on a fixed-size `rayon` pool, so
//! no more than `concurrency` clones ever run at once no matter how many URLs
//! arrive. The pool's scope is the join-all barrier: the output and error
//! streams close only after every spawned clone has finished.
//!
//! Each clone lands in `<root>/<repo_name(url)>`. A failed clone is reported
//! with its URL and is not retried; its path is not handed to the merger.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use log::{debug, info};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Error, Result};
use crate::git::{repo_name, GitExecutor};

pub struct Cloner {
    pool: ThreadPool,
    git: Arc<dyn GitExecutor>,
    root: PathBuf,
}

impl Cloner {
    /// Creates a cloner writing below `root` with at most `concurrency`
    /// simultaneous clones.
    pub fn new(git: Arc<dyn GitExecutor>, root: &Path, concurrency: NonZeroUsize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(concurrency.get())
            .thread_name(|i| format!("clone-{}", i))
            .build()
            .map_err(|e| Error::ThreadPool {
                message: e.to_string(),
            })?;

        Ok(Self {
            pool,
            git,
            root: root.to_path_buf(),
        })
    }

    /// Starts cloning every URL received on `urls`.
    ///
    /// Returns the stream of local clone paths (in completion order) and the
    /// stream of clone errors.
    pub fn spawn(self, urls: Receiver<String>) -> (Receiver<PathBuf>, Receiver<Error>) {
        let (path_tx, path_rx) = mpsc::sync_channel(0);
        let (err_tx, err_rx) = mpsc::channel();

        thread::spawn(move || {
            let Cloner { pool, git, root } = self;
            let cloned = AtomicUsize::new(0);
            let mut accepted = 0usize;

            let executor: &dyn GitExecutor = git.as_ref();
            let root = root.as_path();
            let counter = &cloned;

            pool.in_place_scope(|scope| {
                for url in urls {
                    accepted += 1;
                    let path_tx = path_tx.clone();
                    let err_tx = err_tx.clone();

                    scope.spawn(move |_| match clone_one(executor, root, &url) {
                        Ok(path) => {
                            counter.fetch_add(1, Ordering::SeqCst);
                            let _ = path_tx.send(path);
                        }
                        Err(e) => {
                            let _ = err_tx.send(e);
                        }
                    });
                }
            });

            info!(
                "Cloned {} of {} repositories",
                cloned.load(Ordering::SeqCst),
                accepted
            );
        });

        (path_rx, err_rx)
    }
}

/// Clones `url` into `root` and returns the path of the new clone.
pub fn clone_one(git: &dyn GitExecutor, root: &Path, url: &str) -> Result<PathBuf> {
    let name = repo_name(url);
    if name.is_empty() {
        return Err(Error::Clone {
            url: url.to_string(),
            source: Box::new(Error::InvalidArgument {
                name: "url".to_string(),
                message: "no repository name in clone URL".to_string(),
            }),
        });
    }

    debug!("cloning {} into {}", url, name);
    git.run(Some(root), &["clone", url, &name])
        .map_err(|e| Error::Clone {
            url: url.to_string(),
            source: Box::new(e),
        })?;

    Ok(root.join(name))
}
