//! The gist-to-repository pipeline.
//!
//! ## Overview
//!
//! A run is four stages connected by channels, plus an error fan-in:
//! 1. Lister - Page through the gist listing and emit each gist
//! 2. Extractor - Map each gist to its clone URL
//! 3. Cloner - Clone URLs into the temporary root, at most `concurrency` at a time
//! 4. Merger - Merge each clone's history into the destination, one at a time
//! 5. Aggregator - Fan the error streams of stages 1, 3 and 4 into one
//!
//! Every stage runs on its own thread(s) and owns the sending half of its
//! output channels. A stage's channels close when the stage finishes, so
//! draining the aggregated error stream returned by [`run`] also waits for
//! every stage to complete.
//!
//! The channels between stages are rendezvous channels: a stage blocks on
//! send until the next stage is ready to receive. Error channels are
//! unbounded so that reporting never stalls the main flow.

use std::path::Path;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::git::GitExecutor;
use crate::github::GistSource;

pub mod aggregate;
pub mod cloner;
pub mod extract;
pub mod lister;
pub mod merger;

#[cfg(test)]
pub(crate) mod testing;

use cloner::Cloner;
use merger::Merger;

/// Wires every stage together and starts them.
///
/// Clones are placed under `clone_root`, which the caller owns and must keep
/// alive until the returned stream is exhausted. The returned receiver yields
/// every non-fatal error of the run and closes once all stages are done.
///
/// Fails only when the clone worker pool cannot be created, in which case no
/// stage has been started.
pub fn run(
    config: &Config,
    source: Arc<dyn GistSource>,
    git: Arc<dyn GitExecutor>,
    clone_root: &Path,
) -> Result<Receiver<Error>> {
    let cloner = Cloner::new(git.clone(), clone_root, config.concurrency())?;
    let merger = Merger::new(git, config.repo(), config.branch(), config.message());

    let (gists, list_errors) = lister::list_gists(source, config.user());
    let urls = extract::clone_urls(gists);
    let (paths, clone_errors) = cloner.spawn(urls);
    let merge_errors = merger.spawn(paths);

    Ok(aggregate::merge_errors(vec![
        list_errors,
        clone_errors,
        merge_errors,
    ]))
}
