//! # gist2repo
//!
//! This library collects every gist of a user into one git repository. Each
//! gist is cloned as a standalone repository and its history is merged into
//! the destination with `git merge --allow-unrelated-histories`, so the
//! destination ends up with the full commit history of every gist.
//!
//! ## Quick Example
//!
//! ```
//! use gist2repo::config::Config;
//! use gist2repo::git::repo_name;
//!
//! let config = Config::new(
//!     Some("ghp_example".to_string()),
//!     Some("octocat".to_string()),
//!     Some("/srv/gists".into()),
//! )
//! .unwrap();
//! assert_eq!(config.concurrency().get(), 30);
//!
//! // Clones and remotes are named after the last URL segment
//! assert_eq!(repo_name("https://gist.github.com/aa5a315d61ae9438b18d.git"), "aa5a315d61ae9438b18d");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: The immutable settings of one run.
//! - **Listing (`github`)**: A paginated client for the gist listing API,
//!   behind the `GistSource` trait.
//! - **Git execution (`git`)**: Shells out to `git` behind the `GitExecutor`
//!   trait, always with an explicit working directory.
//! - **Pipeline (`pipeline`)**: The concurrent stages that list, clone and merge,
//!   plus the fan-in that reports every error in one place.
//!
//! ## Execution Flow
//!
//! [`pipeline::run`] starts the stages and returns the aggregated error
//! stream:
//!
//! 1.  **Listing**: Page through the user's gists.
//! 2.  **Extraction**: Turn each gist into a clone URL.
//! 3.  **Cloning**: Clone into a temporary root with bounded parallelism.
//! 4.  **Merging**: Merge each clone into the destination, one at a time.
//!
//! Failures of single pages, clones or merge steps are reported on the error
//! stream and never stop the rest of the run.

pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod pipeline;

#[cfg(test)]
mod name_proptest;
