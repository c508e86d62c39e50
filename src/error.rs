//! # Error Handling
//!
//! This module defines the centralized error type for `gist2repo`. It uses the
//! `thiserror` library to build an `Error` enum covering every failure mode of
//! the pipeline, from missing startup arguments to a single failed merge step.
//!
//! Errors fall into three groups:
//!
//! - **Startup errors** (`MissingArgument`, `InvalidArgument`, `ThreadPool`)
//!   abort the run before any stage starts.
//! - **Per-item errors** (`Api`, `Clone`, `MergeStep`) are produced by the
//!   pipeline stages, wrapped with the URL or path they relate to, and
//!   forwarded to the error aggregator. They never stop sibling work.
//! - **Leaf errors** (`GitCommand`, `GitSpawn`, `Io`, `Http`, `UrlParse`) are
//!   the raw causes that the per-item variants wrap.

use thiserror::Error;

/// Main error type for gist2repo operations
#[derive(Error, Debug)]
pub enum Error {
    /// A mandatory argument was not supplied or was empty.
    #[error("One or more arguments have not been passed: missing {name}")]
    MissingArgument { name: String },

    /// An argument was supplied but its value is unusable.
    #[error("Invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    /// A git command ran and exited with a non-zero status.
    ///
    /// `output` holds the combined stdout and stderr of the command.
    #[error("git {command} failed: {output}")]
    GitCommand { command: String, output: String },

    /// The git binary could not be started at all.
    #[error("git {command} could not be started: {message}")]
    GitSpawn { command: String, message: String },

    /// The listing API answered with a non-success status.
    #[error("API request to {url} failed with status {status}: {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    /// Cloning one source repository failed.
    #[error("{url}: {source}")]
    Clone {
        url: String,
        #[source]
        source: Box<Error>,
    },

    /// One step of the merge sequence failed for a local clone.
    #[error("{path}: {step}: {source}")]
    MergeStep {
        path: String,
        step: String,
        #[source]
        source: Box<Error>,
    },

    /// The clone worker pool could not be created.
    #[error("Cannot build clone worker pool: {message}")]
    ThreadPool { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A transport or decoding error from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
