// src/error.rs
//! Error taxonomy.
//!
//! - [`ConfigError`]: race configuration is unusable. Fatal, raised before any fetch.
//! - [`FetchError`]: one race could not be fetched or parsed. Recovered per race.
//! - [`PersistenceError`]: artifact I/O. A corrupt prior snapshot is recovered
//!   by the runner; failing to write output is fatal.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read race config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("race config {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected race config structure: {0}")]
    UnexpectedShape(String),

    #[error("race entry #{index} is not an object")]
    NotAnObject { index: usize },

    #[error("race entry #{index} has neither a name nor a source locator")]
    MissingFields { index: usize },

    #[error("duplicate race name: {0}")]
    DuplicateName(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("race {0} has no source locator")]
    MissingLocator(String),

    #[error("cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("giving up on {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: String,
    },

    #[error("cannot parse start list: {0}")]
    Parse(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("snapshot {path} is not valid JSON: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
