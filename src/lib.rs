// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod model;
pub mod specs;

pub mod catalog;
pub mod diff;
pub mod matrix;
pub mod snapshot;

pub mod csv;
pub mod fetch;
pub mod file;
pub mod progress;
pub mod runner;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{ConfigError, Error, FetchError, PersistenceError, Result};
pub use model::{ChangeEvent, ChangeKind, Entrant, MatrixRow, Race, RacesCount, Snapshot};
