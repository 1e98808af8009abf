// src/log.rs
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter for a `-v` count, scoped to this crate.
fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "startlist_tracker=info",
        1 => "startlist_tracker=debug",
        _ => "startlist_tracker=trace",
    }
}

/// Install the global subscriber: compact stderr output plus, optionally, an
/// appending plain-text log file. `RUST_LOG` overrides the `-v` level.
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(io::stderr))
        .with(file_layer)
        .try_init();
    Ok(())
}
