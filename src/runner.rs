// src/runner.rs
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::{
    catalog,
    config::options::{FailurePolicy, RunOptions},
    diff::diff,
    error::Result,
    fetch::{EntrantFetcher, fetch_all},
    matrix,
    model::{ChangeKind, Race},
    progress::{NullProgress, Progress},
    snapshot,
    store::PersistenceAdapter,
};

/// Summary of what a run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub races: usize,
    pub riders: usize,
    pub added: usize,
    pub removed: usize,
    pub failed_races: Vec<String>,
    pub files_written: Vec<PathBuf>,
}

impl RunSummary {
    pub fn changes(&self) -> usize {
        self.added + self.removed
    }
}

/// Load the race catalog and run once, stamped with the current time.
///
/// A bad catalog aborts before any request is made or any file is written.
pub fn run(
    opts: &RunOptions,
    fetcher: &mut dyn EntrantFetcher,
    store: &mut dyn PersistenceAdapter,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let races = catalog::load(&opts.races_config)?;
    tracing::info!(races = races.len(), config = %opts.races_config.display(), "tracking races");
    if let Some(first) = races.first() {
        tracing::debug!(name = %first.name, locator = %first.locator, "first race");
    }
    execute(&races, opts, fetcher, store, progress, Utc::now())
}

/// fetch → build → diff against prior → append changes → matrix → snapshot.
///
/// The snapshot is written last, so a failed write earlier in the run leaves
/// the prior snapshot in place for the next attempt.
pub fn execute(
    races: &[Race],
    opts: &RunOptions,
    fetcher: &mut dyn EntrantFetcher,
    store: &mut dyn PersistenceAdapter,
    progress: Option<&mut dyn Progress>,
    timestamp: DateTime<Utc>,
) -> Result<RunSummary> {
    let mut null = NullProgress;
    let progress: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };

    let report = fetch_all(races, fetcher, opts.fetch.interval, &mut *progress);
    let failed = report.failed_races();

    let mut current = snapshot::build(&report.entrants_by_race());

    let prior = match store.load_snapshot() {
        Ok(prior) => prior,
        Err(e) => {
            tracing::warn!(error = %e, "cannot load prior snapshot; treating this as a first run");
            None
        }
    };

    if opts.on_failure == FailurePolicy::KeepPrevious && !failed.is_empty() {
        if let Some(prior) = &prior {
            tracing::info!(races = ?failed, "keeping previous entrants for failed races");
            snapshot::carry_forward(&mut current, prior, &failed);
        }
    }

    progress.log("Detecting changes…");
    let changes = diff(prior.as_ref(), &current, timestamp);
    let added = changes.iter().filter(|c| c.kind == ChangeKind::Added).count();

    let mut files_written = Vec::with_capacity(3);
    if let Some(path) = store.append_changes(&changes)? {
        files_written.push(path);
    }

    let rows = matrix::project(&current, races);
    files_written.push(store.write_matrix(races, &rows)?);
    files_written.push(store.save_snapshot(&current)?);

    let summary = RunSummary {
        races: races.len(),
        riders: current.rider_count(),
        added,
        removed: changes.len() - added,
        failed_races: failed,
        files_written,
    };
    tracing::info!(
        riders = summary.riders,
        added = summary.added,
        removed = summary.removed,
        failed = summary.failed_races.len(),
        "run complete"
    );
    Ok(summary)
}
