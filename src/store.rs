// src/store.rs
//! Durable state between runs.
//!
//! The core never touches storage; the runner goes through
//! [`PersistenceAdapter`]. [`FileStore`] is the on-disk implementation:
//!
//! | file                      | format | lifecycle            |
//! |---------------------------|--------|----------------------|
//! | `startlist_snapshot.json` | JSON   | replaced every run   |
//! | `startlist_changes.csv`   | CSV    | append-only          |
//! | `startlist_matrix.csv`    | CSV    | replaced every run   |

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::consts::{CHANGES_FILE, CSV_SEP, MATRIX_FILE, SNAPSHOT_FILE};
use crate::csv::rows_to_string;
use crate::error::PersistenceError;
use crate::file::{append_rows, ensure_directory, write_atomic};
use crate::matrix;
use crate::model::{ChangeEvent, MatrixRow, Race, RiderRecord, Snapshot};

pub const CHANGE_LOG_HEADER: [&str; 5] = ["timestamp", "race", "change_type", "rider_name", "rider_url"];

pub trait PersistenceAdapter {
    /// Prior snapshot, or `None` on a first run.
    fn load_snapshot(&self) -> Result<Option<Snapshot>, PersistenceError>;

    fn save_snapshot(&mut self, snapshot: &Snapshot) -> Result<PathBuf, PersistenceError>;

    /// Append to the change log. Returns `None` (and touches nothing) when
    /// `changes` is empty.
    fn append_changes(&mut self, changes: &[ChangeEvent]) -> Result<Option<PathBuf>, PersistenceError>;

    fn write_matrix(&mut self, races: &[Race], rows: &[MatrixRow]) -> Result<PathBuf, PersistenceError>;
}

/* ---------------- File-backed store ---------------- */

#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    pub fn changes_path(&self) -> PathBuf {
        self.dir.join(CHANGES_FILE)
    }

    pub fn matrix_path(&self) -> PathBuf {
        self.dir.join(MATRIX_FILE)
    }
}

impl PersistenceAdapter for FileStore {
    fn load_snapshot(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let path = self.snapshot_path();
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PersistenceError::io(&path, e)),
        };
        let raw: Value = serde_json::from_str(&text)
            .map_err(|source| PersistenceError::Decode { path: path.clone(), source })?;

        let snap = decode_snapshot(&raw);
        match &snap {
            Some(s) => tracing::debug!(path = %path.display(), riders = s.rider_count(), "loaded prior snapshot"),
            None => tracing::warn!(path = %path.display(), "prior snapshot has an unrecognized shape; starting fresh"),
        }
        Ok(snap)
    }

    fn save_snapshot(&mut self, snapshot: &Snapshot) -> Result<PathBuf, PersistenceError> {
        ensure_directory(&self.dir)?;
        let path = self.snapshot_path();
        let mut json = serde_json::to_string_pretty(snapshot).map_err(PersistenceError::Encode)?;
        json.push('\n');
        write_atomic(&path, json.as_bytes())?;
        tracing::info!(path = %path.display(), riders = snapshot.rider_count(), "saved snapshot");
        Ok(path)
    }

    fn append_changes(&mut self, changes: &[ChangeEvent]) -> Result<Option<PathBuf>, PersistenceError> {
        if changes.is_empty() {
            tracing::info!("no changes detected");
            return Ok(None);
        }
        ensure_directory(&self.dir)?;
        let path = self.changes_path();
        let header: Vec<String> = CHANGE_LOG_HEADER.iter().map(|h| s!(*h)).collect();
        let rows: Vec<Vec<String>> = changes.iter().map(ChangeEvent::to_record).collect();
        append_rows(&path, &header, &rows, CSV_SEP)?;
        tracing::info!(path = %path.display(), changes = changes.len(), "logged changes");
        Ok(Some(path))
    }

    fn write_matrix(&mut self, races: &[Race], rows: &[MatrixRow]) -> Result<PathBuf, PersistenceError> {
        ensure_directory(&self.dir)?;
        let path = self.matrix_path();
        let header = matrix::header(races);
        let records: Vec<Vec<String>> = rows.iter().map(MatrixRow::to_record).collect();
        let text = rows_to_string(Some(&header), &records, CSV_SEP);
        write_atomic(&path, text.as_bytes())?;
        tracing::info!(path = %path.display(), riders = rows.len(), "generated matrix");
        Ok(path)
    }
}

/* ---------------- Snapshot decoding (current + legacy shapes) ---------------- */

/// Interpret a parsed snapshot file.
///
/// Accepted shapes:
/// - current: `{ riderId: { "name": .., "races": [..] } }`
/// - wrapped: `{ "timestamp_utc": .., "races": { race: [rider, ..] } }`, where a
///   rider is a URL string or `{ "url"|"rider_url", "name"|"rider_name" }`
/// - by race: `{ race: [riderUrl, ..] }`
///
/// `{ riderUrl: riderName }` carries no race memberships and, like any other
/// shape, yields `None`. An empty object is an empty snapshot.
pub fn decode_snapshot(raw: &Value) -> Option<Snapshot> {
    let obj = raw.as_object()?;
    if obj.is_empty() {
        return Some(Snapshot::new());
    }

    if obj.contains_key("timestamp_utc") || obj.get("races").is_some_and(Value::is_object) {
        let by_race = obj.get("races").and_then(Value::as_object);
        return Some(by_race.map(invert_by_race).unwrap_or_default());
    }

    let is_record = |v: &Value| v.as_object().is_some_and(|r| r.contains_key("races"));
    if obj.values().any(is_record) {
        Some(decode_by_rider(obj))
    } else if obj.values().any(Value::is_array) {
        Some(invert_by_race(obj))
    } else {
        None
    }
}

/// Current shape, one record at a time. A bad record costs that rider, not
/// the whole baseline.
fn decode_by_rider(by_rider: &Map<String, Value>) -> Snapshot {
    let mut snap = Snapshot::new();
    for (id, rec) in by_rider {
        let Some(rec) = rec.as_object() else {
            tracing::warn!(rider = %id, "skipping snapshot record that is not an object");
            continue;
        };
        let races = rec
            .get("races")
            .and_then(Value::as_array)
            .map(|rs| rs.iter().filter_map(Value::as_str).map(String::from).collect())
            .unwrap_or_default();
        let name = rec.get("name").and_then(Value::as_str).unwrap_or("");
        snap.riders.insert(id.clone(), RiderRecord { name: s!(name), races });
    }
    snap
}

/// `{ race: [rider, ..] }` → rider-keyed snapshot.
fn invert_by_race(by_race: &Map<String, Value>) -> Snapshot {
    let mut snap = Snapshot::new();
    for (race, riders) in by_race {
        let Some(riders) = riders.as_array() else { continue };
        for rider in riders {
            let (url, name) = match rider {
                Value::String(url) => (url.as_str(), ""),
                Value::Object(o) => (
                    str_field(o, &["url", "rider_url"]),
                    str_field(o, &["name", "rider_name"]),
                ),
                _ => continue,
            };
            if url.is_empty() {
                continue;
            }
            // Keep a known name over a blank one from a later race.
            let known = snap.riders.get(url).map(|r| r.name.clone()).unwrap_or_default();
            let name = if name.is_empty() { known.as_str() } else { name };
            snap.insert(url, name, race);
        }
    }
    snap
}

fn str_field<'a>(o: &'a Map<String, Value>, keys: &[&str]) -> &'a str {
    keys.iter()
        .filter_map(|k| o.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or("")
}
