// src/model.rs
//! Data model shared by the snapshot, diff and matrix stages.
//!
//! Ordered collections (`BTreeMap` / `BTreeSet`) are used throughout so that
//! every traversal is deterministic and the serialized snapshot is stable
//! between runs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A configured race. `name` is the stable identifier; catalog order fixes
/// matrix column order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
    pub name: String,
    /// Site path or full URL of the race. May be empty if the config omitted it.
    pub locator: String,
}

impl Race {
    pub fn new(name: impl Into<String>, locator: impl Into<String>) -> Self {
        Self { name: name.into(), locator: locator.into() }
    }
}

/// A rider confirmed for one race at fetch time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entrant {
    /// Stable per-rider key (site-relative rider URL).
    pub rider_id: String,
    /// Display only; may change between runs.
    pub rider_name: String,
}

impl Entrant {
    pub fn new(rider_id: impl Into<String>, rider_name: impl Into<String>) -> Self {
        Self { rider_id: rider_id.into(), rider_name: rider_name.into() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderRecord {
    pub name: String,
    pub races: BTreeSet<String>,
}

/// Complete rider → races state as of one run.
///
/// Serializes as `{ "<riderId>": { "name": ..., "races": [...] } }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub riders: BTreeMap<String, RiderRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.riders.is_empty()
    }

    pub fn rider_count(&self) -> usize {
        self.riders.len()
    }

    /// Number of (rider, race) memberships.
    pub fn pair_count(&self) -> usize {
        self.riders.values().map(|r| r.races.len()).sum()
    }

    /// Every race name referenced by at least one rider.
    pub fn race_names(&self) -> BTreeSet<&str> {
        self.riders
            .values()
            .flat_map(|r| r.races.iter().map(String::as_str))
            .collect()
    }

    pub fn races_of(&self, rider_id: &str) -> Option<&BTreeSet<String>> {
        self.riders.get(rider_id).map(|r| &r.races)
    }

    /// Add `race` to the rider's set, creating the rider if needed.
    /// `name` replaces the stored display name.
    pub fn insert(&mut self, rider_id: &str, name: &str, race: &str) {
        let rec = self.riders.entry(s!(rider_id)).or_default();
        rec.name = s!(name);
        rec.races.insert(s!(race));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChangeKind {
    Added,
    Removed,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "ADDED",
            ChangeKind::Removed => "REMOVED",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected (rider, race) transition between two consecutive snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    pub timestamp: DateTime<Utc>,
    pub race: String,
    pub kind: ChangeKind,
    pub rider_id: String,
    pub rider_name: String,
}

impl ChangeEvent {
    /// Change-log row: timestamp, race, change_type, rider_name, rider_url.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            format_timestamp(&self.timestamp),
            self.race.clone(),
            s!(self.kind.as_str()),
            self.rider_name.clone(),
            self.rider_id.clone(),
        ]
    }
}

/// ISO-8601 UTC with microseconds, e.g. `2026-02-28T06:00:00.000000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RacesCount {
    pub attended: usize,
    pub total: usize,
}

impl fmt::Display for RacesCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.attended, self.total)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixRow {
    pub rider_name: String,
    pub rider_id: String,
    /// Aligned with catalog order.
    pub presence: Vec<bool>,
    pub races_count: RacesCount,
}

impl MatrixRow {
    /// Matrix CSV row: name, id, one `X`/empty cell per race, `attended/total`.
    pub fn to_record(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.presence.len() + 3);
        out.push(self.rider_name.clone());
        out.push(self.rider_id.clone());
        out.extend(self.presence.iter().map(|&p| if p { s!("X") } else { s!() }));
        out.push(self.races_count.to_string());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn snapshot_json_shape() {
        let mut snap = Snapshot::new();
        snap.insert("rider/a", "Alice", "R2");
        snap.insert("rider/a", "Alice", "R1");
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "rider/a": { "name": "Alice", "races": ["R1", "R2"] } })
        );
    }

    #[test]
    fn snapshot_dedups_races_on_load() {
        let snap: Snapshot =
            serde_json::from_str(r#"{"id1":{"name":"A","races":["R1","R1","R2"]}}"#).unwrap();
        assert_eq!(snap.pair_count(), 2);
        assert_eq!(snap.race_names().into_iter().collect::<Vec<_>>(), vec!["R1", "R2"]);
    }

    #[test]
    fn change_record_layout() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 28, 6, 0, 0).unwrap();
        let ev = ChangeEvent {
            timestamp: ts,
            race: s!("Omloop"),
            kind: ChangeKind::Removed,
            rider_id: s!("rider/x"),
            rider_name: s!("X"),
        };
        assert_eq!(
            ev.to_record(),
            vec!["2026-02-28T06:00:00.000000Z", "Omloop", "REMOVED", "X", "rider/x"]
        );
    }

    #[test]
    fn matrix_record_layout() {
        let row = MatrixRow {
            rider_name: s!("Bob"),
            rider_id: s!("id2"),
            presence: vec![false, true],
            races_count: RacesCount { attended: 1, total: 2 },
        };
        assert_eq!(row.to_record(), vec!["Bob", "id2", "", "X", "1/2"]);
    }
}
