// src/diff.rs
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::config::consts::UNKNOWN_RIDER;
use crate::model::{ChangeEvent, ChangeKind, Snapshot};

/// Compare two snapshots and list every (rider, race) transition.
///
/// `old == None` is a first run: every membership in `new` is ADDED.
///
/// Output order is fixed: riders by ascending id; per rider ADDED before
/// REMOVED; races by ascending name within each kind.
pub fn diff(old: Option<&Snapshot>, new: &Snapshot, timestamp: DateTime<Utc>) -> Vec<ChangeEvent> {
    let empty = Snapshot::default();
    let old = old.unwrap_or(&empty);
    let no_races = BTreeSet::new();

    let rider_ids: BTreeSet<&str> = old
        .riders
        .keys()
        .chain(new.riders.keys())
        .map(String::as_str)
        .collect();

    let mut out = Vec::new();
    for id in rider_ids {
        let before = old.races_of(id).unwrap_or(&no_races);
        let after = new.races_of(id).unwrap_or(&no_races);
        if before == after {
            continue;
        }

        let name = display_name(old, new, id);
        let event = |race: &String, kind| ChangeEvent {
            timestamp,
            race: race.clone(),
            kind,
            rider_id: s!(id),
            rider_name: name.clone(),
        };

        out.extend(after.difference(before).map(|r| event(r, ChangeKind::Added)));
        out.extend(before.difference(after).map(|r| event(r, ChangeKind::Removed)));
    }
    out
}

/// Current name, else the name on record, else the placeholder.
fn display_name(old: &Snapshot, new: &Snapshot, id: &str) -> String {
    [new, old]
        .iter()
        .filter_map(|snap| snap.riders.get(id))
        .map(|r| r.name.as_str())
        .find(|n| !n.is_empty())
        .map_or_else(|| s!(UNKNOWN_RIDER), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entrant;
    use crate::snapshot::build;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 8, 30, 0).unwrap()
    }

    fn summary(events: &[ChangeEvent]) -> Vec<(String, &'static str, String)> {
        events
            .iter()
            .map(|e| (e.race.clone(), e.kind.as_str(), e.rider_id.clone()))
            .collect()
    }

    #[test]
    fn self_diff_is_empty() {
        let s = build(&[(s!("R1"), vec![Entrant::new("id1", "A"), Entrant::new("id2", "B")])]);
        assert!(diff(Some(&s), &s, t0()).is_empty());
        assert!(diff(Some(&Snapshot::new()), &Snapshot::new(), t0()).is_empty());
    }

    #[test]
    fn bootstrap_adds_every_pair() {
        let s = build(&[
            (s!("R1"), vec![Entrant::new("id1", "A")]),
            (s!("R2"), vec![Entrant::new("id1", "A"), Entrant::new("id2", "B")]),
        ]);
        let events = diff(None, &s, t0());
        assert_eq!(events.len(), s.pair_count());
        assert!(events.iter().all(|e| e.kind == ChangeKind::Added));
        assert!(events.iter().all(|e| e.timestamp == t0()));
    }

    #[test]
    fn ordering_is_by_rider_then_kind_then_race() {
        let old = build(&[
            (s!("B"), vec![Entrant::new("id2", "Two")]),
            (s!("Z"), vec![Entrant::new("id1", "One")]),
        ]);
        let new = build(&[
            (s!("C"), vec![Entrant::new("id1", "One")]),
            (s!("A"), vec![Entrant::new("id1", "One"), Entrant::new("id2", "Two")]),
        ]);
        assert_eq!(
            summary(&diff(Some(&old), &new, t0())),
            vec![
                (s!("A"), "ADDED", s!("id1")),
                (s!("C"), "ADDED", s!("id1")),
                (s!("Z"), "REMOVED", s!("id1")),
                (s!("A"), "ADDED", s!("id2")),
                (s!("B"), "REMOVED", s!("id2")),
            ]
        );
    }

    #[test]
    fn name_fallbacks() {
        let mut old = Snapshot::new();
        old.insert("gone", "Old Name", "R1");
        old.insert("blank", "", "R1");
        let mut new = Snapshot::new();
        new.insert("renamed", "New Name", "R1");
        let mut prior_renamed = old.clone();
        prior_renamed.insert("renamed", "Stale", "R2");

        let events = diff(Some(&prior_renamed), &new, t0());
        let name_of = |id: &str| {
            events.iter().find(|e| e.rider_id == id).map(|e| e.rider_name.clone()).unwrap()
        };
        assert_eq!(name_of("gone"), "Old Name");
        assert_eq!(name_of("blank"), "Unknown");
        assert_eq!(name_of("renamed"), "New Name");
    }

    #[test]
    fn inputs_untouched() {
        let old = build(&[(s!("R1"), vec![Entrant::new("id1", "A")])]);
        let new = build(&[(s!("R2"), vec![Entrant::new("id1", "A")])]);
        let (old_copy, new_copy) = (old.clone(), new.clone());
        let _ = diff(Some(&old), &new, t0());
        assert_eq!(old, old_copy);
        assert_eq!(new, new_copy);
    }
}
