// src/snapshot.rs
use std::collections::BTreeSet;

use crate::model::{Entrant, RiderRecord, Snapshot};

/// Fold per-race entrant lists into a rider-keyed snapshot.
///
/// Races are visited in the given order; when a rider shows up under several
/// races with different spellings, the last one seen becomes the display name.
/// A race with no entrants contributes nothing.
pub fn build(per_race: &[(String, Vec<Entrant>)]) -> Snapshot {
    let mut snap = Snapshot::new();
    for (race, entrants) in per_race {
        for e in entrants {
            if e.rider_id.is_empty() {
                tracing::warn!(race = %race, name = %e.rider_name, "skipping entrant without rider id");
                continue;
            }
            snap.insert(&e.rider_id, &e.rider_name, race);
        }
    }
    snap
}

/// Copy `prior`'s memberships of each `failed` race into `new`.
///
/// Riders that only exist in `prior` are recreated with their prior name.
/// Riders already in `new` keep their current name.
pub fn carry_forward(new: &mut Snapshot, prior: &Snapshot, failed: &[String]) {
    if failed.is_empty() {
        return;
    }
    for (rider_id, rec) in &prior.riders {
        for race in failed.iter().filter(|r| rec.races.contains(*r)) {
            let entry = new.riders.entry(rider_id.clone()).or_insert_with(|| RiderRecord {
                name: rec.name.clone(),
                races: BTreeSet::new(),
            });
            entry.races.insert(race.clone());
        }
    }
}
