// src/matrix.rs
use crate::model::{MatrixRow, RacesCount, Race, Snapshot};

/// Fixed leading and trailing matrix columns.
pub const NAME_COL: &str = "rider_name";
pub const ID_COL: &str = "rider_url";
pub const COUNT_COL: &str = "races_count";

/// Project a snapshot into one presence row per rider.
///
/// Rows are ordered by display name, then rider id (plain byte order, so
/// case-sensitive). Columns follow `races` exactly, including races nobody
/// entered.
pub fn project(snapshot: &Snapshot, races: &[Race]) -> Vec<MatrixRow> {
    let total = races.len();
    let mut rows: Vec<MatrixRow> = snapshot
        .riders
        .iter()
        .map(|(id, rec)| {
            let presence: Vec<bool> = races.iter().map(|r| rec.races.contains(&r.name)).collect();
            let attended = presence.iter().filter(|&&p| p).count();
            MatrixRow {
                rider_name: rec.name.clone(),
                rider_id: id.clone(),
                presence,
                races_count: RacesCount { attended, total },
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.rider_name
            .cmp(&b.rider_name)
            .then_with(|| a.rider_id.cmp(&b.rider_id))
    });
    rows
}

/// `rider_name, rider_url, <race…>, races_count`
pub fn header(races: &[Race]) -> Vec<String> {
    let mut out = Vec::with_capacity(races.len() + 3);
    out.push(s!(NAME_COL));
    out.push(s!(ID_COL));
    out.extend(races.iter().map(|r| r.name.clone()));
    out.push(s!(COUNT_COL));
    out
}
