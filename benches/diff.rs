// benches/diff.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use chrono::Utc;
use startlist_tracker::diff::diff;
use startlist_tracker::matrix::project;
use startlist_tracker::snapshot::build;
use startlist_tracker::{Entrant, Race};

/// A season's worth of races with heavily overlapping fields.
fn season(races: usize, field: usize, shift: usize) -> (Vec<Race>, Vec<(String, Vec<Entrant>)>) {
    let catalog: Vec<Race> = (0..races)
        .map(|i| Race::new(format!("Race {i:03}"), format!("race/r{i}/2026")))
        .collect();
    let entrants = catalog
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let list = (0..field)
                .map(|j| {
                    let id = (i * 37 + j + shift) % (field * 4);
                    Entrant::new(format!("rider/r{id:05}"), format!("RIDER {id}"))
                })
                .collect();
            (r.name.clone(), list)
        })
        .collect();
    (catalog, entrants)
}

fn bench_pipeline(c: &mut Criterion) {
    let (races, week1) = season(80, 175, 0);
    let (_, week2) = season(80, 175, 3);
    let old = build(&week1);
    let new = build(&week2);

    c.bench_function("build_snapshot", |b| {
        b.iter(|| black_box(build(black_box(&week2))).rider_count())
    });

    c.bench_function("diff_snapshots", |b| {
        let now = Utc::now();
        b.iter(|| black_box(diff(Some(black_box(&old)), black_box(&new), now)).len())
    });

    c.bench_function("project_matrix", |b| {
        b.iter(|| black_box(project(black_box(&new), black_box(&races))).len())
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
