// src/fetch.rs
use std::thread;
use std::time::{Duration, Instant};

use crate::config::options::FetchOptions;
use crate::core::net::HttpClient;
use crate::error::FetchError;
use crate::model::{Entrant, Race};
use crate::progress::Progress;
use crate::specs::startlist;

/// Source of entrants for one race.
pub trait EntrantFetcher {
    fn fetch(&mut self, race: &Race) -> Result<Vec<Entrant>, FetchError>;
}

/// Fetches start lists from the live site.
pub struct PcsFetcher {
    http: HttpClient,
    base_url: String,
}

impl PcsFetcher {
    pub fn new(opts: &FetchOptions) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpClient::new(opts)?,
            base_url: opts.base_url.clone(),
        })
    }
}

impl EntrantFetcher for PcsFetcher {
    fn fetch(&mut self, race: &Race) -> Result<Vec<Entrant>, FetchError> {
        if race.locator.is_empty() {
            return Err(FetchError::MissingLocator(race.name.clone()));
        }
        let url = startlist::startlist_url(&self.base_url, &race.locator);
        tracing::debug!(race = %race.name, %url, "GET");
        let doc = self.http.get_text(&url)?;
        startlist::parse_startlist(&doc, &self.base_url)
    }
}

/* ---------------- Sequential, paced traversal ---------------- */

/// Outcome of one attempted race. A race that was never attempted has no
/// outcome at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RaceFetch {
    Entrants(Vec<Entrant>),
    Failed(String),
}

/// Per-race outcomes in catalog order.
#[derive(Clone, Debug, Default)]
pub struct FetchReport {
    pub outcomes: Vec<(String, RaceFetch)>,
}

impl FetchReport {
    /// Input for `snapshot::build`. Failed races contribute an empty list.
    pub fn entrants_by_race(&self) -> Vec<(String, Vec<Entrant>)> {
        self.outcomes
            .iter()
            .map(|(race, outcome)| match outcome {
                RaceFetch::Entrants(v) => (race.clone(), v.clone()),
                RaceFetch::Failed(_) => (race.clone(), Vec::new()),
            })
            .collect()
    }

    pub fn failed_races(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, RaceFetch::Failed(_)))
            .map(|(race, _)| race.clone())
            .collect()
    }
}

/// Enforces a minimum pause between the end of one request and the start of
/// the next, however long the request itself took.
pub struct Pacer {
    interval: Duration,
    last_done: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_done: None }
    }

    /// Block until `interval` has passed since the last [`Pacer::done`].
    /// Never waits before the first request.
    pub fn wait(&self) {
        if let Some(last) = self.last_done {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                let remaining = self.interval - elapsed;
                tracing::trace!(?remaining, "politeness delay");
                thread::sleep(remaining);
            }
        }
    }

    /// Mark the current request finished.
    pub fn done(&mut self) {
        self.last_done = Some(Instant::now());
    }
}

/// Attempt every race once, in order, one at a time.
///
/// A failing race is logged, reported and recorded; it never stops the loop.
pub fn fetch_all(
    races: &[Race],
    fetcher: &mut dyn EntrantFetcher,
    interval: Duration,
    progress: &mut dyn Progress,
) -> FetchReport {
    progress.begin(races.len());

    let mut pacer = Pacer::new(interval);
    let mut outcomes = Vec::with_capacity(races.len());

    for race in races {
        pacer.wait();
        let fetched = fetcher.fetch(race);
        pacer.done();
        let outcome = match fetched {
            Ok(entrants) => {
                if entrants.is_empty() {
                    tracing::info!(race = %race.name, "no riders found (start list may not be published yet)");
                } else {
                    tracing::info!(race = %race.name, riders = entrants.len(), "fetched start list");
                }
                progress.item_done(&race.name, entrants.len());
                RaceFetch::Entrants(entrants)
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(race = %race.name, error = %reason, "fetch failed");
                progress.item_failed(&race.name, &reason);
                RaceFetch::Failed(reason)
            }
        };
        outcomes.push((race.name.clone(), outcome));
    }

    progress.finish();
    FetchReport { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;
    use std::collections::HashMap;

    struct Canned {
        pages: HashMap<String, Vec<Entrant>>,
        calls: Vec<(String, Instant)>,
    }

    impl EntrantFetcher for Canned {
        fn fetch(&mut self, race: &Race) -> Result<Vec<Entrant>, FetchError> {
            self.calls.push((race.name.clone(), Instant::now()));
            self.pages
                .get(&race.name)
                .cloned()
                .ok_or_else(|| FetchError::Status { url: race.locator.clone(), status: 503 })
        }
    }

    #[derive(Default)]
    struct Recorder {
        total: usize,
        done: Vec<String>,
        failed: Vec<String>,
        finished: bool,
    }

    impl Progress for Recorder {
        fn begin(&mut self, total: usize) { self.total = total; }
        fn item_done(&mut self, race: &str, _entrants: usize) { self.done.push(s!(race)); }
        fn item_failed(&mut self, race: &str, _reason: &str) { self.failed.push(s!(race)); }
        fn finish(&mut self) { self.finished = true; }
    }

    fn races() -> Vec<Race> {
        vec![Race::new("R1", "race/r1/2026"), Race::new("R2", "race/r2/2026"), Race::new("R3", "race/r3/2026")]
    }

    #[test]
    fn sequential_in_order_with_failures_recorded() {
        let mut fetcher = Canned {
            pages: HashMap::from([
                (s!("R1"), vec![Entrant::new("id1", "A")]),
                (s!("R3"), vec![]),
            ]),
            calls: Vec::new(),
        };
        let mut rec = Recorder::default();
        let report = fetch_all(&races(), &mut fetcher, Duration::ZERO, &mut rec);

        let called: Vec<&str> = fetcher.calls.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(called, vec!["R1", "R2", "R3"]);
        assert_eq!(report.failed_races(), vec![s!("R2")]);
        assert!(matches!(&report.outcomes[1].1, RaceFetch::Failed(msg) if msg.contains("503")));

        let by_race = report.entrants_by_race();
        assert_eq!(by_race.len(), 3);
        assert!(by_race[1].1.is_empty());

        assert_eq!(rec.total, 3);
        assert_eq!(rec.done, vec!["R1", "R3"]);
        assert_eq!(rec.failed, vec!["R2"]);
        assert!(rec.finished);
    }

    #[test]
    fn requests_are_spaced() {
        let mut fetcher = Canned { pages: HashMap::new(), calls: Vec::new() };
        let gap = Duration::from_millis(40);
        let start = Instant::now();
        let report = fetch_all(&races(), &mut fetcher, gap, &mut NullProgress);
        // Three requests, two gaps, no trailing sleep.
        assert!(start.elapsed() >= gap * 2);
        assert_eq!(report.failed_races().len(), 3);
        assert_eq!(fetcher.calls.len(), 3);
    }

    #[test]
    fn first_wait_is_free() {
        let pacer = Pacer::new(Duration::from_secs(60));
        let start = Instant::now();
        pacer.wait();
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    /// Takes longer than the politeness interval on every call.
    struct Slow {
        cost: Duration,
        spans: Vec<(Instant, Instant)>,
    }

    impl EntrantFetcher for Slow {
        fn fetch(&mut self, _race: &Race) -> Result<Vec<Entrant>, FetchError> {
            let start = Instant::now();
            thread::sleep(self.cost);
            self.spans.push((start, Instant::now()));
            Ok(Vec::new())
        }
    }

    #[test]
    fn slow_requests_still_get_a_full_pause() {
        let gap = Duration::from_millis(40);
        let mut fetcher = Slow { cost: gap * 2, spans: Vec::new() };
        fetch_all(&races(), &mut fetcher, gap, &mut NullProgress);

        assert_eq!(fetcher.spans.len(), 3);
        for pair in fetcher.spans.windows(2) {
            let (_, prev_end) = pair[0];
            let (next_start, _) = pair[1];
            assert!(next_start.duration_since(prev_end) >= gap);
        }
    }

    #[test]
    fn missing_locator_fails_without_network() {
        let mut fetcher = PcsFetcher::new(&FetchOptions::default()).unwrap();
        let err = fetcher.fetch(&Race::new("TBD", "")).unwrap_err();
        assert!(matches!(err, FetchError::MissingLocator(name) if name == "TBD"));
    }
}
