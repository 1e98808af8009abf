// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

/// How the runner treats a race whose fetch failed this run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Failed race counts as "zero entrants". Riders previously entered
    /// show up as REMOVED.
    #[default]
    TreatAsEmpty,
    /// Keep the prior snapshot's memberships for the failed race.
    KeepPrevious,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    pub races_config: PathBuf,
    pub out_dir: PathBuf,
    pub fetch: FetchOptions,
    pub on_failure: FailurePolicy,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            races_config: PathBuf::from(DEFAULT_RACES_CONFIG),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            fetch: FetchOptions::default(),
            on_failure: FailurePolicy::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FetchOptions {
    /// Minimum spacing between the starts of two consecutive requests.
    pub interval: Duration,
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub timeout: Duration,
    pub base_url: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            interval: interval_from_secs(DEFAULT_SLEEP_SECONDS),
            max_retries: MAX_RETRIES,
            backoff_base: Duration::from_millis(BACKOFF_BASE_MS),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            base_url: s!(SITE_BASE),
        }
    }
}

/// Seconds knob → `Duration`. Negative, NaN and infinite values fall back to zero.
pub fn interval_from_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_consts() {
        let opts = RunOptions::default();
        assert_eq!(opts.races_config, PathBuf::from("data/races_2026.json"));
        assert_eq!(opts.out_dir, PathBuf::from("output"));
        assert_eq!(opts.fetch.interval, Duration::from_secs(1));
        assert_eq!(opts.on_failure, FailurePolicy::TreatAsEmpty);
    }

    #[test]
    fn interval_rejects_garbage() {
        assert_eq!(interval_from_secs(0.25), Duration::from_millis(250));
        assert_eq!(interval_from_secs(-1.0), Duration::ZERO);
        assert_eq!(interval_from_secs(f64::NAN), Duration::ZERO);
    }
}
