// src/config/consts.rs

// Input
pub const DEFAULT_RACES_CONFIG: &str = "data/races_2026.json";

// Output
pub const DEFAULT_OUT_DIR: &str = "output";
pub const SNAPSHOT_FILE: &str = "startlist_snapshot.json";
pub const MATRIX_FILE: &str = "startlist_matrix.csv";
pub const CHANGES_FILE: &str = "startlist_changes.csv";
pub const CSV_SEP: char = ',';

// Net config
pub const SITE_BASE: &str = "https://www.procyclingstats.com/";
pub const STARTLIST_SUFFIX: &str = "/startlist";
pub const USER_AGENT: &str = concat!("startlist_tracker/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Politeness + retry
pub const SLEEP_SECONDS_ENV: &str = "PCS_SLEEP_SECONDS";
pub const DEFAULT_SLEEP_SECONDS: f64 = 1.0;
pub const MAX_RETRIES: u32 = 3;
pub const BACKOFF_BASE_MS: u64 = 2_000;
pub const BACKOFF_CAP_MS: u64 = 60_000;

// Display name when neither snapshot has one
pub const UNKNOWN_RIDER: &str = "Unknown";
