// src/progress.rs
/// Lightweight progress reporting for the fetch loop.
/// Frontends implement this to surface per-race status to users.
pub trait Progress {
    /// Called at the start with the number of races to attempt.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A race was fetched; `entrants` may be zero.
    fn item_done(&mut self, _race: &str, _entrants: usize) {}

    /// A race could not be fetched this run.
    fn item_failed(&mut self, _race: &str, _reason: &str) {}

    /// Called once every race has been attempted.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
