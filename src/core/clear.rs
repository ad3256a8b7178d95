use std::time::{Duration, Instant};

use crate::ledger::Aggregates;

/// Default quiet period between two destructive clears.
pub const DEFAULT_CLEAR_WINDOW: Duration = Duration::from_millis(300);

/// Collapses bursts of clear requests into one.
///
/// The first request of a burst is admitted. Every request, admitted or not,
/// restarts the quiet period, so a burst only ends once no request has arrived
/// for a full window.
#[derive(Debug, Clone)]
pub struct ClearDebouncer {
    window: Duration,
    last_request: Option<Instant>,
}

impl Default for ClearDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_CLEAR_WINDOW)
    }
}

impl ClearDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_request: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Registers a request at `now` and reports whether it may run.
    pub fn admit(&mut self, now: Instant) -> bool {
        let admitted = match self.last_request {
            Some(previous) => now.saturating_duration_since(previous) >= self.window,
            None => true,
        };
        self.last_request = Some(now);
        admitted
    }
}

/// What a completed clear removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearReport {
    pub removed_entries: usize,
    pub previous_totals: Aggregates,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// Collapsed into an earlier request of the same burst.
    Suppressed,
    /// The caller's confirmation was refused.
    Declined,
    Cleared(ClearReport),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_is_admitted() {
        let mut debouncer = ClearDebouncer::default();
        assert!(debouncer.admit(Instant::now()));
    }

    #[test]
    fn burst_collapses_to_one() {
        let mut debouncer = ClearDebouncer::new(Duration::from_millis(300));
        let start = Instant::now();
        assert!(debouncer.admit(start));
        assert!(!debouncer.admit(start + Duration::from_millis(100)));
        assert!(!debouncer.admit(start + Duration::from_millis(350)));
        assert!(debouncer.admit(start + Duration::from_millis(700)));
    }

    #[test]
    fn zero_window_never_suppresses() {
        let mut debouncer = ClearDebouncer::new(Duration::ZERO);
        let now = Instant::now();
        assert!(debouncer.admit(now));
        assert!(debouncer.admit(now));
    }
}
