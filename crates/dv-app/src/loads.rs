//! Ordering of overlapping dataset loads

use std::path::PathBuf;

use dv_data::{DataError, LoadedTable};

/// Result of a load running on the runtime
pub enum LoadMessage {
    Main {
        token: u64,
        path: PathBuf,
        result: Result<LoadedTable, DataError>,
    },
    Auxiliary {
        name: &'static str,
        path: PathBuf,
        result: Result<LoadedTable, DataError>,
    },
}

/// Hands out one token per requested main-dataset load.
/// Only the result of the latest request may replace the dataset.
#[derive(Debug, Default)]
pub struct LoadTracker {
    latest: u64,
}

impl LoadTracker {
    /// Start a new request, superseding every earlier one
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_earlier_load_is_superseded() {
        let mut loads = LoadTracker::default();
        let first = loads.begin();
        let second = loads.begin();

        // The second load finishes first, then the first one arrives
        assert!(loads.is_current(second));
        assert!(!loads.is_current(first));
    }

    #[test]
    fn test_synchronous_load_supersedes_pending_ones() {
        let mut loads = LoadTracker::default();
        let pending = loads.begin();
        let sample = loads.begin();
        assert!(!loads.is_current(pending));
        assert!(loads.is_current(sample));
    }
}
