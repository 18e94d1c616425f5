use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in ledger time, in whole seconds since the Unix epoch.
///
/// The ledger never reads the wall clock on its own; every state-changing
/// operation receives the timestamp of its transaction context, so tests can
/// drive time explicitly. [`Timestamp::now`] is a convenience for callers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The current wall-clock time.
    pub fn now() -> Self {
        let secs = Utc::now().timestamp();
        // Pre-1970 clocks collapse to the epoch.
        Timestamp(secs.max(0) as u64)
    }

    pub fn secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs` seconds.
    pub fn plus_secs(&self, secs: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Timestamp(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_and_shift() {
        let t = Timestamp(100);
        assert!(t < t.plus_secs(1));
        assert_eq!(t.plus_secs(50), Timestamp(150));
    }

    #[test]
    fn test_now_is_nonzero() {
        assert!(Timestamp::now().secs() > 0);
    }
}
