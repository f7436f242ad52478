use std::sync::{Mutex, PoisonError};

use jiff::{SignedDuration, Timestamp};

/// Hands out submission timestamps that strictly increase within a store,
/// even if the wall clock stalls or steps backwards.
///
/// A fresh clock only orders stamps it issued itself. Stores holding earlier
/// records raise the floor with [`SubmissionClock::observe`] so new stamps
/// also sort after everything already persisted.
#[derive(Debug)]
pub struct SubmissionClock {
    last: Mutex<Timestamp>,
}

impl SubmissionClock {
    pub fn new() -> Self {
        Self::starting_after(Timestamp::UNIX_EPOCH)
    }

    /// A clock whose first stamp is later than `floor`.
    pub fn starting_after(floor: Timestamp) -> Self {
        Self {
            last: Mutex::new(floor),
        }
    }

    /// Raise the floor to `seen` if it is later than anything stamped so far.
    pub fn observe(&self, seen: Timestamp) {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if seen > *last {
            *last = seen;
        }
    }

    pub fn stamp(&self) -> Timestamp {
        let now = Timestamp::now();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let next = if now > *last {
            now
        } else {
            *last + SignedDuration::from_nanos(1)
        };
        *last = next;
        next
    }
}

impl Default for SubmissionClock {
    fn default() -> Self {
        Self::new()
    }
}
