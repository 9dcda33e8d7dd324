//! Wall-clock access.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, FixedOffset, Local};

use super::WeekWindow;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// Current instant with the local UTC offset attached.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Week window containing [`now`](Self::now).
    ///
    /// Implementations backed by a real time zone should override this so
    /// Monday midnight is resolved with the zone's DST rules rather than
    /// the offset in effect right now.
    fn week_window(&self) -> WeekWindow {
        WeekWindow::containing(&self.now())
    }
}

/// The system clock in the process's local time zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn week_window(&self) -> WeekWindow {
        WeekWindow::containing(&Local::now())
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
