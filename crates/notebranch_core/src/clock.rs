//! Time source used by lifecycle services.
//!
//! Services take a [`Clock`] instead of reading the system time directly so
//! revision recency rules can be exercised with controlled instants.

use crate::model::timestamp::format_timestamp;
use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Current instant in canonical storage encoding.
    fn now_string(&self) -> String {
        format_timestamp(self.now())
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock. Only moves when [`FixedClock::advance`] is called.
#[derive(Debug, Clone)]
pub struct FixedClock {
    current: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Cell::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.current.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
