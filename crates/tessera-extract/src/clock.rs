//! Sources of the current instant.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};

/// Provides the current instant to date-time resolution.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant. Its offset is also the one used to
    /// interpret formatted values that carry no offset of their own.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Reads the system clock, in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().fixed_offset()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    /// Creates a clock frozen at `instant`.
    #[must_use]
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
