// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The source of "now" and "today".
//!
//! Handlers never read the system clock directly, so tests can pin the date.

use time::{Date, OffsetDateTime, UtcOffset};

/// Supplies the current instant in the restaurant's local offset.
pub trait Clock: Send + Sync {
    /// Returns the current instant, expressed in the restaurant's offset.
    fn now(&self) -> OffsetDateTime;

    /// Returns the restaurant's current calendar day.
    fn today(&self) -> Date {
        self.now().date()
    }
}

/// The real clock, shifted to a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    /// Creates a clock reporting time at `offset`.
    #[must_use]
    pub const fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Creates a clock from a whole-hour offset such as `2` for CEST.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset is outside `-25..=25` hours.
    pub fn from_hours(hours: i8) -> Result<Self, time::error::ComponentRange> {
        Ok(Self::new(UtcOffset::from_hms(hours, 0, 0)?))
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: OffsetDateTime,
}

impl FixedClock {
    /// Creates a clock that always reports `now`.
    #[must_use]
    pub const fn new(now: OffsetDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.now
    }
}
