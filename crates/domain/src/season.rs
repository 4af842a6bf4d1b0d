// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operating season and date helpers.
//!
//! The restaurant accepts bookings on every day from a fixed start date to a
//! fixed end date (both inclusive), except one weekday on which it is closed.
//! The season is configuration, not discovered at runtime.
//!
//! ## Invariants
//!
//! - `start <= end`
//! - The default seat cap is positive
//! - Operating dates are ascending and never fall on the closed weekday

use crate::error::DomainError;
use crate::validation::validate_seat_cap;
use time::{Date, Weekday};

/// The configured booking season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatingSeason {
    /// First day of the season (inclusive).
    start: Date,
    /// Last day of the season (inclusive).
    end: Date,
    /// The weekday on which the restaurant is closed.
    closed_weekday: Weekday,
    /// Seat cap used for days without an explicit setting.
    default_seat_cap: u32,
}

impl OperatingSeason {
    /// Creates a new `OperatingSeason`.
    ///
    /// # Arguments
    ///
    /// * `start` - First day of the season (inclusive)
    /// * `end` - Last day of the season (inclusive)
    /// * `closed_weekday` - The weekday excluded from every week
    /// * `default_seat_cap` - Seat cap for days without an explicit setting
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `start` is after `end`
    /// - `default_seat_cap` is zero
    pub fn new(
        start: Date,
        end: Date,
        closed_weekday: Weekday,
        default_seat_cap: u32,
    ) -> Result<Self, DomainError> {
        if start > end {
            return Err(DomainError::InvalidSeason {
                reason: format!("start date {start} is after end date {end}"),
            });
        }
        validate_seat_cap(default_seat_cap)?;
        Ok(Self {
            start,
            end,
            closed_weekday,
            default_seat_cap,
        })
    }

    /// Returns the first day of the season.
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the last day of the season.
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns the weekday on which the restaurant is closed.
    #[must_use]
    pub const fn closed_weekday(&self) -> Weekday {
        self.closed_weekday
    }

    /// Returns the seat cap for days without an explicit setting.
    #[must_use]
    pub const fn default_seat_cap(&self) -> u32 {
        self.default_seat_cap
    }

    /// Returns every operating date in ascending order.
    ///
    /// Covers `[start, end]` inclusive, minus every occurrence of the closed
    /// weekday. Deterministic and independent of the current date.
    #[must_use]
    pub fn operating_dates(&self) -> Vec<Date> {
        let mut dates: Vec<Date> = Vec::new();
        let mut current: Option<Date> = Some(self.start);

        while let Some(date) = current {
            if date > self.end {
                break;
            }
            if date.weekday() != self.closed_weekday {
                dates.push(date);
            }
            current = date.next_day();
        }

        dates
    }

    /// Returns whether the date is an operating date.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        date >= self.start && date <= self.end && date.weekday() != self.closed_weekday
    }

    /// Checks that a date is an operating date.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDate` if the date is outside the season or
    /// falls on the closed weekday.
    pub fn ensure_operating_date(&self, date: Date) -> Result<(), DomainError> {
        if date < self.start || date > self.end {
            return Err(DomainError::InvalidDate {
                date,
                reason: format!("outside the season {} to {}", self.start, self.end),
            });
        }
        if date.weekday() == self.closed_weekday {
            return Err(DomainError::InvalidDate {
                date,
                reason: format!("the restaurant is closed on {}", self.closed_weekday),
            });
        }
        Ok(())
    }
}

/// Returns whether `date` lies before `today`.
///
/// Both values are calendar days, so time of day never matters.
#[must_use]
pub fn is_past(date: Date, today: Date) -> bool {
    date < today
}
