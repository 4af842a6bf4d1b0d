// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Self-service cancellation window.
//!
//! Customers may cancel a booking with its code only while the booking date
//! is at least [`CANCELLATION_LEAD_DAYS`] calendar days away. Staff deletions
//! are not subject to this rule.

use crate::error::DomainError;
use time::Date;

/// Minimum number of whole days between today and the booking date.
pub const CANCELLATION_LEAD_DAYS: i64 = 2;

/// Returns the number of whole calendar days from `today` to `booking_date`.
///
/// Negative for past dates. Both values are calendar days, so the result is
/// exact and needs no rounding.
#[must_use]
pub fn days_until(booking_date: Date, today: Date) -> i64 {
    (booking_date - today).whole_days()
}

/// Returns whether a booking on `booking_date` may still be cancelled.
///
/// # Arguments
///
/// * `booking_date` - The booked calendar day
/// * `today` - The current calendar day
#[must_use]
pub fn can_cancel(booking_date: Date, today: Date) -> bool {
    days_until(booking_date, today) >= CANCELLATION_LEAD_DAYS
}

/// Checks the cancellation window.
///
/// # Errors
///
/// Returns `DomainError::CancellationWindowClosed` when the booking date is
/// less than two days away, today, or in the past.
pub fn check_cancellation(booking_date: Date, today: Date) -> Result<(), DomainError> {
    if can_cancel(booking_date, today) {
        return Ok(());
    }
    Err(DomainError::CancellationWindowClosed {
        date: booking_date,
        days_remaining: days_until(booking_date, today),
    })
}
