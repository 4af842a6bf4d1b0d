// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::booking_code::BookingCode;
use crate::error::DomainError;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Parses a calendar date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(date_string: &str) -> Result<Date, DomainError> {
    Date::parse(
        date_string.trim(),
        format_description!("[year]-[month]-[day]"),
    )
    .map_err(|e| DomainError::DateParseError {
        date_string: date_string.to_string(),
        error: e.to_string(),
    })
}

/// A booking request as entered by a customer or staff member.
///
/// Text fields are raw input. They are trimmed when the submission is
/// turned into a [`Booking`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSubmission {
    /// The requested calendar day.
    pub date: Date,
    /// The number of seats requested.
    pub seats: u32,
    /// The customer's name.
    pub name: String,
    /// The customer's phone number.
    pub phone: String,
    /// The customer's email address, if given.
    pub email: Option<String>,
    /// Free-form notes, if given.
    pub notes: Option<String>,
}

/// A persisted (or about to be persisted) booking.
///
/// Bookings are never mutated after creation. They are removed by
/// cancellation, admin deletion, or a day reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// The store-assigned identifier.
    /// `None` indicates the booking has not been persisted yet.
    pub booking_id: Option<i64>,
    /// The booked calendar day.
    pub date: Date,
    /// The number of seats booked (at least 1).
    pub seats: u32,
    /// The customer's name (non-empty).
    pub name: String,
    /// The customer's phone number (non-empty).
    pub phone: String,
    /// The customer's email address.
    pub email: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// The confirmation code given to the customer.
    pub code: BookingCode,
    /// When the booking was created.
    pub created_at: OffsetDateTime,
}

impl Booking {
    /// Builds an unpersisted booking from a submission.
    ///
    /// All text fields are trimmed and blank optional fields become `None`.
    /// No validation happens here; see `validate_submission`.
    ///
    /// # Arguments
    ///
    /// * `submission` - The raw submission
    /// * `code` - The freshly generated booking code
    /// * `created_at` - The creation timestamp
    #[must_use]
    pub fn from_submission(
        submission: &BookingSubmission,
        code: BookingCode,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            booking_id: None,
            date: submission.date,
            seats: submission.seats,
            name: submission.name.trim().to_string(),
            phone: submission.phone.trim().to_string(),
            email: non_blank(submission.email.as_deref()),
            notes: non_blank(submission.notes.as_deref()),
            code,
            created_at,
        }
    }
}

/// Trims an optional string, mapping blank values to `None`.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Per-day configuration set by staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySetting {
    /// The day this setting applies to.
    pub date: Date,
    /// The maximum number of seats that may be booked.
    pub seat_cap: u32,
    /// Manual sold-out override.
    pub is_sold_out: bool,
    /// When the setting was last changed. `None` for an implicit default.
    pub updated_at: Option<OffsetDateTime>,
}

impl DaySetting {
    /// Returns the implicit setting used when a day has never been configured.
    #[must_use]
    pub const fn default_for(date: Date, default_seat_cap: u32) -> Self {
        Self {
            date,
            seat_cap: default_seat_cap,
            is_sold_out: false,
            updated_at: None,
        }
    }
}

/// Derived seat accounting for one day. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAvailability {
    /// The day.
    pub date: Date,
    /// The seat cap in effect.
    pub total_seats: u32,
    /// Sum of seats over the day's live bookings.
    pub booked_seats: u32,
    /// `max(0, total_seats - booked_seats)`.
    pub available_seats: u32,
    /// Manual flag set, or no seats left.
    pub is_sold_out: bool,
}

impl DayAvailability {
    /// Returns the booked share of the seat cap as a whole percentage, capped at 100.
    #[must_use]
    pub fn occupancy_percent(&self) -> u32 {
        if self.total_seats == 0 {
            return 100;
        }
        let percent: u64 = u64::from(self.booked_seats) * 100 / u64::from(self.total_seats);
        u32::try_from(percent.min(100)).unwrap_or(100)
    }
}
