// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::season::{OperatingSeason, is_past};
use crate::types::{BookingSubmission, DayAvailability};
use time::Date;

/// Upper bound for a seat cap and for the seats of a single booking.
pub const MAX_SEATS: u32 = 10_000;

/// Validates a public booking submission against current availability.
///
/// This function is pure, deterministic, and has no side effects.
/// Checks run in a fixed order and the first failure is returned.
///
/// # Arguments
///
/// * `submission` - The customer's submission
/// * `availability` - Freshly computed availability for the submission's date
/// * `today` - The current calendar day
///
/// # Returns
///
/// * `Ok(())` if the booking may be persisted
/// * `Err(DomainError)` describing the first rule violated
///
/// # Errors
///
/// Returns an error if:
/// - The date is in the past (`InvalidDate`)
/// - The day is sold out (`SoldOut`)
/// - The seat count is 0 or exceeds the available seats (`SeatsOutOfRange`)
/// - Name or phone is blank (`MissingRequiredField`)
/// - Email is present but malformed (`InvalidEmail`)
pub fn validate_submission(
    submission: &BookingSubmission,
    availability: &DayAvailability,
    today: Date,
) -> Result<(), DomainError> {
    // Rule: no bookings for past days
    if is_past(submission.date, today) {
        return Err(DomainError::InvalidDate {
            date: submission.date,
            reason: String::from("the date is in the past"),
        });
    }

    // Rule: a sold-out day rejects bookings regardless of the numbers
    if availability.is_sold_out {
        return Err(DomainError::SoldOut {
            date: submission.date,
        });
    }

    // Rule: 1 <= seats <= available
    if submission.seats < 1 || submission.seats > availability.available_seats {
        return Err(DomainError::SeatsOutOfRange {
            requested: submission.seats,
            available: availability.available_seats,
        });
    }

    validate_contact_fields(submission)
}

/// Validates a booking entered manually by staff.
///
/// Staff may book past days, sold-out days, and beyond the seat cap.
/// Only the shape of the booking is checked.
///
/// # Errors
///
/// Returns an error if:
/// - The date is not an operating date (`InvalidDate`)
/// - The seat count is 0 or above [`MAX_SEATS`] (`SeatsOutOfRange`)
/// - Name or phone is blank (`MissingRequiredField`)
/// - Email is present but malformed (`InvalidEmail`)
pub fn validate_manual_booking(
    submission: &BookingSubmission,
    season: &OperatingSeason,
) -> Result<(), DomainError> {
    season.ensure_operating_date(submission.date)?;

    if !(1..=MAX_SEATS).contains(&submission.seats) {
        return Err(DomainError::SeatsOutOfRange {
            requested: submission.seats,
            available: MAX_SEATS,
        });
    }

    validate_contact_fields(submission)
}

/// Validates that a seat cap is usable.
///
/// # Errors
///
/// Returns `DomainError::InvalidSeatCap` if the cap is zero or above
/// [`MAX_SEATS`].
pub const fn validate_seat_cap(seat_cap: u32) -> Result<(), DomainError> {
    if seat_cap == 0 || seat_cap > MAX_SEATS {
        return Err(DomainError::InvalidSeatCap(seat_cap));
    }
    Ok(())
}

/// Checks the customer contact fields shared by public and manual bookings.
fn validate_contact_fields(submission: &BookingSubmission) -> Result<(), DomainError> {
    if submission.name.trim().is_empty() {
        return Err(DomainError::MissingRequiredField("name"));
    }

    if submission.phone.trim().is_empty() {
        return Err(DomainError::MissingRequiredField("phone"));
    }

    // Email is optional, but when present it needs a local part and a domain
    if let Some(email) = submission.email.as_deref().map(str::trim)
        && !email.is_empty()
    {
        let well_formed: bool = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
        if !well_formed {
            return Err(DomainError::InvalidEmail(email.to_string()));
        }
    }

    Ok(())
}
