// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod availability;
mod booking_code;
mod cancellation;
mod error;
mod pending_changes;
mod search;
mod season;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use availability::{compute_availability, compute_season_availability};
pub use booking_code::{BookingCode, CODE_ALPHABET, CODE_LENGTH};
pub use cancellation::{CANCELLATION_LEAD_DAYS, can_cancel, check_cancellation, days_until};
pub use pending_changes::{DaySettingChange, PendingChanges};
pub use search::{booking_matches, search_bookings};
pub use season::{OperatingSeason, is_past};

// Re-export public types
pub use error::DomainError;
pub use types::{Booking, BookingSubmission, DayAvailability, DaySetting, parse_date};
pub use validation::{MAX_SEATS, validate_manual_booking, validate_seat_cap, validate_submission};
