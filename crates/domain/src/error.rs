// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::MAX_SEATS;
use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The selected date cannot be booked.
    InvalidDate {
        /// The rejected date.
        date: Date,
        /// Why the date was rejected.
        reason: String,
    },
    /// The day is sold out, either by flag or because no seats remain.
    SoldOut {
        /// The sold-out date.
        date: Date,
    },
    /// The requested seat count is outside `1..=available`.
    SeatsOutOfRange {
        /// The number of seats requested.
        requested: u32,
        /// The number of seats still available.
        available: u32,
    },
    /// A required text field is blank.
    MissingRequiredField(&'static str),
    /// The email address is present but malformed.
    InvalidEmail(String),
    /// The booking code is not 5 characters from `A-Z0-9`.
    InvalidBookingCode(String),
    /// No live booking carries this code.
    BookingNotFound(String),
    /// The booking is too close to (or past) its date to be cancelled.
    CancellationWindowClosed {
        /// The booking date.
        date: Date,
        /// Whole days between today and the booking date.
        days_remaining: i64,
    },
    /// A seat cap of zero was supplied.
    InvalidSeatCap(u32),
    /// The operating season configuration is inconsistent.
    InvalidSeason {
        /// Description of the problem.
        reason: String,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A destructive day reset was requested without confirmation.
    ResetNotConfirmed {
        /// The date that would have been reset.
        date: Date,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate { date, reason } => {
                write!(f, "Date {date} cannot be booked: {reason}")
            }
            Self::SoldOut { date } => write!(f, "Date {date} is sold out"),
            Self::SeatsOutOfRange {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Cannot book {requested} seats: between 1 and {available} seats may be booked"
                )
            }
            Self::MissingRequiredField(field) => {
                write!(f, "Required field '{field}' is missing")
            }
            Self::InvalidEmail(email) => write!(f, "Invalid email address: '{email}'"),
            Self::InvalidBookingCode(code) => {
                write!(
                    f,
                    "Invalid booking code '{code}': expected 5 characters from A-Z and 0-9"
                )
            }
            Self::BookingNotFound(code) => write!(f, "No booking found with code '{code}'"),
            Self::CancellationWindowClosed {
                date,
                days_remaining,
            } => {
                write!(
                    f,
                    "Booking for {date} can no longer be cancelled ({days_remaining} days remaining, at least 2 required)"
                )
            }
            Self::InvalidSeatCap(cap) => {
                write!(f, "Invalid seat cap: {cap}. Must be between 1 and {MAX_SEATS}")
            }
            Self::InvalidSeason { reason } => write!(f, "Invalid operating season: {reason}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::ResetNotConfirmed { date } => {
                write!(f, "Reset of {date} requires explicit confirmation")
            }
        }
    }
}

impl std::error::Error for DomainError {}
