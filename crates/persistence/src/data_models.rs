// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and conversions between stored text columns and domain values.
//!
//! Dates are stored as `YYYY-MM-DD` and timestamps as UTC RFC 3339 with
//! second precision (`YYYY-MM-DDTHH:MM:SSZ`), so both sort correctly as text.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use prenota_domain::{Booking, BookingCode, DaySetting};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::diesel_schema::{bookings, day_settings};
use crate::error::PersistenceError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// Diesel Queryable struct for booking rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = bookings)]
pub struct BookingRow {
    pub booking_id: i64,
    pub date: String,
    pub seats: i32,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub code: String,
    pub created_at: String,
}

/// Diesel Insertable struct for new booking rows.
#[derive(Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow<'a> {
    pub date: String,
    pub seats: i32,
    pub name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub code: &'a str,
    pub created_at: String,
}

/// Diesel Queryable struct for day setting rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = day_settings)]
pub struct DaySettingRow {
    pub date: String,
    pub max_seats: i32,
    pub is_sold_out: i32,
    pub updated_at: String,
}

/// Formats a calendar date for storage.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted (years outside 0..=9999).
pub fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(DATE_FORMAT)
        .map_err(|e| PersistenceError::QueryFailed(format!("Cannot format date {date}: {e}")))
}

/// Drops the sub-second part of `timestamp`, which the store does not keep.
#[must_use]
pub fn to_stored_precision(timestamp: OffsetDateTime) -> OffsetDateTime {
    timestamp - Duration::nanoseconds(i64::from(timestamp.nanosecond()))
}

/// Formats a timestamp for storage, normalized to UTC.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, PersistenceError> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .map_err(|e| PersistenceError::QueryFailed(format!("Cannot format timestamp: {e}")))
}

fn parse_stored_date(table: &'static str, value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, DATE_FORMAT).map_err(|e| PersistenceError::CorruptRow {
        table,
        reason: format!("invalid date '{value}': {e}"),
    })
}

fn parse_stored_timestamp(
    table: &'static str,
    value: &str,
) -> Result<OffsetDateTime, PersistenceError> {
    PrimitiveDateTime::parse(value, TIMESTAMP_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| PersistenceError::CorruptRow {
            table,
            reason: format!("invalid timestamp '{value}': {e}"),
        })
}

/// Converts a seat count for storage.
///
/// # Errors
///
/// Returns an error if the count does not fit the column type.
pub fn seats_to_column(seats: u32) -> Result<i32, PersistenceError> {
    seats
        .to_i32()
        .ok_or_else(|| PersistenceError::QueryFailed(format!("Seat count {seats} is too large")))
}

fn seats_from_column(table: &'static str, seats: i32) -> Result<u32, PersistenceError> {
    seats.to_u32().ok_or_else(|| PersistenceError::CorruptRow {
        table,
        reason: format!("negative seat count {seats}"),
    })
}

impl<'a> NewBookingRow<'a> {
    /// Builds an insertable row from a domain booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the date, timestamp, or seat count cannot be stored.
    pub fn from_booking(booking: &'a Booking) -> Result<Self, PersistenceError> {
        Ok(Self {
            date: format_date(booking.date)?,
            seats: seats_to_column(booking.seats)?,
            name: &booking.name,
            phone: &booking.phone,
            email: booking.email.as_deref(),
            notes: booking.notes.as_deref(),
            code: booking.code.as_str(),
            created_at: format_timestamp(booking.created_at)?,
        })
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = PersistenceError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let code: BookingCode =
            BookingCode::parse(&row.code).map_err(|e| PersistenceError::CorruptRow {
                table: "bookings",
                reason: e.to_string(),
            })?;

        Ok(Self {
            booking_id: Some(row.booking_id),
            date: parse_stored_date("bookings", &row.date)?,
            seats: seats_from_column("bookings", row.seats)?,
            name: row.name,
            phone: row.phone,
            email: row.email,
            notes: row.notes,
            code,
            created_at: parse_stored_timestamp("bookings", &row.created_at)?,
        })
    }
}

impl TryFrom<DaySettingRow> for DaySetting {
    type Error = PersistenceError;

    fn try_from(row: DaySettingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_stored_date("day_settings", &row.date)?,
            seat_cap: seats_from_column("day_settings", row.max_seats)?,
            is_sold_out: row.is_sold_out != 0,
            updated_at: Some(parse_stored_timestamp("day_settings", &row.updated_at)?),
        })
    }
}

/// Converts a batch of rows, failing on the first corrupt one.
///
/// # Errors
///
/// Returns the conversion error of the first row that cannot be converted.
pub fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, PersistenceError>
where
    T: TryFrom<R, Error = PersistenceError>,
{
    rows.into_iter().map(T::try_from).collect()
}
