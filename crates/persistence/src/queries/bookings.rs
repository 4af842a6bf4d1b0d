// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use prenota_domain::{Booking, BookingCode};
use time::Date;
use tracing::debug;

use crate::data_models::{BookingRow, convert_rows, format_date};
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;

/// Retrieves a booking by its code.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no booking carries the code.
pub fn get_booking_by_code(
    conn: &mut SqliteConnection,
    code: &BookingCode,
) -> Result<Option<Booking>, PersistenceError> {
    debug!(code = code.as_str(), "Looking up booking by code");

    let row: Option<BookingRow> = bookings::table
        .filter(bookings::code.eq(code.as_str()))
        .select(BookingRow::as_select())
        .first(conn)
        .optional()?;

    row.map(Booking::try_from).transpose()
}

/// Lists every booking, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_bookings(conn: &mut SqliteConnection) -> Result<Vec<Booking>, PersistenceError> {
    let rows: Vec<BookingRow> = bookings::table
        .order((bookings::created_at.desc(), bookings::booking_id.desc()))
        .select(BookingRow::as_select())
        .load(conn)?;

    debug!(count = rows.len(), "Listed all bookings");
    convert_rows(rows)
}

/// Lists the bookings on one date in the order they were made.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_bookings_for_date(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<Vec<Booking>, PersistenceError> {
    let date_text: String = format_date(date)?;

    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::date.eq(&date_text))
        .order((bookings::created_at.asc(), bookings::booking_id.asc()))
        .select(BookingRow::as_select())
        .load(conn)?;

    debug!(date = %date, count = rows.len(), "Listed bookings for date");
    convert_rows(rows)
}

/// Lists the bookings with dates in `[start, end]`, ordered by date.
///
/// This is the single batched read behind season-wide availability.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_bookings_between(
    conn: &mut SqliteConnection,
    start: Date,
    end: Date,
) -> Result<Vec<Booking>, PersistenceError> {
    let start_text: String = format_date(start)?;
    let end_text: String = format_date(end)?;

    let rows: Vec<BookingRow> = bookings::table
        .filter(bookings::date.between(&start_text, &end_text))
        .order((bookings::date.asc(), bookings::created_at.asc()))
        .select(BookingRow::as_select())
        .load(conn)?;

    debug!(%start, %end, count = rows.len(), "Listed bookings in range");
    convert_rows(rows)
}
