// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use prenota_domain::{Booking, BookingCode};
use time::Date;
use tracing::{debug, info};

use crate::backend::get_last_insert_rowid;
use crate::data_models::{NewBookingRow, format_date, to_stored_precision};
use crate::diesel_schema::bookings;
use crate::error::PersistenceError;

/// Inserts a booking.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `booking` - The booking to insert; its `booking_id` is ignored
///
/// # Returns
///
/// The booking as stored: its store-assigned `booking_id` and `created_at`
/// cut to whole seconds.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateCode` if another booking already uses
/// the same code, or a database error if the insert fails.
pub fn insert_booking(
    conn: &mut SqliteConnection,
    booking: &Booking,
) -> Result<Booking, PersistenceError> {
    let row: NewBookingRow<'_> = NewBookingRow::from_booking(booking)?;

    diesel::insert_into(bookings::table)
        .values(&row)
        .execute(conn)
        .map_err(|e| PersistenceError::from_booking_insert(e, booking.code.as_str()))?;

    let booking_id: i64 = get_last_insert_rowid(conn)?;

    info!(
        booking_id,
        date = %booking.date,
        seats = booking.seats,
        code = booking.code.as_str(),
        "Booking inserted"
    );

    Ok(Booking {
        booking_id: Some(booking_id),
        created_at: to_stored_precision(booking.created_at),
        ..booking.clone()
    })
}

/// Deletes the booking carrying `code`.
///
/// # Returns
///
/// `true` if a booking was removed, `false` if none carried the code.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_booking_by_code(
    conn: &mut SqliteConnection,
    code: &BookingCode,
) -> Result<bool, PersistenceError> {
    let removed: usize =
        diesel::delete(bookings::table.filter(bookings::code.eq(code.as_str()))).execute(conn)?;

    debug!(code = code.as_str(), removed, "Deleted booking by code");
    Ok(removed > 0)
}

/// Deletes every booking on `date`.
///
/// # Returns
///
/// The number of bookings removed.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_bookings_for_date(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<usize, PersistenceError> {
    let date_text: String = format_date(date)?;
    let removed: usize =
        diesel::delete(bookings::table.filter(bookings::date.eq(&date_text))).execute(conn)?;

    debug!(date = %date, removed, "Deleted bookings for date");
    Ok(removed)
}
