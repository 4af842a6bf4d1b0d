// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use prenota_domain::DaySetting;
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::data_models::{format_date, format_timestamp, seats_to_column};
use crate::diesel_schema::day_settings;
use crate::error::PersistenceError;

/// Writes the full setting for a date, inserting or replacing the row.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `setting` - The setting to store
/// * `updated_at` - The timestamp recorded on the row
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn upsert_day_setting(
    conn: &mut SqliteConnection,
    setting: &DaySetting,
    updated_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let date_text: String = format_date(setting.date)?;
    let max_seats: i32 = seats_to_column(setting.seat_cap)?;
    let is_sold_out: i32 = i32::from(setting.is_sold_out);
    let updated_text: String = format_timestamp(updated_at)?;

    diesel::insert_into(day_settings::table)
        .values((
            day_settings::date.eq(&date_text),
            day_settings::max_seats.eq(max_seats),
            day_settings::is_sold_out.eq(is_sold_out),
            day_settings::updated_at.eq(&updated_text),
        ))
        .on_conflict(day_settings::date)
        .do_update()
        .set((
            day_settings::max_seats.eq(max_seats),
            day_settings::is_sold_out.eq(is_sold_out),
            day_settings::updated_at.eq(&updated_text),
        ))
        .execute(conn)?;

    debug!(
        date = %setting.date,
        seat_cap = setting.seat_cap,
        is_sold_out = setting.is_sold_out,
        "Upserted day setting"
    );
    Ok(())
}

/// Clears the sold-out flag on a date, leaving the seat cap untouched.
///
/// A date without a stored setting is already open, so nothing is written.
///
/// # Returns
///
/// The number of rows updated (0 or 1).
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn clear_sold_out(
    conn: &mut SqliteConnection,
    date: Date,
    updated_at: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let date_text: String = format_date(date)?;
    let updated_text: String = format_timestamp(updated_at)?;

    let updated: usize = diesel::update(day_settings::table.find(&date_text))
        .set((
            day_settings::is_sold_out.eq(0),
            day_settings::updated_at.eq(&updated_text),
        ))
        .execute(conn)?;

    Ok(updated)
}
