// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use prenota_domain::DaySetting;
use time::Date;
use tracing::debug;

use crate::data_models::{DaySettingRow, convert_rows, format_date};
use crate::diesel_schema::day_settings;
use crate::error::PersistenceError;

/// Retrieves the explicit setting for a date.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the date was never configured.
pub fn get_day_setting(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<Option<DaySetting>, PersistenceError> {
    let date_text: String = format_date(date)?;

    let row: Option<DaySettingRow> = day_settings::table
        .find(&date_text)
        .select(DaySettingRow::as_select())
        .first(conn)
        .optional()?;

    debug!(date = %date, found = row.is_some(), "Looked up day setting");
    row.map(DaySetting::try_from).transpose()
}

/// Lists every explicit day setting, ordered by date.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_day_settings(conn: &mut SqliteConnection) -> Result<Vec<DaySetting>, PersistenceError> {
    let rows: Vec<DaySettingRow> = day_settings::table
        .order(day_settings::date.asc())
        .select(DaySettingRow::as_select())
        .load(conn)?;

    convert_rows(rows)
}
