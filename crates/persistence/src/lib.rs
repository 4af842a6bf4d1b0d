// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Prenota reservation service.
//!
//! This crate stores bookings and per-day settings in `SQLite` through
//! Diesel. Migrations are embedded in the binary and applied when a
//! connection is opened.
//!
//! ## Tables
//!
//! - `bookings` — one row per live booking, unique `code`, indexed by `date`
//! - `day_settings` — optional per-date seat cap and sold-out flag
//!
//! ## Atomic reservation
//!
//! Public bookings go through [`Persistence::reserve_booking`], which re-reads
//! the day's bookings and setting inside an immediate (write-locking)
//! transaction, runs the caller's capacity check against that fresh state,
//! and inserts only if the check passes. Two requests racing for the last
//! seat cannot both succeed.
//!
//! ## Testing
//!
//! Each call to [`Persistence::new_in_memory`] opens an isolated shared
//! in-memory database, so tests never observe each other's rows.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use prenota_domain::{Booking, BookingCode, DaySetting, DaySettingChange, DomainError};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};
use tracing::info;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// The result of an atomic reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The booking passed the check and was stored.
    Reserved(Booking),
    /// The check rejected the booking against the current stored state.
    Rejected(DomainError),
}

/// Persistence adapter for bookings and day settings.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_prenota_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;

        // Enable WAL mode for better read concurrency
        backend::enable_wal_mode(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Atomically checks capacity and stores a booking.
    ///
    /// Opens an immediate transaction, loads the booking date's current
    /// bookings and setting, and passes them to `check`. The booking is
    /// inserted only if `check` returns `Ok`. A rejection is not an error:
    /// it is returned as [`ReserveOutcome::Rejected`] and nothing is written.
    ///
    /// # Arguments
    ///
    /// * `booking` - The booking to store
    /// * `check` - The capacity rule, evaluated against the locked state
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateCode` if the code is taken, or a
    /// database error if any step fails.
    pub fn reserve_booking<F>(
        &mut self,
        booking: &Booking,
        check: F,
    ) -> Result<ReserveOutcome, PersistenceError>
    where
        F: FnOnce(&[Booking], Option<&DaySetting>) -> Result<(), DomainError>,
    {
        self.conn.immediate_transaction(|conn| {
            let existing: Vec<Booking> = queries::list_bookings_for_date(conn, booking.date)?;
            let setting: Option<DaySetting> = queries::get_day_setting(conn, booking.date)?;

            if let Err(rejection) = check(&existing, setting.as_ref()) {
                info!(date = %booking.date, reason = %rejection, "Reservation rejected");
                return Ok(ReserveOutcome::Rejected(rejection));
            }

            let stored: Booking = mutations::insert_booking(conn, booking)?;
            Ok(ReserveOutcome::Reserved(stored))
        })
    }

    /// Stores a booking without any capacity check.
    ///
    /// Used for staff-entered bookings.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateCode` if the code is taken, or a
    /// database error if the insert fails.
    pub fn insert_booking(&mut self, booking: &Booking) -> Result<Booking, PersistenceError> {
        mutations::insert_booking(&mut self.conn, booking)
    }

    /// Retrieves a booking by its code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_booking_by_code(
        &mut self,
        code: &BookingCode,
    ) -> Result<Option<Booking>, PersistenceError> {
        queries::get_booking_by_code(&mut self.conn, code)
    }

    /// Deletes a booking by its code.
    ///
    /// # Returns
    ///
    /// `true` if a booking was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_booking_by_code(&mut self, code: &BookingCode) -> Result<bool, PersistenceError> {
        mutations::delete_booking_by_code(&mut self.conn, code)
    }

    /// Lists every booking, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_bookings(&mut self) -> Result<Vec<Booking>, PersistenceError> {
        queries::list_bookings(&mut self.conn)
    }

    /// Lists the bookings on one date, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_bookings_for_date(&mut self, date: Date) -> Result<Vec<Booking>, PersistenceError> {
        queries::list_bookings_for_date(&mut self.conn, date)
    }

    /// Lists the bookings with dates in `[start, end]` in one query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_bookings_between(
        &mut self,
        start: Date,
        end: Date,
    ) -> Result<Vec<Booking>, PersistenceError> {
        queries::list_bookings_between(&mut self.conn, start, end)
    }

    // ========================================================================
    // Day settings
    // ========================================================================

    /// Retrieves the explicit setting for a date, if one was ever stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_day_setting(&mut self, date: Date) -> Result<Option<DaySetting>, PersistenceError> {
        queries::get_day_setting(&mut self.conn, date)
    }

    /// Lists every explicit day setting, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_day_settings(&mut self) -> Result<Vec<DaySetting>, PersistenceError> {
        queries::list_day_settings(&mut self.conn)
    }

    /// Applies a partial change to a date's setting.
    ///
    /// Fields absent from `change` keep their stored value, or the default
    /// (`default_seat_cap`, not sold out) when the date was never configured.
    ///
    /// # Arguments
    ///
    /// * `date` - The date to update
    /// * `change` - The fields to change
    /// * `default_seat_cap` - The cap for dates without a stored setting
    /// * `updated_at` - The timestamp recorded on the row
    ///
    /// # Returns
    ///
    /// The setting as stored after the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the database read or write fails.
    pub fn apply_day_setting_change(
        &mut self,
        date: Date,
        change: DaySettingChange,
        default_seat_cap: u32,
        updated_at: OffsetDateTime,
    ) -> Result<DaySetting, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let current: DaySetting = queries::get_day_setting(conn, date)?
                .unwrap_or_else(|| DaySetting::default_for(date, default_seat_cap));

            let updated: DaySetting = DaySetting {
                date,
                seat_cap: change.seat_cap.unwrap_or(current.seat_cap),
                is_sold_out: change.is_sold_out.unwrap_or(current.is_sold_out),
                updated_at: Some(data_models::to_stored_precision(updated_at)),
            };

            mutations::upsert_day_setting(conn, &updated, updated_at)?;
            info!(
                date = %date,
                seat_cap = updated.seat_cap,
                is_sold_out = updated.is_sold_out,
                "Day setting changed"
            );
            Ok(updated)
        })
    }

    /// Resets a date: deletes all its bookings and clears its sold-out flag.
    ///
    /// The seat cap is left unchanged. Both steps run in one transaction.
    ///
    /// # Returns
    ///
    /// The number of bookings removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete or update fails; in that case
    /// nothing is changed.
    pub fn reset_day(
        &mut self,
        date: Date,
        updated_at: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let removed: usize = mutations::delete_bookings_for_date(conn, date)?;
            mutations::clear_sold_out(conn, date, updated_at)?;
            info!(date = %date, removed, "Day reset");
            Ok(removed)
        })
    }
}
