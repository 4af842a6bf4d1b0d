// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup.
//!
//! Opening a connection sets the pragmas the reservation store relies on
//! and brings the schema up to date. Booking and day-setting SQL lives in
//! `queries/` and `mutations/`.

use diesel::dsl::sql;
use diesel::sql_types::BigInt;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Embedded schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a writer waits for a competing transaction before giving up.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Returns the rowid assigned by the most recent insert on `conn`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Runs one `PRAGMA` statement. Diesel has no DSL for pragmas.
fn set_pragma(conn: &mut SqliteConnection, pragma: &str) -> Result<(), PersistenceError> {
    diesel::sql_query(format!("PRAGMA {pragma}"))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("PRAGMA {pragma}: {e}")))?;
    debug!(pragma, "Applied SQLite pragma");
    Ok(())
}

/// Opens a connection, sets the busy timeout, and applies pending migrations.
///
/// # Arguments
///
/// * `database_url` - A file path or an `SQLite` URI such as a shared in-memory database
///
/// # Errors
///
/// Returns an error if the connection, the pragma, or a migration fails.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, "Opening reservation store");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;
    set_pragma(&mut conn, &format!("busy_timeout = {BUSY_TIMEOUT_MS}"))?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    info!(applied = applied.len(), "Reservation schema is up to date");

    Ok(conn)
}

/// Switches a file database to write-ahead logging so readers do not block
/// the writer.
///
/// # Errors
///
/// Returns an error if the pragma fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    set_pragma(conn, "journal_mode = WAL")
}
