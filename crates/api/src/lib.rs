// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Prenota reservation service.
//!
//! This crate turns requests into domain operations against the store and
//! shapes the results for clients. It owns admin authentication, the clock
//! abstraction, error translation, and the CSV and manifest exports. It
//! knows nothing about HTTP; the server crate maps these handlers to routes.

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

mod auth;
mod clock;
mod error;
mod export;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AdminAuthenticator, AuthenticatedAdmin, AuthenticationService, ConfiguredCredentials,
    CredentialsError, DEFAULT_SESSION_TTL, MIN_ADMIN_PASSWORD_LENGTH, SessionRegistry,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{
    ApiError, AuthError, RULE_CANCELLATION_WINDOW, RULE_SOLD_OUT, translate_domain_error,
    translate_persistence_error,
};
pub use export::{
    CSV_CONTENT_TYPE, CSV_FILE_NAME, CSV_HEADER, EMPTY_MANIFEST_LINE, MANIFEST_CONTENT_TYPE,
    bookings_to_csv, day_manifest, italian_long_date,
};
pub use handlers::{
    MAX_CODE_ATTEMPTS, add_manual_booking, apply_day_setting_changes, cancel_booking,
    delete_booking, export_bookings_csv, export_day_manifest, get_availability, get_calendar,
    get_overview, get_season, list_bookings, login, logout, reset_day, search_bookings,
    set_seat_cap, set_sold_out, submit_booking,
};
pub use request_response::{
    ApplyDaySettingChangesRequest, BatchFailure, BatchOutcome, BookingInfo, CalendarResponse,
    CancelBookingRequest, CancelBookingResponse, DayAvailabilityInfo, DaySettingChangeRequest,
    DaySettingResponse, DeleteBookingResponse, ExportFile, ListBookingsResponse, LoginRequest,
    LoginResponse, OverviewDay, OverviewResponse, ResetDayRequest, ResetDayResponse,
    SearchBookingsResponse, SeasonResponse, SetSeatCapRequest, SetSoldOutRequest,
    SubmitBookingRequest, SubmitBookingResponse,
};
