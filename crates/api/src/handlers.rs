// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for the public booking flow and the admin console.
//!
//! Handlers are synchronous. They take the store, the operating season, and
//! the clock explicitly so the server can share them and tests can pin time.
//! Admin handlers additionally take the [`AuthenticatedAdmin`] resolved from
//! the request's session.

use prenota_domain::{
    Booking, BookingCode, BookingSubmission, DayAvailability, DaySetting, DaySettingChange,
    DomainError, OperatingSeason, PendingChanges, check_cancellation, compute_availability,
    compute_season_availability, is_past, parse_date, search_bookings as search_booking_list,
    validate_manual_booking, validate_seat_cap, validate_submission,
};
use prenota_persistence::{Persistence, PersistenceError, ReserveOutcome};
use std::collections::{BTreeMap, HashMap};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::auth::{AdminAuthenticator, AuthenticatedAdmin, AuthenticationService, SessionRegistry};
use crate::clock::Clock;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::export;
use crate::request_response::{
    ApplyDaySettingChangesRequest, BatchFailure, BatchOutcome, BookingInfo, CalendarResponse,
    CancelBookingRequest, CancelBookingResponse, DayAvailabilityInfo, DaySettingChangeRequest,
    DaySettingResponse, DeleteBookingResponse, ExportFile, ListBookingsResponse, LoginRequest,
    LoginResponse, OverviewDay, OverviewResponse, ResetDayRequest, ResetDayResponse,
    SearchBookingsResponse, SeasonResponse, SetSeatCapRequest, SetSoldOutRequest,
    SubmitBookingRequest, SubmitBookingResponse,
};

/// How many fresh codes a booking insert tries before giving up.
pub const MAX_CODE_ATTEMPTS: u32 = 5;

// ============================================================================
// Conversions
// ============================================================================

/// Formats an instant as RFC 3339.
fn format_instant(instant: OffsetDateTime) -> String {
    instant
        .format(&Rfc3339)
        .unwrap_or_else(|_| instant.to_string())
}

fn parse_request_date(date: &str) -> Result<Date, ApiError> {
    parse_date(date).map_err(translate_domain_error)
}

fn parse_request_code(code: &str) -> Result<BookingCode, ApiError> {
    BookingCode::parse(code).map_err(translate_domain_error)
}

fn submission_from_request(request: &SubmitBookingRequest) -> Result<BookingSubmission, ApiError> {
    Ok(BookingSubmission {
        date: parse_request_date(&request.date)?,
        seats: request.seats,
        name: request.name.clone(),
        phone: request.phone.clone(),
        email: request.email.clone(),
        notes: request.notes.clone(),
    })
}

fn booking_info(booking: &Booking) -> BookingInfo {
    BookingInfo {
        booking_id: booking.booking_id,
        date: booking.date.to_string(),
        seats: booking.seats,
        name: booking.name.clone(),
        phone: booking.phone.clone(),
        email: booking.email.clone(),
        notes: booking.notes.clone(),
        code: booking.code.to_string(),
        created_at: format_instant(booking.created_at),
    }
}

fn availability_info(availability: &DayAvailability, today: Date) -> DayAvailabilityInfo {
    let past: bool = is_past(availability.date, today);
    DayAvailabilityInfo {
        date: availability.date.to_string(),
        total_seats: availability.total_seats,
        booked_seats: availability.booked_seats,
        available_seats: availability.available_seats,
        is_sold_out: availability.is_sold_out,
        is_past: past,
        is_bookable: !past && !availability.is_sold_out,
    }
}

fn setting_response(setting: &DaySetting) -> DaySettingResponse {
    DaySettingResponse {
        date: setting.date.to_string(),
        seat_cap: setting.seat_cap,
        is_sold_out: setting.is_sold_out,
        updated_at: setting.updated_at.map(format_instant),
    }
}

/// Reads the whole season's availability with one bookings query.
fn load_season_availability(
    persistence: &mut Persistence,
    season: &OperatingSeason,
) -> Result<(BTreeMap<Date, DayAvailability>, Vec<Booking>), ApiError> {
    let dates: Vec<Date> = season.operating_dates();
    let bookings: Vec<Booking> = persistence
        .list_bookings_between(season.start(), season.end())
        .map_err(translate_persistence_error)?;
    let settings: Vec<DaySetting> = persistence
        .list_day_settings()
        .map_err(translate_persistence_error)?;

    let availability: BTreeMap<Date, DayAvailability> = compute_season_availability(
        &dates,
        &bookings,
        &settings,
        season.default_seat_cap(),
    );
    Ok((availability, bookings))
}

fn code_attempts_exhausted() -> ApiError {
    ApiError::Internal {
        message: format!(
            "Could not generate a unique booking code after {MAX_CODE_ATTEMPTS} attempts"
        ),
    }
}

// ============================================================================
// Public handlers
// ============================================================================

/// Describes the operating season.
#[must_use]
pub fn get_season(season: &OperatingSeason) -> SeasonResponse {
    SeasonResponse {
        start: season.start().to_string(),
        end: season.end().to_string(),
        closed_weekday: season.closed_weekday().to_string(),
        default_seat_cap: season.default_seat_cap(),
        operating_dates: season
            .operating_dates()
            .iter()
            .map(Date::to_string)
            .collect(),
    }
}

/// Returns every operating date with its availability.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn get_calendar(
    persistence: &mut Persistence,
    season: &OperatingSeason,
    clock: &dyn Clock,
) -> Result<CalendarResponse, ApiError> {
    let today: Date = clock.today();
    let (availability, _bookings) = load_season_availability(persistence, season)?;

    Ok(CalendarResponse {
        today: today.to_string(),
        days: availability
            .values()
            .map(|day| availability_info(day, today))
            .collect(),
    })
}

/// Returns one operating date's availability.
///
/// # Errors
///
/// Returns an error if:
/// - The date cannot be parsed
/// - The date is not an operating date
/// - The store cannot be read
pub fn get_availability(
    persistence: &mut Persistence,
    season: &OperatingSeason,
    clock: &dyn Clock,
    date: &str,
) -> Result<DayAvailabilityInfo, ApiError> {
    let date: Date = parse_request_date(date)?;
    season
        .ensure_operating_date(date)
        .map_err(translate_domain_error)?;

    let bookings: Vec<Booking> = persistence
        .list_bookings_for_date(date)
        .map_err(translate_persistence_error)?;
    let setting: Option<DaySetting> = persistence
        .get_day_setting(date)
        .map_err(translate_persistence_error)?;

    let availability: DayAvailability = compute_availability(
        date,
        &bookings,
        setting.as_ref(),
        season.default_seat_cap(),
    );
    Ok(availability_info(&availability, clock.today()))
}

/// Submits a customer booking.
///
/// The capacity check runs again inside the store's write transaction, so
/// two requests competing for the last seats cannot both succeed.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `season` - The operating season
/// * `clock` - The source of today's date
/// * `request` - The booking request
///
/// # Returns
///
/// * `Ok(SubmitBookingResponse)` with the confirmation code
/// * `Err(ApiError)` if the booking is rejected
///
/// # Errors
///
/// Returns an error if:
/// - The date cannot be parsed or is not an operating date
/// - The date is in the past or sold out
/// - The seat count is outside `1..=available`
/// - Name or phone is missing, or the email is malformed
/// - The store fails
pub fn submit_booking(
    persistence: &mut Persistence,
    season: &OperatingSeason,
    clock: &dyn Clock,
    request: &SubmitBookingRequest,
) -> Result<SubmitBookingResponse, ApiError> {
    let submission: BookingSubmission = submission_from_request(request)?;
    season
        .ensure_operating_date(submission.date)
        .map_err(translate_domain_error)?;

    let today: Date = clock.today();
    let default_seat_cap: u32 = season.default_seat_cap();

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let booking: Booking =
            Booking::from_submission(&submission, BookingCode::generate(), clock.now());

        let outcome = persistence.reserve_booking(&booking, |existing, setting| {
            let availability: DayAvailability =
                compute_availability(submission.date, existing, setting, default_seat_cap);
            validate_submission(&submission, &availability, today)
        });

        match outcome {
            Ok(ReserveOutcome::Reserved(stored)) => {
                info!(
                    code = %stored.code,
                    date = %stored.date,
                    seats = stored.seats,
                    "Booking created"
                );
                return Ok(SubmitBookingResponse {
                    code: stored.code.to_string(),
                    date: stored.date.to_string(),
                    seats: stored.seats,
                    message: format!(
                        "Booking confirmed for {} ({} seats). Your code is {}",
                        stored.date, stored.seats, stored.code
                    ),
                });
            }
            Ok(ReserveOutcome::Rejected(rejection)) => {
                return Err(translate_domain_error(rejection));
            }
            Err(PersistenceError::DuplicateCode(code)) => {
                warn!(attempt, code, "Booking code collision, regenerating");
            }
            Err(e) => return Err(translate_persistence_error(e)),
        }
    }

    Err(code_attempts_exhausted())
}

/// Cancels a booking by its code.
///
/// # Errors
///
/// Returns an error if:
/// - The code is malformed
/// - No booking has the code
/// - Fewer than two days remain before the booking date
/// - The store fails
pub fn cancel_booking(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    request: &CancelBookingRequest,
) -> Result<CancelBookingResponse, ApiError> {
    let code: BookingCode = parse_request_code(&request.code)?;

    let booking: Booking = persistence
        .get_booking_by_code(&code)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::BookingNotFound(code.to_string())))?;

    check_cancellation(booking.date, clock.today()).map_err(translate_domain_error)?;

    let removed: bool = persistence
        .delete_booking_by_code(&code)
        .map_err(translate_persistence_error)?;
    if !removed {
        return Err(translate_domain_error(DomainError::BookingNotFound(
            code.to_string(),
        )));
    }

    info!(code = %code, date = %booking.date, "Booking cancelled by customer");

    Ok(CancelBookingResponse {
        code: code.to_string(),
        date: booking.date.to_string(),
        seats: booking.seats,
        message: format!("Booking {code} for {} has been cancelled", booking.date),
    })
}

// ============================================================================
// Session handlers
// ============================================================================

/// Logs an admin in.
///
/// # Errors
///
/// Returns an error if the credentials are rejected.
pub fn login(
    authenticator: &dyn AdminAuthenticator,
    sessions: &SessionRegistry,
    clock: &dyn Clock,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, admin): (String, AuthenticatedAdmin) = AuthenticationService::login(
        authenticator,
        sessions,
        &request.username,
        &request.password,
        clock.now(),
    )?;

    Ok(LoginResponse {
        session_token,
        username: admin.username,
        expires_at: format_instant(admin.expires_at),
    })
}

/// Logs out by removing the session.
///
/// # Errors
///
/// Returns an error if the token does not belong to a session.
pub fn logout(sessions: &SessionRegistry, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(sessions, session_token)?;
    Ok(())
}

// ============================================================================
// Admin handlers
// ============================================================================

/// Returns occupancy for every operating date with season totals.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn get_overview(
    persistence: &mut Persistence,
    season: &OperatingSeason,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
) -> Result<OverviewResponse, ApiError> {
    let today: Date = clock.today();
    let (availability, bookings) = load_season_availability(persistence, season)?;

    let mut counts: HashMap<Date, usize> = HashMap::new();
    for booking in &bookings {
        *counts.entry(booking.date).or_default() += 1;
    }

    let days: Vec<OverviewDay> = availability
        .values()
        .map(|day| OverviewDay {
            availability: availability_info(day, today),
            booking_count: counts.get(&day.date).copied().unwrap_or_default(),
            occupancy_percent: day.occupancy_percent(),
        })
        .collect();

    let total_bookings: usize = days.iter().map(|d| d.booking_count).sum();
    let total_booked_seats: u64 = availability
        .values()
        .map(|d| u64::from(d.booked_seats))
        .sum();

    debug!(admin = %admin.username, total_bookings, "Overview requested");

    Ok(OverviewResponse {
        days,
        total_bookings,
        total_booked_seats,
    })
}

/// Lists bookings, all of them newest first or one day's oldest first.
///
/// # Errors
///
/// Returns an error if the date cannot be parsed or the store fails.
pub fn list_bookings(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    date: Option<&str>,
) -> Result<ListBookingsResponse, ApiError> {
    let date: Option<Date> = date.map(parse_request_date).transpose()?;

    let bookings: Vec<Booking> = match date {
        Some(date) => persistence.list_bookings_for_date(date),
        None => persistence.list_bookings(),
    }
    .map_err(translate_persistence_error)?;

    let total_seats: u64 = bookings.iter().map(|b| u64::from(b.seats)).sum();
    debug!(admin = %admin.username, count = bookings.len(), "Bookings listed");

    Ok(ListBookingsResponse {
        date: date.map(|d| d.to_string()),
        total_bookings: bookings.len(),
        total_seats,
        bookings: bookings.iter().map(booking_info).collect(),
    })
}

/// Finds bookings whose code, name, or email contains `query`.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn search_bookings(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    query: &str,
) -> Result<SearchBookingsResponse, ApiError> {
    let bookings: Vec<Booking> = persistence
        .list_bookings()
        .map_err(translate_persistence_error)?;
    let matches: Vec<&Booking> = search_booking_list(&bookings, query);

    debug!(admin = %admin.username, query, matches = matches.len(), "Bookings searched");

    Ok(SearchBookingsResponse {
        query: query.to_string(),
        bookings: matches.into_iter().map(booking_info).collect(),
    })
}

/// Adds a booking on behalf of a customer.
///
/// Staff may book past or sold-out dates and beyond the seat cap; only the
/// booking's shape and the operating date are checked.
///
/// # Errors
///
/// Returns an error if:
/// - The date cannot be parsed or is not an operating date
/// - The seat count is zero or above `MAX_SEATS`
/// - Name or phone is missing, or the email is malformed
/// - The store fails
pub fn add_manual_booking(
    persistence: &mut Persistence,
    season: &OperatingSeason,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    request: &SubmitBookingRequest,
) -> Result<SubmitBookingResponse, ApiError> {
    let submission: BookingSubmission = submission_from_request(request)?;
    validate_manual_booking(&submission, season).map_err(translate_domain_error)?;

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let booking: Booking =
            Booking::from_submission(&submission, BookingCode::generate(), clock.now());

        match persistence.insert_booking(&booking) {
            Ok(stored) => {
                info!(
                    admin = %admin.username,
                    code = %stored.code,
                    date = %stored.date,
                    seats = stored.seats,
                    "Manual booking added"
                );
                return Ok(SubmitBookingResponse {
                    code: stored.code.to_string(),
                    date: stored.date.to_string(),
                    seats: stored.seats,
                    message: format!(
                        "Booking added for {} ({} seats) with code {}",
                        stored.date, stored.seats, stored.code
                    ),
                });
            }
            Err(PersistenceError::DuplicateCode(code)) => {
                warn!(attempt, code, "Booking code collision, regenerating");
            }
            Err(e) => return Err(translate_persistence_error(e)),
        }
    }

    Err(code_attempts_exhausted())
}

/// Deletes a booking by code, regardless of the cancellation window.
///
/// # Errors
///
/// Returns an error if the code is malformed, unknown, or the store fails.
pub fn delete_booking(
    persistence: &mut Persistence,
    admin: &AuthenticatedAdmin,
    code: &str,
) -> Result<DeleteBookingResponse, ApiError> {
    let code: BookingCode = parse_request_code(code)?;
    let not_found = || translate_domain_error(DomainError::BookingNotFound(code.to_string()));

    let booking: Booking = persistence
        .get_booking_by_code(&code)
        .map_err(translate_persistence_error)?
        .ok_or_else(not_found)?;

    if !persistence
        .delete_booking_by_code(&code)
        .map_err(translate_persistence_error)?
    {
        return Err(not_found());
    }

    info!(admin = %admin.username, code = %code, date = %booking.date, "Booking deleted");

    Ok(DeleteBookingResponse {
        code: code.to_string(),
        date: booking.date.to_string(),
        message: format!("Booking {code} deleted"),
    })
}

fn apply_single_change(
    persistence: &mut Persistence,
    season: &OperatingSeason,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    date: &str,
    change: DaySettingChange,
) -> Result<DaySettingResponse, ApiError> {
    let date: Date = parse_request_date(date)?;
    season
        .ensure_operating_date(date)
        .map_err(translate_domain_error)?;

    let setting: DaySetting = persistence
        .apply_day_setting_change(date, change, season.default_seat_cap(), clock.now())
        .map_err(translate_persistence_error)?;

    info!(admin = %admin.username, date = %date, "Day setting updated");
    Ok(setting_response(&setting))
}

/// Sets the seat cap for a date.
///
/// Lowering the cap below the booked total is allowed; existing bookings stay.
///
/// # Errors
///
/// Returns an error if:
/// - The date cannot be parsed or is not an operating date
/// - The cap is zero or above `MAX_SEATS`
/// - The store fails
pub fn set_seat_cap(
    persistence: &mut Persistence,
    season: &OperatingSeason,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    date: &str,
    request: SetSeatCapRequest,
) -> Result<DaySettingResponse, ApiError> {
    validate_seat_cap(request.seat_cap).map_err(translate_domain_error)?;
    apply_single_change(
        persistence,
        season,
        clock,
        admin,
        date,
        DaySettingChange {
            seat_cap: Some(request.seat_cap),
            is_sold_out: None,
        },
    )
}

/// Sets or clears the sold-out flag for a date.
///
/// # Errors
///
/// Returns an error if the date is invalid or the store fails.
pub fn set_sold_out(
    persistence: &mut Persistence,
    season: &OperatingSeason,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    date: &str,
    request: SetSoldOutRequest,
) -> Result<DaySettingResponse, ApiError> {
    apply_single_change(
        persistence,
        season,
        clock,
        admin,
        date,
        DaySettingChange {
            seat_cap: None,
            is_sold_out: Some(request.is_sold_out),
        },
    )
}

fn stage_change(
    pending: &mut PendingChanges,
    season: &OperatingSeason,
    entry: &DaySettingChangeRequest,
) -> Result<(), DomainError> {
    let date: Date = parse_date(&entry.date)?;
    season.ensure_operating_date(date)?;
    pending.insert(
        date,
        DaySettingChange {
            seat_cap: entry.seat_cap,
            is_sold_out: entry.is_sold_out,
        },
    )
}

/// Saves a batch of day-setting edits.
///
/// Edits for the same date are merged first. Each date is then stored on
/// its own; a date that fails is reported in the outcome and does not stop
/// the rest.
pub fn apply_day_setting_changes(
    persistence: &mut Persistence,
    season: &OperatingSeason,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    request: &ApplyDaySettingChangesRequest,
) -> BatchOutcome {
    let mut outcome: BatchOutcome = BatchOutcome::default();
    let mut pending: PendingChanges = PendingChanges::new();

    for entry in &request.changes {
        if let Err(e) = stage_change(&mut pending, season, entry) {
            outcome.failed.push(BatchFailure {
                date: entry.date.clone(),
                message: e.to_string(),
            });
        }
    }

    let now: OffsetDateTime = clock.now();
    for (date, change) in pending.iter() {
        match persistence.apply_day_setting_change(date, change, season.default_seat_cap(), now) {
            Ok(setting) => outcome.applied.push(setting_response(&setting)),
            Err(e) => {
                warn!(date = %date, error = %e, "Day setting change failed");
                outcome.failed.push(BatchFailure {
                    date: date.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        admin = %admin.username,
        applied = outcome.applied.len(),
        failed = outcome.failed.len(),
        "Day setting changes saved"
    );
    outcome
}

/// Resets a date: removes every booking and clears the sold-out flag.
///
/// The seat cap is kept. The request must carry `confirm: true`.
///
/// # Errors
///
/// Returns an error if:
/// - The date cannot be parsed or is not an operating date
/// - The reset was not confirmed
/// - The store fails; nothing is changed in that case
pub fn reset_day(
    persistence: &mut Persistence,
    season: &OperatingSeason,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    date: &str,
    request: ResetDayRequest,
) -> Result<ResetDayResponse, ApiError> {
    let date: Date = parse_request_date(date)?;
    season
        .ensure_operating_date(date)
        .map_err(translate_domain_error)?;

    if !request.confirm {
        return Err(translate_domain_error(DomainError::ResetNotConfirmed {
            date,
        }));
    }

    let removed_bookings: usize = persistence
        .reset_day(date, clock.now())
        .map_err(translate_persistence_error)?;
    let seat_cap: u32 = persistence
        .get_day_setting(date)
        .map_err(translate_persistence_error)?
        .map_or(season.default_seat_cap(), |s| s.seat_cap);

    info!(admin = %admin.username, date = %date, removed_bookings, "Day reset by admin");

    Ok(ResetDayResponse {
        date: date.to_string(),
        removed_bookings,
        seat_cap,
        message: format!("Reset {date}: removed {removed_bookings} bookings"),
    })
}

/// Exports every booking as CSV, ordered by date then booking time.
///
/// # Errors
///
/// Returns an error if the store fails or the CSV cannot be written.
pub fn export_bookings_csv(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
) -> Result<ExportFile, ApiError> {
    let mut bookings: Vec<Booking> = persistence
        .list_bookings()
        .map_err(translate_persistence_error)?;
    bookings.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    info!(admin = %admin.username, count = bookings.len(), "Bookings exported");
    export::csv_export(&bookings, clock.now().offset())
}

/// Exports one day's manifest.
///
/// # Errors
///
/// Returns an error if the date cannot be parsed or the store fails.
pub fn export_day_manifest(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    admin: &AuthenticatedAdmin,
    date: &str,
) -> Result<ExportFile, ApiError> {
    let date: Date = parse_request_date(date)?;
    let bookings: Vec<Booking> = persistence
        .list_bookings_for_date(date)
        .map_err(translate_persistence_error)?;

    info!(admin = %admin.username, date = %date, count = bookings.len(), "Manifest exported");
    Ok(export::manifest_export(
        date,
        &bookings,
        clock.now().offset(),
    ))
}
