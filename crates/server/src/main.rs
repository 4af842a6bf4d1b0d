// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod session;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use prenota_api::{
    AdminAuthenticator, ApiError, ApplyDaySettingChangesRequest, BatchOutcome, CalendarResponse,
    CancelBookingRequest, CancelBookingResponse, Clock, ConfiguredCredentials,
    DayAvailabilityInfo, DaySettingResponse, DeleteBookingResponse, ExportFile,
    ListBookingsResponse, LoginRequest, LoginResponse, OverviewResponse, RULE_CANCELLATION_WINDOW,
    RULE_SOLD_OUT, ResetDayRequest, ResetDayResponse, SearchBookingsResponse, SeasonResponse,
    SessionRegistry, SetSeatCapRequest, SetSoldOutRequest, SubmitBookingRequest,
    SubmitBookingResponse, SystemClock,
};
use prenota_domain::OperatingSeason;
use prenota_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use time::{Date, Duration, Weekday};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use crate::session::SessionAdmin;

/// Prenota Server - HTTP server for the Prenota reservation service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "PRENOTA_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "PRENOTA_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, env = "PRENOTA_PORT", default_value_t = 3000)]
    port: u16,

    /// First day of the season (YYYY-MM-DD, inclusive)
    #[arg(long, env = "PRENOTA_SEASON_START", default_value = "2025-06-30", value_parser = parse_date_arg)]
    season_start: Date,

    /// Last day of the season (YYYY-MM-DD, inclusive)
    #[arg(long, env = "PRENOTA_SEASON_END", default_value = "2025-07-27", value_parser = parse_date_arg)]
    season_end: Date,

    /// Weekday on which the restaurant is closed
    #[arg(long, env = "PRENOTA_CLOSED_WEEKDAY", default_value = "monday", value_parser = parse_weekday_arg)]
    closed_weekday: Weekday,

    /// Seat cap for days without an explicit setting
    #[arg(long, env = "PRENOTA_DEFAULT_SEAT_CAP", default_value_t = 150)]
    default_seat_cap: u32,

    /// The restaurant's offset from UTC in whole hours
    #[arg(long, env = "PRENOTA_UTC_OFFSET_HOURS", default_value_t = 2, allow_hyphen_values = true)]
    utc_offset_hours: i8,

    /// Admin username
    #[arg(long, env = "PRENOTA_ADMIN_USERNAME", default_value = "admin")]
    admin_username: String,

    /// Admin password (at least 8 characters)
    #[arg(long, env = "PRENOTA_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: String,

    /// Admin session lifetime in hours
    #[arg(long, env = "PRENOTA_SESSION_HOURS", default_value_t = 8)]
    session_hours: u16,
}

fn parse_date_arg(value: &str) -> Result<Date, String> {
    prenota_domain::parse_date(value).map_err(|e| e.to_string())
}

fn parse_weekday_arg(value: &str) -> Result<Weekday, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Monday),
        "tuesday" | "tue" => Ok(Weekday::Tuesday),
        "wednesday" | "wed" => Ok(Weekday::Wednesday),
        "thursday" | "thu" => Ok(Weekday::Thursday),
        "friday" | "fri" => Ok(Weekday::Friday),
        "saturday" | "sat" => Ok(Weekday::Saturday),
        "sunday" | "sun" => Ok(Weekday::Sunday),
        other => Err(format!("unknown weekday '{other}'")),
    }
}

/// Application state shared across handlers.
///
/// The store sits behind a single async mutex, so store operations are
/// serialized in-process.
#[derive(Clone)]
struct AppState {
    /// The booking store.
    persistence: Arc<Mutex<Persistence>>,
    /// The operating season.
    season: Arc<OperatingSeason>,
    /// The source of "now" and "today".
    clock: Arc<dyn Clock>,
    /// Admin credential check.
    authenticator: Arc<dyn AdminAuthenticator>,
    /// Live admin sessions.
    sessions: Arc<SessionRegistry>,
    /// Live change feed.
    live_events: Arc<LiveEventBroadcaster>,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.live_events)
    }
}

impl FromRef<AppState> for Arc<dyn Clock> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.clock)
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// API response for operations without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse {
    /// Success indicator.
    success: bool,
    /// A human-readable message.
    message: String,
}

/// Query parameters for listing bookings.
#[derive(Debug, Deserialize)]
struct ListBookingsQuery {
    /// Only list this date's bookings.
    date: Option<String>,
}

/// Query parameters for searching bookings.
#[derive(Debug, Deserialize)]
struct SearchBookingsQuery {
    /// The search term.
    #[serde(default)]
    q: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::DomainRuleViolation { rule, .. }
                if rule == RULE_SOLD_OUT || rule == RULE_CANCELLATION_WINDOW =>
            {
                StatusCode::CONFLICT
            }
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::StoreUnavailable { .. } => {
                error!(error = %err, "Booking store unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Turns a generated file into a download response.
fn download(file: ExportFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.body,
    )
        .into_response()
}

// ============================================================================
// Public routes
// ============================================================================

/// Handler for GET `/season` endpoint.
async fn handle_get_season(AxumState(app_state): AxumState<AppState>) -> Json<SeasonResponse> {
    Json(prenota_api::get_season(&app_state.season))
}

/// Handler for GET `/calendar` endpoint.
async fn handle_get_calendar(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<CalendarResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: CalendarResponse = prenota_api::get_calendar(
        &mut persistence,
        &app_state.season,
        app_state.clock.as_ref(),
    )?;
    Ok(Json(response))
}

/// Handler for GET `/availability/{date}` endpoint.
async fn handle_get_availability(
    AxumState(app_state): AxumState<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayAvailabilityInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DayAvailabilityInfo = prenota_api::get_availability(
        &mut persistence,
        &app_state.season,
        app_state.clock.as_ref(),
        &date,
    )?;
    Ok(Json(response))
}

/// Handler for POST `/bookings` endpoint.
///
/// Submits a customer booking.
async fn handle_submit_booking(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SubmitBookingRequest>,
) -> Result<(StatusCode, Json<SubmitBookingResponse>), HttpError> {
    info!(date = %req.date, seats = req.seats, "Handling submit_booking request");

    let mut persistence = app_state.persistence.lock().await;
    let response: SubmitBookingResponse = prenota_api::submit_booking(
        &mut persistence,
        &app_state.season,
        app_state.clock.as_ref(),
        &req,
    )?;
    drop(persistence);

    app_state.live_events.broadcast(&LiveEvent::BookingCreated {
        date: response.date.clone(),
        seats: response.seats,
    });

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/bookings/cancel` endpoint.
async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CancelBookingRequest>,
) -> Result<Json<CancelBookingResponse>, HttpError> {
    info!("Handling cancel_booking request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CancelBookingResponse =
        prenota_api::cancel_booking(&mut persistence, app_state.clock.as_ref(), &req)?;
    drop(persistence);

    app_state.live_events.broadcast(&LiveEvent::BookingCancelled {
        date: response.date.clone(),
    });

    Ok(Json(response))
}

// ============================================================================
// Session routes
// ============================================================================

/// Handler for POST `/admin/login` endpoint.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(username = %req.username, "Handling login request");

    let response: LoginResponse = prenota_api::login(
        app_state.authenticator.as_ref(),
        &app_state.sessions,
        app_state.clock.as_ref(),
        &req,
    )?;
    Ok(Json(response))
}

/// Handler for POST `/admin/logout` endpoint.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, token): SessionAdmin,
) -> Result<Json<WriteResponse>, HttpError> {
    prenota_api::logout(&app_state.sessions, &token)?;
    info!(username = %admin.username, "Admin session closed");

    Ok(Json(WriteResponse {
        success: true,
        message: String::from("Logged out"),
    }))
}

// ============================================================================
// Admin routes
// ============================================================================

/// Handler for GET `/admin/overview` endpoint.
async fn handle_get_overview(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
) -> Result<Json<OverviewResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: OverviewResponse = prenota_api::get_overview(
        &mut persistence,
        &app_state.season,
        app_state.clock.as_ref(),
        &admin,
    )?;
    Ok(Json(response))
}

/// Handler for GET `/admin/bookings` endpoint.
async fn handle_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ListBookingsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListBookingsResponse =
        prenota_api::list_bookings(&mut persistence, &admin, query.date.as_deref())?;
    Ok(Json(response))
}

/// Handler for GET `/admin/bookings/search` endpoint.
async fn handle_search_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Query(query): Query<SearchBookingsQuery>,
) -> Result<Json<SearchBookingsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: SearchBookingsResponse =
        prenota_api::search_bookings(&mut persistence, &admin, &query.q)?;
    Ok(Json(response))
}

/// Handler for POST `/admin/bookings` endpoint.
///
/// Adds a booking without the public capacity checks.
async fn handle_add_manual_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Json(req): Json<SubmitBookingRequest>,
) -> Result<(StatusCode, Json<SubmitBookingResponse>), HttpError> {
    info!(
        username = %admin.username,
        date = %req.date,
        seats = req.seats,
        "Handling add_manual_booking request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SubmitBookingResponse = prenota_api::add_manual_booking(
        &mut persistence,
        &app_state.season,
        app_state.clock.as_ref(),
        &admin,
        &req,
    )?;
    drop(persistence);

    app_state.live_events.broadcast(&LiveEvent::BookingCreated {
        date: response.date.clone(),
        seats: response.seats,
    });

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for DELETE `/admin/bookings/{code}` endpoint.
async fn handle_delete_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(code): Path<String>,
) -> Result<Json<DeleteBookingResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteBookingResponse =
        prenota_api::delete_booking(&mut persistence, &admin, &code)?;
    drop(persistence);

    app_state.live_events.broadcast(&LiveEvent::BookingDeleted {
        date: response.date.clone(),
    });

    Ok(Json(response))
}

/// Handler for PUT `/admin/days/{date}/seat_cap` endpoint.
async fn handle_set_seat_cap(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(date): Path<String>,
    Json(req): Json<SetSeatCapRequest>,
) -> Result<Json<DaySettingResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DaySettingResponse = prenota_api::set_seat_cap(
        &mut persistence,
        &app_state.season,
        app_state.clock.as_ref(),
        &admin,
        &date,
        req,
    )?;
    drop(persistence);

    app_state
        .live_events
        .broadcast(&LiveEvent::DaySettingsChanged {
            dates: vec![response.date.clone()],
        });

    Ok(Json(response))
}

/// Handler for PUT `/admin/days/{date}/sold_out` endpoint.
async fn handle_set_sold_out(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(date): Path<String>,
    Json(req): Json<SetSoldOutRequest>,
) -> Result<Json<DaySettingResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DaySettingResponse = prenota_api::set_sold_out(
        &mut persistence,
        &app_state.season,
        app_state.clock.as_ref(),
        &admin,
        &date,
        req,
    )?;
    drop(persistence);

    app_state
        .live_events
        .broadcast(&LiveEvent::DaySettingsChanged {
            dates: vec![response.date.clone()],
        });

    Ok(Json(response))
}

/// Handler for POST `/admin/days/changes` endpoint.
///
/// Saves a batch of pending day-setting edits and reports per-date results.
async fn handle_apply_day_setting_changes(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Json(req): Json<ApplyDaySettingChangesRequest>,
) -> Json<BatchOutcome> {
    let mut persistence = app_state.persistence.lock().await;
    let outcome: BatchOutcome = prenota_api::apply_day_setting_changes(
        &mut persistence,
        &app_state.season,
        app_state.clock.as_ref(),
        &admin,
        &req,
    );
    drop(persistence);

    if !outcome.applied.is_empty() {
        app_state
            .live_events
            .broadcast(&LiveEvent::DaySettingsChanged {
                dates: outcome.applied.iter().map(|s| s.date.clone()).collect(),
            });
    }

    Json(outcome)
}

/// Handler for POST `/admin/days/{date}/reset` endpoint.
async fn handle_reset_day(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(date): Path<String>,
    Json(req): Json<ResetDayRequest>,
) -> Result<Json<ResetDayResponse>, HttpError> {
    info!(username = %admin.username, date = %date, "Handling reset_day request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ResetDayResponse = prenota_api::reset_day(
        &mut persistence,
        &app_state.season,
        app_state.clock.as_ref(),
        &admin,
        &date,
        req,
    )?;
    drop(persistence);

    app_state.live_events.broadcast(&LiveEvent::DayReset {
        date: response.date.clone(),
        removed_bookings: response.removed_bookings,
    });

    Ok(Json(response))
}

/// Handler for GET `/admin/export/bookings.csv` endpoint.
async fn handle_export_bookings_csv(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let file: ExportFile =
        prenota_api::export_bookings_csv(&mut persistence, app_state.clock.as_ref(), &admin)?;
    Ok(download(file))
}

/// Handler for GET `/admin/export/days/{date}/manifest.txt` endpoint.
async fn handle_export_day_manifest(
    AxumState(app_state): AxumState<AppState>,
    SessionAdmin(admin, _): SessionAdmin,
    Path(date): Path<String>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let file: ExportFile = prenota_api::export_day_manifest(
        &mut persistence,
        app_state.clock.as_ref(),
        &admin,
        &date,
    )?;
    Ok(download(file))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/season", get(handle_get_season))
        .route("/calendar", get(handle_get_calendar))
        .route("/availability/{date}", get(handle_get_availability))
        .route("/bookings", post(handle_submit_booking))
        .route("/bookings/cancel", post(handle_cancel_booking))
        .route("/admin/login", post(handle_login))
        .route("/admin/logout", post(handle_logout))
        .route("/admin/overview", get(handle_get_overview))
        .route(
            "/admin/bookings",
            get(handle_list_bookings).post(handle_add_manual_booking),
        )
        .route("/admin/bookings/search", get(handle_search_bookings))
        .route("/admin/bookings/{code}", delete(handle_delete_booking))
        .route("/admin/days/changes", post(handle_apply_day_setting_changes))
        .route("/admin/days/{date}/seat_cap", put(handle_set_seat_cap))
        .route("/admin/days/{date}/sold_out", put(handle_set_sold_out))
        .route("/admin/days/{date}/reset", post(handle_reset_day))
        .route("/admin/export/bookings.csv", get(handle_export_bookings_csv))
        .route(
            "/admin/export/days/{date}/manifest.txt",
            get(handle_export_day_manifest),
        )
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Prenota Server");

    let season: OperatingSeason = OperatingSeason::new(
        args.season_start,
        args.season_end,
        args.closed_weekday,
        args.default_seat_cap,
    )?;
    info!(
        start = %season.start(),
        end = %season.end(),
        closed = %season.closed_weekday(),
        default_seat_cap = season.default_seat_cap(),
        "Operating season configured"
    );

    let clock: SystemClock = SystemClock::from_hours(args.utc_offset_hours)?;
    let credentials: ConfiguredCredentials =
        ConfiguredCredentials::new(&args.admin_username, &args.admin_password)?;

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        season: Arc::new(season),
        clock: Arc::new(clock),
        authenticator: Arc::new(credentials),
        sessions: Arc::new(SessionRegistry::new(Duration::hours(i64::from(
            args.session_hours,
        )))),
        live_events: Arc::new(LiveEventBroadcaster::new()),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use prenota_api::FixedClock;
    use time::macros::{date, datetime};
    use tower::ServiceExt;

    const ADMIN_PASSWORD: &str = "correct-horse";

    /// Helper to create test app state with in-memory persistence.
    ///
    /// Today is Tuesday 1 July 2025.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        let season: OperatingSeason = OperatingSeason::new(
            date!(2025 - 06 - 30),
            date!(2025 - 07 - 27),
            Weekday::Monday,
            150,
        )
        .expect("Failed to build season");
        let credentials: ConfiguredCredentials =
            ConfiguredCredentials::with_cost("admin", ADMIN_PASSWORD, 4)
                .expect("Failed to hash password");

        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            season: Arc::new(season),
            clock: Arc::new(FixedClock::new(datetime!(2025-07-01 10:00 +02:00))),
            authenticator: Arc::new(credentials),
            sessions: Arc::new(SessionRegistry::default()),
            live_events: Arc::new(LiveEventBroadcaster::new()),
        }
    }

    fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn authed_request(
        method: &str,
        uri: &str,
        token: &str,
        body: Option<&serde_json::Value>,
    ) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {token}"));
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    fn booking_body(date: &str, seats: u32) -> serde_json::Value {
        serde_json::json!({
            "date": date,
            "seats": seats,
            "name": "Maria Rossi",
            "phone": "+39 333 1234567",
            "email": "maria@example.it"
        })
    }

    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/admin/login",
                &serde_json::json!({ "username": "admin", "password": ADMIN_PASSWORD }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login: LoginResponse = body_json(response).await;
        login.session_token
    }

    async fn submit(app: &Router, date: &str, seats: u32) -> Response {
        app.clone()
            .oneshot(json_request("POST", "/bookings", &booking_body(date, seats)))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_season_lists_operating_dates() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/season")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let season: SeasonResponse = body_json(response).await;
        assert_eq!(season.operating_dates.len(), 24);
        assert_eq!(season.default_seat_cap, 150);
    }

    #[tokio::test]
    async fn test_submit_booking_updates_calendar_and_broadcasts() {
        let app_state: AppState = create_test_app_state();
        let mut events = app_state.live_events.subscribe();
        let app: Router = build_router(app_state);

        let response = submit(&app, "2025-07-10", 4).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let booking: SubmitBookingResponse = body_json(response).await;
        assert_eq!(booking.code.len(), 5);

        assert_eq!(
            events.try_recv().unwrap(),
            LiveEvent::BookingCreated {
                date: String::from("2025-07-10"),
                seats: 4,
            }
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/availability/2025-07-10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let day: DayAvailabilityInfo = body_json(response).await;
        assert_eq!(day.available_seats, 146);
    }

    #[tokio::test]
    async fn test_sold_out_day_is_conflict() {
        let app: Router = build_router(create_test_app_state());
        let token: String = login(&app).await;

        let response = app
            .clone()
            .oneshot(authed_request(
                "PUT",
                "/admin/days/2025-07-10/sold_out",
                &token,
                Some(&serde_json::json!({ "is_sold_out": true })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = submit(&app, "2025-07-10", 2).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let error: ErrorResponse = body_json(response).await;
        assert!(error.error);
        assert!(error.message.contains("sold out"));
    }

    #[tokio::test]
    async fn test_bad_input_status_codes() {
        let app: Router = build_router(create_test_app_state());

        // Unparseable date
        let response = submit(&app, "10/07/2025", 2).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Closed Monday
        let response = submit(&app, "2025-07-07", 2).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        // More seats than the cap
        let response = submit(&app, "2025-07-10", 151).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_cancel_inside_window_is_conflict() {
        let app: Router = build_router(create_test_app_state());
        let booking: SubmitBookingResponse = body_json(submit(&app, "2025-07-02", 2).await).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/bookings/cancel",
                &serde_json::json!({ "code": booking.code }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(json_request(
                "POST",
                "/bookings/cancel",
                &serde_json::json!({ "code": "ZZZZ9" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_routes_require_session() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin/overview")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(authed_request("GET", "/admin/overview", "not-a-token", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(json_request(
                "POST",
                "/admin/login",
                &serde_json::json!({ "username": "admin", "password": "nope-nope" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app: Router = build_router(create_test_app_state());
        let token: String = login(&app).await;

        let response = app
            .clone()
            .oneshot(authed_request("POST", "/admin/logout", &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(authed_request("GET", "/admin/overview", &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_overview_and_search() {
        let app: Router = build_router(create_test_app_state());
        let token: String = login(&app).await;
        let booking: SubmitBookingResponse = body_json(submit(&app, "2025-07-10", 30).await).await;

        let response = app
            .clone()
            .oneshot(authed_request("GET", "/admin/overview", &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let overview: OverviewResponse = body_json(response).await;
        assert_eq!(overview.total_bookings, 1);
        assert_eq!(overview.total_booked_seats, 30);

        let response = app
            .oneshot(authed_request(
                "GET",
                &format!("/admin/bookings/search?q={}", booking.code.to_lowercase()),
                &token,
                None,
            ))
            .await
            .unwrap();
        let found: SearchBookingsResponse = body_json(response).await;
        assert_eq!(found.bookings.len(), 1);
        assert_eq!(found.bookings[0].code, booking.code);
    }

    #[tokio::test]
    async fn test_admin_delete_and_reset() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());
        let token: String = login(&app).await;

        let first: SubmitBookingResponse = body_json(submit(&app, "2025-07-10", 5).await).await;
        submit(&app, "2025-07-10", 6).await;

        let response = app
            .clone()
            .oneshot(authed_request(
                "DELETE",
                &format!("/admin/bookings/{}", first.code),
                &token,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Reset without confirmation is refused
        let response = app
            .clone()
            .oneshot(authed_request(
                "POST",
                "/admin/days/2025-07-10/reset",
                &token,
                Some(&serde_json::json!({})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let mut events = app_state.live_events.subscribe();
        let response = app
            .oneshot(authed_request(
                "POST",
                "/admin/days/2025-07-10/reset",
                &token,
                Some(&serde_json::json!({ "confirm": true })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let reset: ResetDayResponse = body_json(response).await;
        assert_eq!(reset.removed_bookings, 1);
        assert_eq!(
            events.try_recv().unwrap(),
            LiveEvent::DayReset {
                date: String::from("2025-07-10"),
                removed_bookings: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_batch_changes_report_failures() {
        let app: Router = build_router(create_test_app_state());
        let token: String = login(&app).await;

        let response = app
            .oneshot(authed_request(
                "POST",
                "/admin/days/changes",
                &token,
                Some(&serde_json::json!({
                    "changes": [
                        { "date": "2025-07-10", "seat_cap": 90 },
                        { "date": "2025-07-11", "seat_cap": 0 }
                    ]
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let outcome: BatchOutcome = body_json(response).await;
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].date, "2025-07-11");
    }

    #[tokio::test]
    async fn test_csv_export_is_a_download() {
        let app: Router = build_router(create_test_app_state());
        let token: String = login(&app).await;
        submit(&app, "2025-07-10", 2).await;

        let response = app
            .oneshot(authed_request(
                "GET",
                "/admin/export/bookings.csv",
                &token,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"tutte-le-prenotazioni.csv\""
        );

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: String = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert!(body.starts_with("\"Data\",\"Nome\""));
    }

    #[test]
    fn test_weekday_argument_parsing() {
        assert_eq!(parse_weekday_arg("Monday"), Ok(Weekday::Monday));
        assert_eq!(parse_weekday_arg(" sun "), Ok(Weekday::Sunday));
        assert!(parse_weekday_arg("lunedi").is_err());
    }

    #[test]
    fn test_api_error_status_mapping() {
        let cases: [(ApiError, StatusCode); 6] = [
            (
                ApiError::DomainRuleViolation {
                    rule: String::from(RULE_SOLD_OUT),
                    message: String::new(),
                },
                StatusCode::CONFLICT,
            ),
            (
                ApiError::DomainRuleViolation {
                    rule: String::from("seats_available"),
                    message: String::new(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::InvalidInput {
                    field: String::from("date"),
                    message: String::new(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::ResourceNotFound {
                    resource_type: String::from("Booking"),
                    message: String::new(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::StoreUnavailable {
                    message: String::from("disk I/O error"),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Internal {
                    message: String::new(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(HttpError::from(err).status, expected);
        }
    }
}
