// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates cross the boundary as `YYYY-MM-DD` strings and timestamps as
//! RFC 3339 strings.

use serde::{Deserialize, Serialize};

/// The operating season as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonResponse {
    /// First day of the season (inclusive).
    pub start: String,
    /// Last day of the season (inclusive).
    pub end: String,
    /// The weekday on which the restaurant is closed.
    pub closed_weekday: String,
    /// Seat cap for days without an explicit setting.
    pub default_seat_cap: u32,
    /// Every bookable date in ascending order.
    pub operating_dates: Vec<String>,
}

/// Availability of one operating date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailabilityInfo {
    /// The date.
    pub date: String,
    /// The seat cap in effect.
    pub total_seats: u32,
    /// Seats already booked.
    pub booked_seats: u32,
    /// Seats still free (never negative).
    pub available_seats: u32,
    /// Manually closed or full.
    pub is_sold_out: bool,
    /// The date lies before today.
    pub is_past: bool,
    /// A customer may book this date right now.
    pub is_bookable: bool,
}

/// The public booking calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarResponse {
    /// The restaurant's current day.
    pub today: String,
    /// One entry per operating date.
    pub days: Vec<DayAvailabilityInfo>,
}

/// A booking request from a customer, or a manual entry by staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitBookingRequest {
    /// The requested date (`YYYY-MM-DD`).
    pub date: String,
    /// Number of seats.
    pub seats: u32,
    /// Customer name.
    pub name: String,
    /// Customer phone number.
    pub phone: String,
    /// Customer email, optional.
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form notes, optional.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Confirmation of a stored booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitBookingResponse {
    /// The confirmation code to quote when cancelling.
    pub code: String,
    /// The booked date.
    pub date: String,
    /// Seats booked.
    pub seats: u32,
    /// A success message.
    pub message: String,
}

/// A customer's request to cancel with a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    /// The booking code, in any case.
    pub code: String,
}

/// Confirmation that a booking was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBookingResponse {
    /// The normalized booking code.
    pub code: String,
    /// The date the booking was for.
    pub date: String,
    /// Seats released.
    pub seats: u32,
    /// A success message.
    pub message: String,
}

/// Admin login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The admin username.
    pub username: String,
    /// The admin password.
    pub password: String,
}

/// Admin login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer token for subsequent admin requests.
    pub session_token: String,
    /// The canonical admin username.
    pub username: String,
    /// When the session ends.
    pub expires_at: String,
}

/// A stored booking as shown to staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInfo {
    /// Store identifier.
    pub booking_id: Option<i64>,
    /// The booked date.
    pub date: String,
    /// Seats booked.
    pub seats: u32,
    /// Customer name.
    pub name: String,
    /// Customer phone number.
    pub phone: String,
    /// Customer email.
    pub email: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Booking code.
    pub code: String,
    /// Creation time.
    pub created_at: String,
}

/// A list of bookings with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBookingsResponse {
    /// The date filter, if one was applied.
    pub date: Option<String>,
    /// The bookings.
    pub bookings: Vec<BookingInfo>,
    /// Number of bookings listed.
    pub total_bookings: usize,
    /// Seats across the listed bookings.
    pub total_seats: u64,
}

/// Bookings matching a staff search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBookingsResponse {
    /// The search term as received.
    pub query: String,
    /// Matching bookings, newest first.
    pub bookings: Vec<BookingInfo>,
}

/// One row of the admin overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewDay {
    /// Availability figures for the date.
    #[serde(flatten)]
    pub availability: DayAvailabilityInfo,
    /// Number of bookings on the date.
    pub booking_count: usize,
    /// Booked share of the cap, 0..=100.
    pub occupancy_percent: u32,
}

/// Season-wide occupancy for staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewResponse {
    /// One entry per operating date.
    pub days: Vec<OverviewDay>,
    /// Bookings across the season.
    pub total_bookings: usize,
    /// Seats booked across the season.
    pub total_booked_seats: u64,
}

/// Confirmation that staff removed a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteBookingResponse {
    /// The removed booking's code.
    pub code: String,
    /// The removed booking's date.
    pub date: String,
    /// A success message.
    pub message: String,
}

/// Request to change a date's seat cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSeatCapRequest {
    /// The new cap (positive).
    pub seat_cap: u32,
}

/// Request to set or clear a date's sold-out flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSoldOutRequest {
    /// The new flag.
    pub is_sold_out: bool,
}

/// A date's stored setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySettingResponse {
    /// The date.
    pub date: String,
    /// The seat cap.
    pub seat_cap: u32,
    /// The sold-out flag.
    pub is_sold_out: bool,
    /// When the setting last changed, if ever.
    pub updated_at: Option<String>,
}

/// One entry of a pending-changes batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySettingChangeRequest {
    /// The date to change.
    pub date: String,
    /// New seat cap, if changing.
    #[serde(default)]
    pub seat_cap: Option<u32>,
    /// New sold-out flag, if changing.
    #[serde(default)]
    pub is_sold_out: Option<bool>,
}

/// A batch of day-setting edits to save together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyDaySettingChangesRequest {
    /// The edits. Later entries for the same date merge into earlier ones.
    pub changes: Vec<DaySettingChangeRequest>,
}

/// A date whose change could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// The date as submitted.
    pub date: String,
    /// Why it failed.
    pub message: String,
}

/// Per-date results of a batch save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Settings stored, in date order.
    pub applied: Vec<DaySettingResponse>,
    /// Dates that were not stored.
    pub failed: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Returns whether every change was applied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Request to wipe a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetDayRequest {
    /// Must be `true`; the reset cannot be undone.
    #[serde(default)]
    pub confirm: bool,
}

/// Result of a day reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetDayResponse {
    /// The date reset.
    pub date: String,
    /// Bookings deleted.
    pub removed_bookings: usize,
    /// The seat cap, which a reset leaves untouched.
    pub seat_cap: u32,
    /// A success message.
    pub message: String,
}

/// A generated download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type including charset.
    pub content_type: &'static str,
    /// The file contents.
    pub body: String,
}
