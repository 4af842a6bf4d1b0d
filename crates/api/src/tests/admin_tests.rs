// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the admin console handlers.

use prenota_domain::OperatingSeason;
use prenota_persistence::Persistence;
use time::macros::datetime;

use crate::auth::AuthenticatedAdmin;
use crate::clock::FixedClock;
use crate::error::ApiError;
use crate::handlers::{
    add_manual_booking, apply_day_setting_changes, delete_booking, get_availability,
    get_overview, list_bookings, reset_day, search_bookings, set_seat_cap, set_sold_out,
    submit_booking,
};
use crate::request_response::{
    ApplyDaySettingChangesRequest, BatchOutcome, DayAvailabilityInfo, DaySettingChangeRequest,
    ListBookingsResponse, OverviewResponse, ResetDayRequest, ResetDayResponse,
    SetSeatCapRequest, SetSoldOutRequest, SubmitBookingRequest, SubmitBookingResponse,
};
use crate::tests::helpers::{
    create_booking_request, create_test_admin, create_test_clock, create_test_persistence,
    create_test_season,
};

struct Fixture {
    persistence: Persistence,
    season: OperatingSeason,
    clock: FixedClock,
    admin: AuthenticatedAdmin,
}

impl Fixture {
    fn new() -> Self {
        Self {
            persistence: create_test_persistence(),
            season: create_test_season(),
            clock: create_test_clock(),
            admin: create_test_admin(),
        }
    }

    fn book(&mut self, request: &SubmitBookingRequest) -> SubmitBookingResponse {
        submit_booking(&mut self.persistence, &self.season, &self.clock, request).unwrap()
    }

    fn availability(&mut self, date: &str) -> DayAvailabilityInfo {
        get_availability(&mut self.persistence, &self.season, &self.clock, date).unwrap()
    }
}

#[test]
fn test_overview_totals_and_occupancy() {
    let mut fx: Fixture = Fixture::new();
    fx.book(&create_booking_request("2025-07-10", 30));
    fx.book(&create_booking_request("2025-07-10", 45));
    fx.book(&create_booking_request("2025-07-11", 15));

    let overview: OverviewResponse =
        get_overview(&mut fx.persistence, &fx.season, &fx.clock, &fx.admin).unwrap();

    assert_eq!(overview.days.len(), 24);
    assert_eq!(overview.total_bookings, 3);
    assert_eq!(overview.total_booked_seats, 90);

    let busy = overview
        .days
        .iter()
        .find(|d| d.availability.date == "2025-07-10")
        .unwrap();
    assert_eq!(busy.booking_count, 2);
    assert_eq!(busy.occupancy_percent, 50);
}

#[test]
fn test_list_bookings_all_and_by_date() {
    let mut fx: Fixture = Fixture::new();
    fx.book(&create_booking_request("2025-07-10", 2));
    fx.book(&create_booking_request("2025-07-11", 5));

    let all: ListBookingsResponse = list_bookings(&mut fx.persistence, &fx.admin, None).unwrap();
    assert_eq!(all.total_bookings, 2);
    assert_eq!(all.total_seats, 7);
    assert_eq!(all.date, None);

    let one_day: ListBookingsResponse =
        list_bookings(&mut fx.persistence, &fx.admin, Some("2025-07-11")).unwrap();
    assert_eq!(one_day.total_bookings, 1);
    assert_eq!(one_day.bookings[0].seats, 5);
    assert_eq!(one_day.date.as_deref(), Some("2025-07-11"));
}

#[test]
fn test_search_matches_code_name_and_email() {
    let mut fx: Fixture = Fixture::new();
    let first: SubmitBookingResponse = fx.book(&create_booking_request("2025-07-10", 2));

    let mut other: SubmitBookingRequest = create_booking_request("2025-07-11", 3);
    other.name = String::from("Giuseppe Verdi");
    other.email = Some(String::from("g.verdi@example.com"));
    fx.book(&other);

    let by_code = search_bookings(&mut fx.persistence, &fx.admin, &first.code.to_lowercase())
        .unwrap();
    assert_eq!(by_code.bookings.len(), 1);
    assert_eq!(by_code.bookings[0].code, first.code);

    let by_name = search_bookings(&mut fx.persistence, &fx.admin, "verdi").unwrap();
    assert_eq!(by_name.bookings.len(), 1);
    assert_eq!(by_name.bookings[0].name, "Giuseppe Verdi");

    let by_email = search_bookings(&mut fx.persistence, &fx.admin, "example").unwrap();
    assert_eq!(by_email.bookings.len(), 2);

    let blank = search_bookings(&mut fx.persistence, &fx.admin, "   ").unwrap();
    assert!(blank.bookings.is_empty());
}

#[test]
fn test_manual_booking_ignores_sold_out_and_cap() {
    let mut fx: Fixture = Fixture::new();
    set_seat_cap(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        "2025-07-10",
        SetSeatCapRequest { seat_cap: 10 },
    )
    .unwrap();
    set_sold_out(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        "2025-07-10",
        SetSoldOutRequest { is_sold_out: true },
    )
    .unwrap();

    let added: SubmitBookingResponse = add_manual_booking(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        &create_booking_request("2025-07-10", 12),
    )
    .unwrap();
    assert_eq!(added.seats, 12);

    let day: DayAvailabilityInfo = fx.availability("2025-07-10");
    assert_eq!(day.booked_seats, 12);
    assert_eq!(day.available_seats, 0);
}

#[test]
fn test_manual_booking_allows_past_date() {
    let mut fx: Fixture = Fixture::new();
    fx.clock = FixedClock::new(datetime!(2025-07-20 12:00 +02:00));

    let result = add_manual_booking(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        &create_booking_request("2025-07-02", 2),
    );
    assert!(result.is_ok());
}

#[test]
fn test_manual_booking_rejects_closed_weekday() {
    let mut fx: Fixture = Fixture::new();

    let result = add_manual_booking(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        &create_booking_request("2025-07-14", 2),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "bookable_date"
    ));
}

#[test]
fn test_admin_delete_bypasses_cancellation_window() {
    let mut fx: Fixture = Fixture::new();
    let booked: SubmitBookingResponse = fx.book(&create_booking_request("2025-07-01", 4));

    let deleted = delete_booking(&mut fx.persistence, &fx.admin, &booked.code).unwrap();
    assert_eq!(deleted.date, "2025-07-01");
    assert_eq!(fx.availability("2025-07-01").booked_seats, 0);

    let again = delete_booking(&mut fx.persistence, &fx.admin, &booked.code);
    assert!(matches!(again, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_zero_seat_cap_is_rejected() {
    let mut fx: Fixture = Fixture::new();

    let result = set_seat_cap(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        "2025-07-10",
        SetSeatCapRequest { seat_cap: 0 },
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "seat_cap"
    ));
}

#[test]
fn test_oversized_seat_cap_is_invalid_input() {
    let mut fx: Fixture = Fixture::new();

    let result = set_seat_cap(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        "2025-07-10",
        SetSeatCapRequest {
            seat_cap: 3_000_000_000,
        },
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "seat_cap"
    ));
    assert_eq!(fx.availability("2025-07-10").total_seats, 150);
}

#[test]
fn test_oversized_manual_booking_is_rule_violation() {
    let mut fx: Fixture = Fixture::new();

    let result = add_manual_booking(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        &create_booking_request("2025-07-10", 3_000_000_000),
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "seats_available"
    ));
    assert_eq!(fx.availability("2025-07-10").booked_seats, 0);
}

#[test]
fn test_batch_reports_oversized_cap_for_its_date() {
    let mut fx: Fixture = Fixture::new();

    let request: ApplyDaySettingChangesRequest = ApplyDaySettingChangesRequest {
        changes: vec![
            DaySettingChangeRequest {
                date: String::from("2025-07-10"),
                seat_cap: Some(3_000_000_000),
                is_sold_out: None,
            },
            DaySettingChangeRequest {
                date: String::from("2025-07-11"),
                seat_cap: Some(90),
                is_sold_out: None,
            },
        ],
    };

    let outcome: BatchOutcome = apply_day_setting_changes(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        &request,
    );

    assert_eq!(outcome.applied.len(), 1);
    assert_eq!(outcome.applied[0].date, "2025-07-11");
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].date, "2025-07-10");
    assert!(outcome.failed[0].message.contains("Invalid seat cap"));
    assert_eq!(fx.availability("2025-07-10").total_seats, 150);
}

#[test]
fn test_lowering_cap_below_booked_keeps_bookings() {
    let mut fx: Fixture = Fixture::new();
    fx.book(&create_booking_request("2025-07-10", 20));

    set_seat_cap(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        "2025-07-10",
        SetSeatCapRequest { seat_cap: 10 },
    )
    .unwrap();

    let day: DayAvailabilityInfo = fx.availability("2025-07-10");
    assert_eq!(day.booked_seats, 20);
    assert_eq!(day.available_seats, 0);
    assert!(day.is_sold_out);
}

#[test]
fn test_batch_reports_failures_per_date() {
    let mut fx: Fixture = Fixture::new();

    let request: ApplyDaySettingChangesRequest = ApplyDaySettingChangesRequest {
        changes: vec![
            DaySettingChangeRequest {
                date: String::from("2025-07-10"),
                seat_cap: Some(80),
                is_sold_out: None,
            },
            DaySettingChangeRequest {
                date: String::from("2025-07-07"),
                seat_cap: Some(80),
                is_sold_out: None,
            },
            DaySettingChangeRequest {
                date: String::from("2025-07-11"),
                seat_cap: Some(0),
                is_sold_out: None,
            },
            DaySettingChangeRequest {
                date: String::from("2025-07-10"),
                seat_cap: None,
                is_sold_out: Some(true),
            },
        ],
    };

    let outcome: BatchOutcome = apply_day_setting_changes(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        &request,
    );

    assert!(!outcome.is_complete());
    assert_eq!(outcome.applied.len(), 1);
    assert_eq!(outcome.applied[0].date, "2025-07-10");
    assert_eq!(outcome.applied[0].seat_cap, 80);
    assert!(outcome.applied[0].is_sold_out);

    let failed_dates: Vec<&str> = outcome.failed.iter().map(|f| f.date.as_str()).collect();
    assert_eq!(failed_dates, vec!["2025-07-07", "2025-07-11"]);
    assert!(outcome.failed[1].message.contains("seat cap"));

    // The failed dates were left alone
    assert_eq!(fx.availability("2025-07-11").total_seats, 150);
}

#[test]
fn test_reset_requires_confirmation() {
    let mut fx: Fixture = Fixture::new();
    fx.book(&create_booking_request("2025-07-10", 2));

    let result = reset_day(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        "2025-07-10",
        ResetDayRequest { confirm: false },
    );
    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "reset_confirmation"
    ));
    assert_eq!(fx.availability("2025-07-10").booked_seats, 2);
}

#[test]
fn test_reset_clears_bookings_and_flag_but_keeps_cap() {
    let mut fx: Fixture = Fixture::new();
    set_seat_cap(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        "2025-07-10",
        SetSeatCapRequest { seat_cap: 60 },
    )
    .unwrap();
    fx.book(&create_booking_request("2025-07-10", 10));
    fx.book(&create_booking_request("2025-07-10", 20));
    fx.book(&create_booking_request("2025-07-11", 5));
    set_sold_out(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        "2025-07-10",
        SetSoldOutRequest { is_sold_out: true },
    )
    .unwrap();

    let response: ResetDayResponse = reset_day(
        &mut fx.persistence,
        &fx.season,
        &fx.clock,
        &fx.admin,
        "2025-07-10",
        ResetDayRequest { confirm: true },
    )
    .unwrap();

    assert_eq!(response.removed_bookings, 2);
    assert_eq!(response.seat_cap, 60);

    let day: DayAvailabilityInfo = fx.availability("2025-07-10");
    assert_eq!(day.total_seats, 60);
    assert_eq!(day.booked_seats, 0);
    assert!(!day.is_sold_out);

    // Other dates are untouched
    assert_eq!(fx.availability("2025-07-11").booked_seats, 5);
}
