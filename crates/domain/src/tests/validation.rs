// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    BookingSubmission, DayAvailability, DomainError, MAX_SEATS, OperatingSeason,
    validate_manual_booking, validate_seat_cap, validate_submission,
};
use time::macros::date;
use time::{Date, Weekday};

const TODAY: Date = date!(2025 - 07 - 05);

fn create_test_submission(date: Date, seats: u32) -> BookingSubmission {
    BookingSubmission {
        date,
        seats,
        name: String::from("Mario Rossi"),
        phone: String::from("3331234567"),
        email: Some(String::from("mario@example.it")),
        notes: None,
    }
}

fn create_availability(date: Date, total: u32, booked: u32, flagged: bool) -> DayAvailability {
    let available: u32 = total.saturating_sub(booked);
    DayAvailability {
        date,
        total_seats: total,
        booked_seats: booked,
        available_seats: available,
        is_sold_out: flagged || available == 0,
    }
}

fn create_test_season() -> OperatingSeason {
    OperatingSeason::new(
        date!(2025 - 06 - 30),
        date!(2025 - 07 - 27),
        Weekday::Monday,
        150,
    )
    .unwrap()
}

#[test]
fn test_validate_submission_accepts_valid_booking() {
    let day: Date = date!(2025 - 07 - 10);
    let result: Result<(), DomainError> = validate_submission(
        &create_test_submission(day, 4),
        &create_availability(day, 100, 10, false),
        TODAY,
    );
    assert!(result.is_ok());
}

#[test]
fn test_validate_submission_accepts_today() {
    let result: Result<(), DomainError> = validate_submission(
        &create_test_submission(TODAY, 2),
        &create_availability(TODAY, 100, 0, false),
        TODAY,
    );
    assert!(result.is_ok());
}

#[test]
fn test_validate_submission_rejects_past_date() {
    let day: Date = date!(2025 - 07 - 04);
    let result: Result<(), DomainError> = validate_submission(
        &create_test_submission(day, 2),
        &create_availability(day, 100, 0, false),
        TODAY,
    );
    assert!(matches!(result, Err(DomainError::InvalidDate { .. })));
}

#[test]
fn test_validate_submission_rejects_flagged_sold_out_day() {
    let day: Date = date!(2025 - 07 - 10);
    let result: Result<(), DomainError> = validate_submission(
        &create_test_submission(day, 1),
        &create_availability(day, 100, 0, true),
        TODAY,
    );
    assert_eq!(result, Err(DomainError::SoldOut { date: day }));
}

#[test]
fn test_validate_submission_rejects_zero_seats() {
    let day: Date = date!(2025 - 07 - 10);
    let result: Result<(), DomainError> = validate_submission(
        &create_test_submission(day, 0),
        &create_availability(day, 100, 0, false),
        TODAY,
    );
    assert_eq!(
        result,
        Err(DomainError::SeatsOutOfRange {
            requested: 0,
            available: 100,
        })
    );
}

#[test]
fn test_validate_submission_rejects_seat_range_for_all_availabilities() {
    let day: Date = date!(2025 - 07 - 10);
    for total in [1_u32, 10, 100, 150] {
        for booked in 0..total {
            let availability: DayAvailability = create_availability(day, total, booked, false);
            let available: u32 = availability.available_seats;

            let zero = validate_submission(&create_test_submission(day, 0), &availability, TODAY);
            assert!(matches!(zero, Err(DomainError::SeatsOutOfRange { .. })));

            let over = validate_submission(
                &create_test_submission(day, available + 1),
                &availability,
                TODAY,
            );
            assert!(matches!(over, Err(DomainError::SeatsOutOfRange { .. })));

            let exact = validate_submission(
                &create_test_submission(day, available),
                &availability,
                TODAY,
            );
            assert!(exact.is_ok());
        }
    }
}

#[test]
fn test_validate_submission_rejects_blank_name() {
    let day: Date = date!(2025 - 07 - 10);
    let mut submission: BookingSubmission = create_test_submission(day, 2);
    submission.name = String::from("   ");

    let result = validate_submission(
        &submission,
        &create_availability(day, 100, 0, false),
        TODAY,
    );
    assert_eq!(result, Err(DomainError::MissingRequiredField("name")));
}

#[test]
fn test_validate_submission_rejects_blank_phone() {
    let day: Date = date!(2025 - 07 - 10);
    let mut submission: BookingSubmission = create_test_submission(day, 2);
    submission.phone = String::new();

    let result = validate_submission(
        &submission,
        &create_availability(day, 100, 0, false),
        TODAY,
    );
    assert_eq!(result, Err(DomainError::MissingRequiredField("phone")));
}

#[test]
fn test_validate_submission_allows_missing_email() {
    let day: Date = date!(2025 - 07 - 10);
    let mut submission: BookingSubmission = create_test_submission(day, 2);
    submission.email = None;
    assert!(
        validate_submission(
            &submission,
            &create_availability(day, 100, 0, false),
            TODAY
        )
        .is_ok()
    );

    submission.email = Some(String::from("  "));
    assert!(
        validate_submission(
            &submission,
            &create_availability(day, 100, 0, false),
            TODAY
        )
        .is_ok()
    );
}

#[test]
fn test_validate_submission_rejects_malformed_email() {
    let day: Date = date!(2025 - 07 - 10);
    for bad in ["mario", "@example.it", "mario@"] {
        let mut submission: BookingSubmission = create_test_submission(day, 2);
        submission.email = Some(bad.to_string());
        let result = validate_submission(
            &submission,
            &create_availability(day, 100, 0, false),
            TODAY,
        );
        assert!(matches!(result, Err(DomainError::InvalidEmail(_))), "{bad}");
    }
}

#[test]
fn test_validate_submission_checks_past_before_sold_out() {
    let day: Date = date!(2025 - 07 - 01);
    let result = validate_submission(
        &create_test_submission(day, 2),
        &create_availability(day, 100, 100, true),
        TODAY,
    );
    assert!(matches!(result, Err(DomainError::InvalidDate { .. })));
}

#[test]
fn test_validate_manual_booking_skips_capacity_and_past_checks() {
    let season: OperatingSeason = create_test_season();
    // Past relative to any plausible today, and far beyond any seat cap
    let submission: BookingSubmission = create_test_submission(date!(2025 - 07 - 01), 500);
    assert!(validate_manual_booking(&submission, &season).is_ok());
}

#[test]
fn test_validate_manual_booking_rejects_closed_day() {
    let season: OperatingSeason = create_test_season();
    let submission: BookingSubmission = create_test_submission(date!(2025 - 07 - 07), 2);
    assert!(matches!(
        validate_manual_booking(&submission, &season),
        Err(DomainError::InvalidDate { .. })
    ));
}

#[test]
fn test_validate_manual_booking_rejects_zero_seats_and_blank_name() {
    let season: OperatingSeason = create_test_season();
    let zero: BookingSubmission = create_test_submission(date!(2025 - 07 - 10), 0);
    assert!(matches!(
        validate_manual_booking(&zero, &season),
        Err(DomainError::SeatsOutOfRange { .. })
    ));

    let mut unnamed: BookingSubmission = create_test_submission(date!(2025 - 07 - 10), 2);
    unnamed.name = String::new();
    assert_eq!(
        validate_manual_booking(&unnamed, &season),
        Err(DomainError::MissingRequiredField("name"))
    );
}

#[test]
fn test_validate_seat_cap() {
    assert!(validate_seat_cap(1).is_ok());
    assert!(validate_seat_cap(MAX_SEATS).is_ok());
    assert_eq!(validate_seat_cap(0), Err(DomainError::InvalidSeatCap(0)));
    assert_eq!(
        validate_seat_cap(MAX_SEATS + 1),
        Err(DomainError::InvalidSeatCap(MAX_SEATS + 1))
    );
}

#[test]
fn test_validate_manual_booking_rejects_more_than_max_seats() {
    let season: OperatingSeason = create_test_season();

    let largest: BookingSubmission = create_test_submission(date!(2025 - 07 - 10), MAX_SEATS);
    assert!(validate_manual_booking(&largest, &season).is_ok());

    let oversized: BookingSubmission =
        create_test_submission(date!(2025 - 07 - 10), 3_000_000_000);
    assert_eq!(
        validate_manual_booking(&oversized, &season),
        Err(DomainError::SeatsOutOfRange {
            requested: 3_000_000_000,
            available: MAX_SEATS,
        })
    );
}
