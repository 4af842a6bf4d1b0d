// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use prenota_domain::OperatingSeason;
use prenota_persistence::Persistence;
use time::Weekday;
use time::macros::{date, datetime};

use crate::auth::AuthenticatedAdmin;
use crate::clock::FixedClock;
use crate::request_response::SubmitBookingRequest;

/// Tuesday 1 July 2025, mid-morning in Italy.
pub fn create_test_clock() -> FixedClock {
    FixedClock::new(datetime!(2025-07-01 10:00 +02:00))
}

/// 30 June to 27 July 2025, closed on Mondays, 150 seats.
pub fn create_test_season() -> OperatingSeason {
    OperatingSeason::new(
        date!(2025 - 06 - 30),
        date!(2025 - 07 - 27),
        Weekday::Monday,
        150,
    )
    .unwrap()
}

pub fn create_test_admin() -> AuthenticatedAdmin {
    AuthenticatedAdmin {
        username: String::from("admin"),
        expires_at: datetime!(2025-07-01 18:00 +02:00),
    }
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_booking_request(date: &str, seats: u32) -> SubmitBookingRequest {
    SubmitBookingRequest {
        date: String::from(date),
        seats,
        name: String::from("Maria Rossi"),
        phone: String::from("+39 333 1234567"),
        email: Some(String::from("maria@example.it")),
        notes: None,
    }
}
