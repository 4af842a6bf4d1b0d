// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]


use prenota_domain::{Booking, BookingCode};
use time::macros::datetime;
use time::{Date, OffsetDateTime};

/// A fixed timestamp used for rows created in tests.
pub const TEST_NOW: OffsetDateTime = datetime!(2025-06-15 10:30:00 UTC);

/// Creates an unpersisted booking with a fresh random code.
pub fn create_test_booking(date: Date, seats: u32) -> Booking {
    create_test_booking_with_code(date, seats, BookingCode::generate())
}

/// Creates an unpersisted booking with a specific code.
pub fn create_test_booking_with_code(date: Date, seats: u32, code: BookingCode) -> Booking {
    Booking {
        booking_id: None,
        date,
        seats,
        name: String::from("Mario Rossi"),
        phone: String::from("+39 333 1234567"),
        email: Some(String::from("mario@example.it")),
        notes: None,
        code,
        created_at: TEST_NOW,
    }
}
