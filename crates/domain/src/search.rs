// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::Booking;

/// Returns whether `booking` matches a staff search term.
///
/// The trimmed term is matched case-insensitively as a substring of the
/// booking code, the customer name, or the email address. A blank term
/// matches nothing.
#[must_use]
pub fn booking_matches(booking: &Booking, term: &str) -> bool {
    let needle: String = term.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }

    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    contains(booking.code.as_str())
        || contains(&booking.name)
        || booking.email.as_deref().is_some_and(contains)
}

/// Filters `bookings` down to those matching `term`, keeping their order.
#[must_use]
pub fn search_bookings<'a>(bookings: &'a [Booking], term: &str) -> Vec<&'a Booking> {
    bookings
        .iter()
        .filter(|booking| booking_matches(booking, term))
        .collect()
}
