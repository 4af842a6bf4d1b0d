// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seat availability calculation.
//!
//! This module provides read-only aggregation of bookings and day settings
//! to compute per-day seat accounting. Nothing here performs I/O.

use crate::types::{Booking, DayAvailability, DaySetting};
use std::collections::{BTreeMap, HashMap};
use time::Date;

/// Calculates availability for a single day.
///
/// # Arguments
///
/// * `date` - The day being computed
/// * `bookings_for_date` - The live bookings on that day
/// * `setting` - The explicit day setting, if one exists
/// * `default_seat_cap` - The cap used when no setting exists
///
/// # Returns
///
/// A `DayAvailability` where:
/// - `booked_seats` is the (saturating) sum of seats
/// - `available_seats` is clamped at zero when the cap was lowered below
///   the booked total; existing bookings stay valid
/// - `is_sold_out` is the manual flag OR no seats remain
pub fn compute_availability<'a, I>(
    date: Date,
    bookings_for_date: I,
    setting: Option<&DaySetting>,
    default_seat_cap: u32,
) -> DayAvailability
where
    I: IntoIterator<Item = &'a Booking>,
{
    let booked_seats: u32 = bookings_for_date
        .into_iter()
        .fold(0_u32, |acc, booking| acc.saturating_add(booking.seats));

    let (total_seats, flagged_sold_out): (u32, bool) =
        setting.map_or((default_seat_cap, false), |s| (s.seat_cap, s.is_sold_out));

    let available_seats: u32 = total_seats.saturating_sub(booked_seats);

    DayAvailability {
        date,
        total_seats,
        booked_seats,
        available_seats,
        is_sold_out: flagged_sold_out || available_seats == 0,
    }
}

/// Calculates availability for every given date from one batched read.
///
/// Bookings are grouped by date in memory, so callers can fetch the whole
/// season with a single query instead of one query per date. Bookings on
/// dates not listed in `dates` are ignored.
///
/// # Arguments
///
/// * `dates` - The dates to compute (usually the operating dates)
/// * `bookings` - All live bookings covering those dates
/// * `settings` - All explicit day settings
/// * `default_seat_cap` - The cap used when no setting exists
#[must_use]
pub fn compute_season_availability(
    dates: &[Date],
    bookings: &[Booking],
    settings: &[DaySetting],
    default_seat_cap: u32,
) -> BTreeMap<Date, DayAvailability> {
    let mut by_date: HashMap<Date, Vec<&Booking>> = HashMap::new();
    for booking in bookings {
        by_date.entry(booking.date).or_default().push(booking);
    }

    let settings_by_date: HashMap<Date, &DaySetting> =
        settings.iter().map(|s| (s.date, s)).collect();

    dates
        .iter()
        .map(|date| {
            let day_bookings: &[&Booking] =
                by_date.get(date).map(Vec::as_slice).unwrap_or_default();
            let availability: DayAvailability = compute_availability(
                *date,
                day_bookings.iter().copied(),
                settings_by_date.get(date).copied(),
                default_seat_cap,
            );
            (*date, availability)
        })
        .collect()
}
