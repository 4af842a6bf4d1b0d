// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `bookings` — Booking lookups and date-filtered listings
//! - `day_settings` — Per-day seat cap and sold-out lookups

pub mod bookings;
pub mod day_settings;

pub use bookings::{
    get_booking_by_code, list_bookings, list_bookings_between, list_bookings_for_date,
};
pub use day_settings::{get_day_setting, list_day_settings};
