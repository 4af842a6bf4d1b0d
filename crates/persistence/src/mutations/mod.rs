// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `bookings` — Booking inserts and deletions
//! - `day_settings` — Day setting upserts and sold-out resets
//!
//! Multi-step operations (reservation, reset) are composed into
//! transactions by the `Persistence` adapter in `lib.rs`.

pub mod bookings;
pub mod day_settings;

pub use bookings::{delete_booking_by_code, delete_bookings_for_date, insert_booking};
pub use day_settings::{clear_sold_out, upsert_day_setting};
