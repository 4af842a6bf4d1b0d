// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Buffered day-setting edits.
//!
//! Staff edit seat caps and sold-out flags for several days, then save them
//! together. Edits are collected here keyed by date; a later edit to the same
//! field of the same date replaces the earlier one, while edits to different
//! fields merge.

use crate::error::DomainError;
use crate::validation::validate_seat_cap;
use std::collections::BTreeMap;
use time::Date;

/// The edits recorded for one date. `None` leaves the field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DaySettingChange {
    /// New seat cap, if changed.
    pub seat_cap: Option<u32>,
    /// New sold-out flag, if changed.
    pub is_sold_out: Option<bool>,
}

impl DaySettingChange {
    /// Returns whether this change touches no field.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.seat_cap.is_none() && self.is_sold_out.is_none()
    }

    /// Folds `other` into `self`; fields set in `other` win.
    pub const fn merge(&mut self, other: Self) {
        if let Some(seat_cap) = other.seat_cap {
            self.seat_cap = Some(seat_cap);
        }
        if let Some(is_sold_out) = other.is_sold_out {
            self.is_sold_out = Some(is_sold_out);
        }
    }
}

/// Pending day-setting changes, ordered by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChanges {
    changes: BTreeMap<Date, DaySettingChange>,
}

impl PendingChanges {
    /// Creates an empty set of changes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new seat cap for `date`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSeatCap` if `seat_cap` is zero or above
    /// [`MAX_SEATS`](crate::MAX_SEATS). Nothing is recorded in that case.
    pub fn set_seat_cap(&mut self, date: Date, seat_cap: u32) -> Result<(), DomainError> {
        validate_seat_cap(seat_cap)?;
        self.record(
            date,
            DaySettingChange {
                seat_cap: Some(seat_cap),
                is_sold_out: None,
            },
        );
        Ok(())
    }

    /// Records a new sold-out flag for `date`.
    pub fn set_sold_out(&mut self, date: Date, is_sold_out: bool) {
        self.record(
            date,
            DaySettingChange {
                seat_cap: None,
                is_sold_out: Some(is_sold_out),
            },
        );
    }

    /// Records a combined change for `date`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSeatCap` if the change carries a cap outside
    /// `1..=MAX_SEATS`.
    pub fn insert(&mut self, date: Date, change: DaySettingChange) -> Result<(), DomainError> {
        if let Some(seat_cap) = change.seat_cap {
            validate_seat_cap(seat_cap)?;
        }
        self.record(date, change);
        Ok(())
    }

    /// Drops any pending edit for `date`.
    pub fn discard(&mut self, date: Date) -> Option<DaySettingChange> {
        self.changes.remove(&date)
    }

    /// Returns the pending edit for `date`, if any.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<&DaySettingChange> {
        self.changes.get(&date)
    }

    /// Iterates the pending edits in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (Date, DaySettingChange)> + '_ {
        self.changes.iter().map(|(date, change)| (*date, *change))
    }

    /// Returns the number of dates with pending edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns whether there are no pending edits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn record(&mut self, date: Date, change: DaySettingChange) {
        if change.is_noop() {
            return;
        }
        self.changes.entry(date).or_default().merge(change);
    }
}
