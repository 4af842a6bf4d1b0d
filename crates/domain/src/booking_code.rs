// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Short human-communicable booking codes.
//!
//! Codes are 5 symbols drawn uniformly from `A-Z0-9` (36^5, about 60 million
//! combinations). The generator does not check for collisions; the store
//! enforces uniqueness with a unique index.

use crate::error::DomainError;

/// The symbols a booking code may contain.
pub const CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// The fixed length of a booking code.
pub const CODE_LENGTH: usize = 5;

/// A validated booking code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookingCode {
    value: String,
}

impl BookingCode {
    /// Generates a fresh random code.
    #[must_use]
    pub fn generate() -> Self {
        let value: String = (0..CODE_LENGTH)
            .map(|_| char::from(CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())]))
            .collect();
        Self { value }
    }

    /// Parses user input into a code.
    ///
    /// Input is trimmed and upper-cased before validation, so customers may
    /// type codes in any case.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBookingCode` if the normalized input is not
    /// exactly 5 characters from `A-Z0-9`.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let value: String = input.trim().to_ascii_uppercase();
        let well_formed: bool = value.len() == CODE_LENGTH
            && value.bytes().all(|b| CODE_ALPHABET.contains(&b));
        if !well_formed {
            return Err(DomainError::InvalidBookingCode(input.to_string()));
        }
        Ok(Self { value })
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for BookingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}
