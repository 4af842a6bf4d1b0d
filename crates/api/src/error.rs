// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use prenota_domain::DomainError;
use prenota_persistence::PersistenceError;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain and store errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The booking store could not be reached or failed.
    StoreUnavailable {
        /// A description of the store failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::StoreUnavailable { message } => {
                write!(f, "Booking store unavailable: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
        }
    }
}

/// Rule name reported for a sold-out day.
pub const RULE_SOLD_OUT: &str = "sold_out";

/// Rule name reported when the cancellation window has closed.
pub const RULE_CANCELLATION_WINDOW: &str = "cancellation_window";

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidDate { .. } => ApiError::DomainRuleViolation {
            rule: String::from("bookable_date"),
            message,
        },
        DomainError::SoldOut { .. } => ApiError::DomainRuleViolation {
            rule: String::from(RULE_SOLD_OUT),
            message,
        },
        DomainError::SeatsOutOfRange { .. } => ApiError::DomainRuleViolation {
            rule: String::from("seats_available"),
            message,
        },
        DomainError::CancellationWindowClosed { .. } => ApiError::DomainRuleViolation {
            rule: String::from(RULE_CANCELLATION_WINDOW),
            message,
        },
        DomainError::ResetNotConfirmed { .. } => ApiError::DomainRuleViolation {
            rule: String::from("reset_confirmation"),
            message,
        },
        DomainError::MissingRequiredField(field) => ApiError::InvalidInput {
            field: field.to_string(),
            message,
        },
        DomainError::InvalidEmail(_) => ApiError::InvalidInput {
            field: String::from("email"),
            message,
        },
        DomainError::InvalidBookingCode(_) => ApiError::InvalidInput {
            field: String::from("code"),
            message,
        },
        DomainError::InvalidSeatCap(_) => ApiError::InvalidInput {
            field: String::from("seat_cap"),
            message,
        },
        DomainError::DateParseError { .. } => ApiError::InvalidInput {
            field: String::from("date"),
            message,
        },
        DomainError::InvalidSeason { .. } => ApiError::Internal { message },
        DomainError::BookingNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Booking"),
            message,
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Store failures surface as `StoreUnavailable`; they are never retried here.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::CorruptRow { .. } | PersistenceError::DuplicateCode(_) => {
            ApiError::Internal {
                message: err.to_string(),
            }
        }
        PersistenceError::DatabaseError(_)
        | PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::InitializationError(_) => ApiError::StoreUnavailable {
            message: err.to_string(),
        },
    }
}
