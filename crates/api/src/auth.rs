// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admin authentication.
//!
//! Credentials are checked by an injected [`AdminAuthenticator`]. The stock
//! implementation, [`ConfiguredCredentials`], takes a username and password
//! from configuration and keeps only a bcrypt hash of the password. A
//! successful login opens a session in the in-memory [`SessionRegistry`];
//! sessions expire after a fixed time-to-live and are lost on restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Minimum length of the configured admin password.
pub const MIN_ADMIN_PASSWORD_LENGTH: usize = 8;

/// Default lifetime of an admin session.
pub const DEFAULT_SESSION_TTL: Duration = Duration::hours(8);

/// Problems with the configured admin credentials.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    /// The username is blank.
    #[error("Admin username must not be empty")]
    EmptyUsername,

    /// The password is too short.
    #[error("Admin password must be at least {min_length} characters long")]
    PasswordTooShort { min_length: usize },

    /// The password could not be hashed.
    #[error("Failed to hash admin password: {0}")]
    Hashing(String),
}

/// Verifies admin credentials.
///
/// Implementations decide where credentials come from; handlers only see
/// this trait.
pub trait AdminAuthenticator: Send + Sync {
    /// Checks a username and password.
    ///
    /// # Returns
    ///
    /// The canonical username on success.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the credentials do not match.
    fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError>;
}

/// A single admin account taken from configuration.
pub struct ConfiguredCredentials {
    username: String,
    password_hash: String,
}

impl ConfiguredCredentials {
    /// Creates credentials, hashing the password with bcrypt's default cost.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is blank, the password is too short,
    /// or hashing fails.
    pub fn new(username: &str, password: &str) -> Result<Self, CredentialsError> {
        Self::with_cost(username, password, bcrypt::DEFAULT_COST)
    }

    /// Creates credentials, hashing the password with an explicit bcrypt cost.
    ///
    /// # Arguments
    ///
    /// * `username` - The admin login name
    /// * `password` - The plain-text password; only its hash is kept
    /// * `cost` - The bcrypt cost factor (4..=31)
    ///
    /// # Errors
    ///
    /// Returns an error if the username is blank, the password is too short,
    /// or hashing fails.
    pub fn with_cost(username: &str, password: &str, cost: u32) -> Result<Self, CredentialsError> {
        let username: &str = username.trim();
        if username.is_empty() {
            return Err(CredentialsError::EmptyUsername);
        }
        if password.chars().count() < MIN_ADMIN_PASSWORD_LENGTH {
            return Err(CredentialsError::PasswordTooShort {
                min_length: MIN_ADMIN_PASSWORD_LENGTH,
            });
        }

        let password_hash: String = bcrypt::hash(password, cost)
            .map_err(|e| CredentialsError::Hashing(e.to_string()))?;

        Ok(Self {
            username: username.to_string(),
            password_hash,
        })
    }

    /// Returns the configured username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for ConfiguredCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl AdminAuthenticator for ConfiguredCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Result<String, AuthError> {
        // Same message for both failures so the username cannot be probed
        let rejected = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid username or password"),
        };

        if username.trim() != self.username {
            return Err(rejected());
        }

        match bcrypt::verify(password, &self.password_hash) {
            Ok(true) => Ok(self.username.clone()),
            Ok(false) => Err(rejected()),
            Err(e) => {
                warn!(error = %e, "Stored admin password hash could not be verified");
                Err(rejected())
            }
        }
    }
}

/// An admin with a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAdmin {
    /// The admin's username.
    pub username: String,
    /// When the session ends.
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
struct Session {
    username: String,
    expires_at: OffsetDateTime,
}

/// In-memory store of admin sessions keyed by opaque token.
#[derive(Debug)]
pub struct SessionRegistry {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionRegistry {
    /// Creates an empty registry whose sessions live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the session lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        // The map holds no invariants a panicking writer could break
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a session for `username`.
    ///
    /// # Returns
    ///
    /// The new token and the session's expiry.
    pub fn create(&self, username: &str, now: OffsetDateTime) -> (String, OffsetDateTime) {
        let token: String = generate_session_token();
        let expires_at: OffsetDateTime = now + self.ttl;
        self.lock().insert(
            token.clone(),
            Session {
                username: username.to_string(),
                expires_at,
            },
        );
        debug!(username, %expires_at, "Admin session created");
        (token, expires_at)
    }

    /// Looks up a live session.
    ///
    /// An expired session is removed as a side effect.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the token is unknown or expired.
    pub fn validate(&self, token: &str, now: OffsetDateTime) -> Result<AuthenticatedAdmin, AuthError> {
        let mut sessions = self.lock();
        let session: Session =
            sessions
                .get(token)
                .cloned()
                .ok_or_else(|| AuthError::AuthenticationFailed {
                    reason: String::from("Invalid session token"),
                })?;

        if now >= session.expires_at {
            sessions.remove(token);
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        Ok(AuthenticatedAdmin {
            username: session.username,
            expires_at: session.expires_at,
        })
    }

    /// Ends a session.
    ///
    /// # Returns
    ///
    /// `true` if the token belonged to a session.
    pub fn revoke(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }

    /// Drops every expired session.
    ///
    /// # Returns
    ///
    /// The number of sessions removed.
    pub fn purge_expired(&self, now: OffsetDateTime) -> usize {
        let mut sessions = self.lock();
        let before: usize = sessions.len();
        sessions.retain(|_, session| now < session.expires_at);
        before - sessions.len()
    }

    /// Returns the number of stored sessions, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether no sessions are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Generates an opaque 128-bit session token in hex.
fn generate_session_token() -> String {
    format!("{:016x}{:016x}", rand::random::<u64>(), rand::random::<u64>())
}

/// Login, session validation, and logout on top of an authenticator and a registry.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Authenticates an admin and opens a session.
    ///
    /// # Arguments
    ///
    /// * `authenticator` - The credential check
    /// * `sessions` - The session registry
    /// * `username` - The submitted username
    /// * `password` - The submitted password
    /// * `now` - The current instant
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_admin`)
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails.
    pub fn login(
        authenticator: &dyn AdminAuthenticator,
        sessions: &SessionRegistry,
        username: &str,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<(String, AuthenticatedAdmin), AuthError> {
        let canonical: String = match authenticator.authenticate(username, password) {
            Ok(name) => name,
            Err(e) => {
                warn!(username, "Admin login rejected");
                return Err(e);
            }
        };

        let purged: usize = sessions.purge_expired(now);
        if purged > 0 {
            debug!(purged, "Purged expired admin sessions");
        }

        let (token, expires_at) = sessions.create(&canonical, now);
        info!(username = %canonical, "Admin logged in");

        Ok((
            token,
            AuthenticatedAdmin {
                username: canonical,
                expires_at,
            },
        ))
    }

    /// Validates a session token and returns the authenticated admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired.
    pub fn validate_session(
        sessions: &SessionRegistry,
        session_token: &str,
        now: OffsetDateTime,
    ) -> Result<AuthenticatedAdmin, AuthError> {
        sessions.validate(session_token, now)
    }

    /// Logs out by removing the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the token does not belong to a session.
    pub fn logout(sessions: &SessionRegistry, session_token: &str) -> Result<(), AuthError> {
        if sessions.revoke(session_token) {
            info!("Admin logged out");
            Ok(())
        } else {
            Err(AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })
        }
    }
}
