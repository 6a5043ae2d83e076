//! Shared primitives for all Rust crates in AcademIA.

#![forbid(unsafe_code)]

/// Authenticated actor identity shared across services.
pub mod auth;
/// Fixed platform role enumeration.
pub mod role;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;
pub use role::Role;

/// Result type used across AcademIA crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant. Rejected before any write.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist in the current snapshot.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but blocked by policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Underlying storage read or write failed.
    #[error("storage error: {0}")]
    Store(String),

    /// A multi-step reinitialization stopped partway; some roles were
    /// rebuilt and others were not.
    #[error(
        "partial completion: role '{failed_role}' failed after {completed} role(s) were rebuilt: {message}",
        completed = .completed_roles.len()
    )]
    PartialCompletion {
        /// Roles whose defaults were rebuilt before the failure.
        completed_roles: Vec<Role>,
        /// Role whose rebuild failed.
        failed_role: Role,
        /// Cause reported by the failing step.
        message: String,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
