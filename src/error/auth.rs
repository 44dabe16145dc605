//! Authentication-related error types.

use std::fmt;

/// Authentication-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// The login endpoint rejected the email/password pair.
    InvalidCredentials { status: u16, message: String },

    /// No token is stored (user not logged in).
    NotAuthenticated,

    /// A token was issued or stored, but `auth/me` did not accept it.
    SessionRejected { message: String },
}

impl AuthError {
    /// Check if this error might be resolved by signing in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated | AuthError::SessionRejected { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials { .. } => {
                "Incorrect email or password.".to_string()
            }
            AuthError::NotAuthenticated => {
                "You are not signed in. Please sign in to continue.".to_string()
            }
            AuthError::SessionRejected { .. } => {
                "Your session could not be validated. Please sign in again.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials { .. } => "E_AUTH_INVALID",
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
            AuthError::SessionRejected { .. } => "E_AUTH_REJECTED",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials { status, message } => {
                write!(f, "Login rejected ({}): {}", status, message)
            }
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::SessionRejected { message } => {
                write!(f, "Session rejected: {}", message)
            }
        }
    }
}

impl std::error::Error for AuthError {}
