//! Unified error type for the PGE client.

use std::fmt;

use super::auth::AuthError;
use super::network::NetworkError;
use crate::traits::TokenStoreError;

/// Unified error type returned by repositories and state holders.
#[derive(Debug, Clone)]
pub enum PgeError {
    /// Request-level failures against either backend.
    Network(NetworkError),

    /// Login / session failures.
    Auth(AuthError),

    /// The local token could not be read or written.
    TokenStore(TokenStoreError),

    /// Input rejected before any request was made.
    Validation { message: String },

    /// The owning task was cancelled before the action finished.
    Cancelled,
}

impl PgeError {
    /// Shorthand for a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        PgeError::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            PgeError::Network(err) => err.user_message(),
            PgeError::Auth(err) => err.user_message(),
            PgeError::TokenStore(_) => {
                "Could not access the stored session. Please sign in again.".to_string()
            }
            PgeError::Validation { message } => message.clone(),
            PgeError::Cancelled => "The operation was cancelled.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            PgeError::Network(err) => err.error_code(),
            PgeError::Auth(err) => err.error_code(),
            PgeError::TokenStore(_) => "E_TOKEN_STORE",
            PgeError::Validation { .. } => "E_VALIDATION",
            PgeError::Cancelled => "E_CANCELLED",
        }
    }

    /// Whether the server could not be reached at all.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, PgeError::Network(err) if err.is_connection_error())
    }

    /// Whether this failure means the stored token is no longer usable.
    pub fn requires_reauth(&self) -> bool {
        match self {
            PgeError::Auth(err) => err.requires_reauth(),
            PgeError::Network(NetworkError::HttpStatus { status: 401, .. }) => true,
            _ => false,
        }
    }

    /// Whether the action was cancelled rather than failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            PgeError::Cancelled | PgeError::Network(NetworkError::Cancelled)
        )
    }
}

impl fmt::Display for PgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PgeError::Network(err) => write!(f, "{}", err),
            PgeError::Auth(err) => write!(f, "{}", err),
            PgeError::TokenStore(err) => write!(f, "{}", err),
            PgeError::Validation { message } => write!(f, "Invalid input: {}", message),
            PgeError::Cancelled => write!(f, "Operation cancelled"),
        }
    }
}

impl std::error::Error for PgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PgeError::Network(err) => Some(err),
            PgeError::Auth(err) => Some(err),
            PgeError::TokenStore(err) => Some(err),
            PgeError::Validation { .. } | PgeError::Cancelled => None,
        }
    }
}

// ============================================================================
// From implementations for automatic error conversion
// ============================================================================

impl From<NetworkError> for PgeError {
    fn from(err: NetworkError) -> Self {
        PgeError::Network(err)
    }
}

impl From<AuthError> for PgeError {
    fn from(err: AuthError) -> Self {
        PgeError::Auth(err)
    }
}

impl From<TokenStoreError> for PgeError {
    fn from(err: TokenStoreError) -> Self {
        PgeError::TokenStore(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_connection_error_detection() {
        let err: PgeError = NetworkError::ConnectionFailed {
            url: "http://10.0.2.2:8000/api/dashboard".to_string(),
            message: "refused".to_string(),
        }
        .into();
        assert!(err.is_connection_error());

        let err: PgeError = NetworkError::HttpStatus {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert!(!err.is_connection_error());
    }

    #[test]
    fn test_requires_reauth() {
        let unauthorized: PgeError = NetworkError::HttpStatus {
            status: 401,
            message: "Unauthenticated.".to_string(),
        }
        .into();
        assert!(unauthorized.requires_reauth());

        let forbidden: PgeError = NetworkError::HttpStatus {
            status: 403,
            message: "Forbidden".to_string(),
        }
        .into();
        assert!(!forbidden.requires_reauth());

        assert!(PgeError::from(AuthError::NotAuthenticated).requires_reauth());
    }

    #[test]
    fn test_cancelled() {
        assert!(PgeError::Cancelled.is_cancelled());
        assert!(PgeError::from(NetworkError::Cancelled).is_cancelled());
        assert!(!PgeError::validation("x").is_cancelled());
    }

    #[test]
    fn test_source_chain() {
        let err: PgeError = TokenStoreError::SaveFailed("disk full".to_string()).into();
        assert!(err.source().is_some());
        assert!(PgeError::Cancelled.source().is_none());
    }

    #[test]
    fn test_validation_message_passthrough() {
        let err = PgeError::validation("Select a dependency first.");
        assert_eq!(err.user_message(), "Select a dependency first.");
        assert_eq!(err.error_code(), "E_VALIDATION");
    }
}
