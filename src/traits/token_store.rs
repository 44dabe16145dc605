//! Access-token storage trait abstraction.
//!
//! The platform persists exactly one value on the client: the bearer token
//! returned by the login endpoint. This trait hides where it lives so the
//! session flow can be tested without touching the file system.

use async_trait::async_trait;

/// Token storage errors.
#[derive(Debug, Clone)]
pub enum TokenStoreError {
    /// Failed to load the token
    LoadFailed(String),
    /// Failed to save the token
    SaveFailed(String),
    /// Failed to clear the token
    ClearFailed(String),
    /// Serialization/deserialization error
    Serialization(String),
}

impl std::fmt::Display for TokenStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenStoreError::LoadFailed(msg) => write!(f, "Failed to load token: {}", msg),
            TokenStoreError::SaveFailed(msg) => write!(f, "Failed to save token: {}", msg),
            TokenStoreError::ClearFailed(msg) => write!(f, "Failed to clear token: {}", msg),
            TokenStoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for TokenStoreError {}

/// Trait for access-token storage and retrieval.
///
/// Implementations include the file-based store used by the CLI and an
/// in-memory store for tests.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored token.
    ///
    /// # Returns
    /// - `Ok(Some(token))` if a token is stored
    /// - `Ok(None)` if nothing is stored
    /// - `Err(error)` if loading failed
    async fn load(&self) -> Result<Option<String>, TokenStoreError>;

    /// Persist `token`, replacing any previous value.
    async fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    /// Remove the stored token. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), TokenStoreError>;
}
