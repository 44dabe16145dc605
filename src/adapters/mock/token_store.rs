//! In-memory token store for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::traits::{TokenStore, TokenStoreError};

/// In-memory token store.
///
/// Clones share the same storage, so a test can keep a handle and inspect
/// what the session flow persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
    save_should_fail: Arc<Mutex<bool>>,
    load_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `token`.
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        store.set_token(Some(token.to_string()));
        store
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether load should fail.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    /// Get the current token synchronously (for assertions).
    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    /// Set the token synchronously (for test setup).
    pub fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> Result<Option<String>, TokenStoreError> {
        if *self.load_should_fail.lock().unwrap() {
            return Err(TokenStoreError::LoadFailed("Mock load failure".to_string()));
        }
        Ok(self.token())
    }

    async fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(TokenStoreError::SaveFailed("Mock save failure".to_string()));
        }
        self.set_token(Some(token.to_string()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        self.set_token(None);
        Ok(())
    }
}
