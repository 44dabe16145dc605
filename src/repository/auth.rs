//! Login, current-user lookup and token persistence.

use std::sync::Arc;
use tracing::debug;

use crate::api::{endpoints, ApiClient};
use crate::error::{AuthError, NetworkError, PgeError, PgeResult};
use crate::models::{LoginRequest, LoginResponse, User};

pub struct AuthRepository {
    api: Arc<ApiClient>,
}

impl AuthRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// POST the credentials. A non-2xx reply becomes
    /// [`AuthError::InvalidCredentials`]; transport failures pass through.
    pub async fn login(&self, email: &str, password: &str) -> PgeResult<LoginResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        self.api
            .post_json(endpoints::LOGIN, &request)
            .await
            .map_err(|err| match err {
                PgeError::Network(NetworkError::HttpStatus { status, message }) => {
                    AuthError::InvalidCredentials { status, message }.into()
                }
                other => other,
            })
    }

    /// Resolve the stored token to a user.
    pub async fn current_user(&self) -> PgeResult<User> {
        self.api.get_json(endpoints::CURRENT_USER, &[]).await
    }

    pub async fn stored_token(&self) -> PgeResult<Option<String>> {
        Ok(self.api.token_store().load().await?)
    }

    pub async fn save_token(&self, token: &str) -> PgeResult<()> {
        debug!("Persisting access token");
        Ok(self.api.token_store().save(token).await?)
    }

    pub async fn clear_token(&self) -> PgeResult<()> {
        debug!("Clearing access token");
        Ok(self.api.token_store().clear().await?)
    }
}
