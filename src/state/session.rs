//! Authentication flow: login, session check on start-up, logout.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::store::{cancellable, Store};
use crate::error::{AuthError, NetworkError, PgeError, PgeResult};
use crate::models::{Session, User};
use crate::repository::AuthRepository;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionStatus {
    #[default]
    LoggedOut,
    LoggedIn(User),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub status: SessionStatus,
    pub loading: bool,
    /// Message of the last failed login. Session checks fail silently.
    pub error: Option<String>,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        matches!(self.status, SessionStatus::LoggedIn(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self.status {
            SessionStatus::LoggedIn(ref user) => Some(user),
            SessionStatus::LoggedOut => None,
        }
    }
}

pub struct SessionController {
    auth: Arc<AuthRepository>,
    state: Store<SessionState>,
}

impl SessionController {
    pub fn new(auth: Arc<AuthRepository>) -> Self {
        Self {
            auth,
            state: Store::default(),
        }
    }

    pub fn state(&self) -> &Store<SessionState> {
        &self.state
    }

    /// Log in and validate the issued token with `auth/me`.
    ///
    /// If either step fails (or the action is cancelled midway) the stored
    /// token is cleared and the session stays logged out.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> PgeResult<Session> {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });

        match cancellable(cancel, self.login_and_validate(email, password)).await {
            Ok(session) => {
                info!(user_id = session.user.id, "Logged in");
                let user = session.user.clone();
                self.state.update(|s| {
                    s.loading = false;
                    s.status = SessionStatus::LoggedIn(user);
                });
                Ok(session)
            }
            Err(err) => {
                warn!("Login failed: {}", err);
                self.discard_token().await;
                let message = (!err.is_cancelled()).then(|| err.user_message());
                self.state.update(|s| {
                    s.loading = false;
                    s.status = SessionStatus::LoggedOut;
                    s.error = message;
                });
                Err(err)
            }
        }
    }

    async fn login_and_validate(&self, email: &str, password: &str) -> PgeResult<Session> {
        let response = self.auth.login(email, password).await?;
        self.auth.save_token(&response.access_token).await?;

        let user = self.auth.current_user().await.map_err(|err| match err {
            PgeError::Network(NetworkError::HttpStatus { status, message }) => {
                AuthError::SessionRejected {
                    message: format!("{} ({})", message, status),
                }
                .into()
            }
            PgeError::Network(NetworkError::InvalidResponse { message }) => {
                AuthError::SessionRejected { message }.into()
            }
            other => other,
        })?;

        Ok(Session {
            access_token: response.access_token,
            token_type: response.token_type,
            user,
        })
    }

    /// Restore the session from a stored token.
    ///
    /// Without a token nothing is requested. A token that `auth/me` does not
    /// accept, for any reason, is cleared and the session ends logged out
    /// without an error message. Returns the user when logged in.
    pub async fn check_session(&self, cancel: &CancellationToken) -> PgeResult<Option<User>> {
        let token = match self.auth.stored_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read stored token: {}", e);
                None
            }
        };

        if token.is_none() {
            self.state.update(|s| s.status = SessionStatus::LoggedOut);
            return Ok(None);
        }

        self.state.update(|s| s.loading = true);
        match cancellable(cancel, self.auth.current_user()).await {
            Ok(user) => {
                info!(user_id = user.id, "Session restored");
                let restored = user.clone();
                self.state.update(|s| {
                    s.loading = false;
                    s.status = SessionStatus::LoggedIn(restored);
                });
                Ok(Some(user))
            }
            Err(PgeError::Cancelled) => {
                self.state.update(|s| s.loading = false);
                Err(PgeError::Cancelled)
            }
            Err(err) => {
                warn!("Stored session rejected ({}): {}", err.error_code(), err);
                self.discard_token().await;
                self.state.update(|s| {
                    s.loading = false;
                    s.status = SessionStatus::LoggedOut;
                });
                Ok(None)
            }
        }
    }

    /// Reset the in-memory session, then clear the stored token.
    pub async fn logout(&self) -> PgeResult<()> {
        self.state.update(|s| *s = SessionState::default());
        info!("Logged out");
        self.auth.clear_token().await
    }

    async fn discard_token(&self) {
        if let Err(e) = self.auth.clear_token().await {
            warn!("Could not clear stored token: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryTokenStore, MockHttpClient, MockResponse};
    use crate::api::ApiClient;
    use crate::traits::{HttpError, Response};
    use bytes::Bytes;
    use serde_json::json;

    const LOGIN_URL: &str = "http://10.0.2.2:8000/api/login";
    const ME_URL: &str = "http://10.0.2.2:8000/api/auth/me";

    fn controller(tokens: InMemoryTokenStore) -> (Arc<MockHttpClient>, SessionController) {
        let http = Arc::new(MockHttpClient::new());
        let api = ApiClient::new("http://10.0.2.2:8000/api", http.clone(), Arc::new(tokens));
        let auth = Arc::new(AuthRepository::new(Arc::new(api)));
        (http, SessionController::new(auth))
    }

    fn login_ok(http: &MockHttpClient) {
        http.set_json(
            LOGIN_URL,
            200,
            json!({"message": "Bienvenido", "acces_token": "tok-1", "token_type": "Bearer", "user": {"id": 7, "name": "Ana"}}),
        );
    }

    #[tokio::test]
    async fn test_login_persists_token_and_fetches_user() {
        let tokens = InMemoryTokenStore::new();
        let (http, controller) = controller(tokens.clone());
        login_ok(&http);
        http.set_json(ME_URL, 200, json!({"id": 7, "name": "Ana", "email": "a@b.com"}));

        let session = controller
            .login("a@b.com", "x", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(session.user.email.as_deref(), Some("a@b.com"));
        assert_eq!(tokens.token().as_deref(), Some("tok-1"));

        let requests = http.get_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].url, ME_URL);
        assert_eq!(requests[1].headers.get("Authorization").unwrap(), "Bearer tok-1");

        let state = controller.state().snapshot();
        assert!(state.is_logged_in());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_login_then_user_lookup_fails() {
        let tokens = InMemoryTokenStore::new();
        let (http, controller) = controller(tokens.clone());
        login_ok(&http);
        http.set_response(
            ME_URL,
            MockResponse::Success(Response::new(401, Bytes::from("Unauthenticated."))),
        );

        let err = controller
            .login("a@b.com", "x", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PgeError::Auth(AuthError::SessionRejected { .. })));
        assert_eq!(tokens.token(), None);
        let state = controller.state().snapshot();
        assert_eq!(state.status, SessionStatus::LoggedOut);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_login_rejected_credentials() {
        let (http, controller) = controller(InMemoryTokenStore::new());
        http.set_response(
            LOGIN_URL,
            MockResponse::Success(Response::new(401, Bytes::from("Credenciales inválidas"))),
        );

        let err = controller
            .login("a@b.com", "bad", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PgeError::Auth(AuthError::InvalidCredentials { .. })));
        assert_eq!(http.get_requests().len(), 1);
        assert_eq!(
            controller.state().snapshot().error.as_deref(),
            Some("Incorrect email or password.")
        );
    }

    #[tokio::test]
    async fn test_check_session_without_token_makes_no_request() {
        let (http, controller) = controller(InMemoryTokenStore::new());

        let user = controller.check_session(&CancellationToken::new()).await.unwrap();

        assert_eq!(user, None);
        assert!(http.get_requests().is_empty());
        assert_eq!(controller.state().snapshot().status, SessionStatus::LoggedOut);
    }

    #[tokio::test]
    async fn test_check_session_with_valid_token() {
        let (http, controller) = controller(InMemoryTokenStore::with_token("tok"));
        http.set_json(ME_URL, 200, json!({"id": 3, "nombre": "Luis"}));

        let user = controller.check_session(&CancellationToken::new()).await.unwrap();

        assert_eq!(user.map(|u| u.name), Some("Luis".to_string()));
        assert!(controller.state().snapshot().is_logged_in());
    }

    #[tokio::test]
    async fn test_check_session_failure_logs_out_silently() {
        let tokens = InMemoryTokenStore::with_token("stale");
        let (http, controller) = controller(tokens.clone());
        http.set_response(
            ME_URL,
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );

        let user = controller.check_session(&CancellationToken::new()).await.unwrap();

        assert_eq!(user, None);
        assert_eq!(tokens.token(), None);
        let state = controller.state().snapshot();
        assert_eq!(state.status, SessionStatus::LoggedOut);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_check_session_cancelled_keeps_token() {
        let tokens = InMemoryTokenStore::with_token("tok");
        let (http, controller) = controller(tokens.clone());
        http.set_response(ME_URL, MockResponse::Pending);

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = controller.check_session(&cancel).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(tokens.token().as_deref(), Some("tok"));
        assert!(!controller.state().snapshot().loading);
    }

    #[tokio::test]
    async fn test_logout() {
        let tokens = InMemoryTokenStore::with_token("tok");
        let (http, controller) = controller(tokens.clone());
        http.set_json(ME_URL, 200, json!({"id": 3, "name": "Luis"}));
        controller.check_session(&CancellationToken::new()).await.unwrap();

        controller.logout().await.unwrap();

        assert_eq!(controller.state().snapshot(), SessionState::default());
        assert_eq!(tokens.token(), None);
    }
}
