//! Backend clients.
//!
//! Two [`ApiClient`]s exist per process: one for the REST backend and one for
//! the analytics service. Both share the transport and the token store.

mod client;
pub mod endpoints;

pub use client::{status_error, ApiClient, QueryParams};

use std::sync::Arc;

use crate::adapters::{FileTokenStore, ReqwestHttpClient};
use crate::config::ClientConfig;
use crate::error::{NetworkError, PgeResult};
use crate::traits::{HttpClient, TokenStore};

/// The pair of backend clients built from one [`ClientConfig`].
#[derive(Clone)]
pub struct ApiClients {
    pub api: Arc<ApiClient>,
    pub analytics: Arc<ApiClient>,
}

impl ApiClients {
    /// Build both clients over the given transport and token store. The
    /// Host override only applies to the REST backend.
    pub fn new(
        config: &ClientConfig,
        http: Arc<dyn HttpClient>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        let api = ApiClient::new(config.api_base_url.clone(), http.clone(), tokens.clone())
            .with_host_override(config.host_override.clone());
        let analytics = ApiClient::new(config.analytics_base_url.clone(), http, tokens);

        Self {
            api: Arc::new(api),
            analytics: Arc::new(analytics),
        }
    }

    /// Production wiring: reqwest transport with the configured timeouts and
    /// the file token store at the configured path.
    pub fn from_config(config: &ClientConfig) -> PgeResult<Self> {
        let http = ReqwestHttpClient::with_timeouts(config.connect_timeout, config.request_timeout)
            .map_err(|e| NetworkError::Other {
                message: e.to_string(),
            })?;
        let tokens = FileTokenStore::new(config.token_path.clone());
        Ok(Self::new(config, Arc::new(http), Arc::new(tokens)))
    }

    /// The token store shared by both clients.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        self.api.token_store().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryTokenStore, MockHttpClient};
    use serde_json::json;

    #[tokio::test]
    async fn test_host_override_only_on_rest_backend() {
        let config = ClientConfig::default().with_host_override("pge.local");
        let http = Arc::new(MockHttpClient::new());
        let clients = ApiClients::new(&config, http.clone(), Arc::new(InMemoryTokenStore::new()));
        http.set_json("http://10.0.2.2:8000/api/dependencias", 200, json!([]));
        http.set_json("http://10.0.2.2:8001/catalogos/sectores", 200, json!([]));

        let _: Vec<serde_json::Value> = clients.api.get_json(endpoints::DEPENDENCIES, &[]).await.unwrap();
        let _: Vec<serde_json::Value> = clients.analytics.get_json(endpoints::SECTORS, &[]).await.unwrap();

        let requests = http.get_requests();
        assert_eq!(requests[0].headers.get("Host").map(String::as_str), Some("pge.local"));
        assert!(!requests[1].headers.contains_key("Host"));
    }

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::default().with_token_path(dir.path().join("token.json"));
        let clients = ApiClients::from_config(&config).unwrap();
        assert_eq!(clients.api.base_url(), "http://10.0.2.2:8000/api");
        assert_eq!(clients.analytics.base_url(), "http://10.0.2.2:8001");
    }
}
