//! Shared request plumbing for both backends.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{NetworkError, PgeResult};
use crate::traits::{Headers, HttpClient, MultipartFile, Response, TokenStore};

/// Query parameters; `None` values are left out of the URL.
pub type QueryParams<'a> = [(&'a str, Option<String>)];

/// HTTP client bound to one backend.
///
/// Every request carries `Accept: application/json`, the stored Bearer token
/// when there is one, and the configured `Host` override. Non-2xx responses
/// become [`NetworkError::HttpStatus`]; bodies that do not decode become
/// [`NetworkError::InvalidResponse`].
pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenStore>,
    host_override: Option<String>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            tokens,
            host_override: None,
        }
    }

    /// Send `Host: <host>` on every request.
    pub fn with_host_override(mut self, host: Option<String>) -> Self {
        self.host_override = host;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn host_override(&self) -> Option<&str> {
        self.host_override.as_deref()
    }

    /// The store the Bearer token is read from.
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Absolute URL for `path` with the non-`None` query pairs appended,
    /// percent-encoded, in order.
    pub fn url(&self, path: &str, query: &QueryParams<'_>) -> String {
        let mut url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let pairs: Vec<String> = query
            .iter()
            .filter_map(|(key, value)| {
                value.as_ref().map(|v| {
                    format!("{}={}", urlencoding::encode(key), urlencoding::encode(v))
                })
            })
            .collect();
        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        url
    }

    async fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        match self.tokens.load().await {
            Ok(Some(token)) => {
                headers.insert("Authorization".to_string(), format!("Bearer {}", token));
            }
            Ok(None) => {}
            Err(e) => warn!("Could not read stored token, sending request without it: {}", e),
        }

        if let Some(ref host) = self.host_override {
            headers.insert("Host".to_string(), host.clone());
        }
        headers
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams<'_>,
    ) -> PgeResult<T> {
        let url = self.url(path, query);
        let headers = self.headers().await;
        debug!(url = %url, "GET");

        let response = self
            .http
            .get(&url, &headers)
            .await
            .map_err(|e| NetworkError::from_http_error(e, &url))?;
        Ok(decode(&url, &response)?)
    }

    /// POST `body` as JSON to `path` and decode the JSON reply.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> PgeResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (url, response) = self.send_json(path, body).await?;
        Ok(decode(&url, &response)?)
    }

    /// POST `body` as JSON to `path`. Any 2xx reply is returned as is,
    /// without looking at its body.
    pub async fn post(&self, path: &str, body: &(impl Serialize + ?Sized)) -> PgeResult<Response> {
        let (url, response) = self.send_json(path, body).await?;
        if !response.is_success() {
            debug!(url = %url, status = response.status, "Request failed");
            return Err(status_error(&response).into());
        }
        Ok(response)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> PgeResult<(String, Response)> {
        let url = self.url(path, &[]);
        let payload = serde_json::to_string(body).map_err(|e| NetworkError::Other {
            message: format!("Failed to encode request body: {}", e),
        })?;
        let mut headers = self.headers().await;
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        debug!(url = %url, "POST");

        let response = self
            .http
            .post(&url, &payload, &headers)
            .await
            .map_err(|e| NetworkError::from_http_error(e, &url))?;
        Ok((url, response))
    }

    /// POST a single-file multipart form. The raw response is returned
    /// whatever its status, so callers can read error payloads.
    pub async fn post_multipart(&self, path: &str, file: &MultipartFile) -> PgeResult<Response> {
        let url = self.url(path, &[]);
        let headers = self.headers().await;
        debug!(url = %url, bytes = file.data.len(), "POST multipart");

        let response = self
            .http
            .post_multipart(&url, file, &headers)
            .await
            .map_err(|e| NetworkError::from_http_error(e, &url))?;
        Ok(response)
    }
}

/// The error a non-2xx response maps to. The message is the body text, or
/// "Unknown error" when the body is empty or not UTF-8.
pub fn status_error(response: &Response) -> NetworkError {
    let message = response
        .text()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or("Unknown error")
        .to_string();
    NetworkError::HttpStatus {
        status: response.status,
        message,
    }
}

fn decode<T: DeserializeOwned>(url: &str, response: &Response) -> Result<T, NetworkError> {
    if !response.is_success() {
        debug!(url = %url, status = response.status, "Request failed");
        return Err(status_error(response));
    }

    response.json().map_err(|e| {
        warn!(url = %url, "Undecodable response body: {}", e);
        NetworkError::InvalidResponse {
            message: e.to_string(),
        }
    })
}
