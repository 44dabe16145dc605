//! Transport seam between the backend clients and the network.
//!
//! Repositories never see reqwest; they talk to an [`HttpClient`] that the
//! tests replace with a recording mock.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

pub type Headers = HashMap<String, String>;

/// Status, headers and raw body of a completed exchange.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self::with_headers(status, Headers::new(), body)
    }

    pub fn with_headers(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Response carrying `value` encoded as JSON. Mostly for mocks.
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, Bytes::from(value.to_string()))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8, or `None` when it is not valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// The single file part of a `multipart/form-data` upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartFile {
    pub field_name: String,
    /// File name reported to the server, independent of the local path.
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Failures below HTTP: the request never produced a status line.
#[derive(Debug, Clone)]
pub enum HttpError {
    ConnectionFailed(String),
    Timeout(String),
    Cancelled,
    InvalidUrl(String),
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::Cancelled => write!(f, "Request cancelled"),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Minimal HTTP transport.
///
/// A non-2xx status is still an `Ok(Response)` here; interpreting it is the
/// caller's job. Only transport failures surface as [`HttpError`].
///
/// # Example
///
/// ```ignore
/// use pge_client::traits::{HttpClient, Headers, HttpError};
///
/// async fn fetch_sectors<C: HttpClient>(client: &C) -> Result<String, HttpError> {
///     let response = client.get("http://10.0.2.2:8001/catalogos/sectores", &Headers::new()).await?;
///     Ok(response.text().unwrap_or_default().to_string())
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    /// POST an already encoded body; callers set `Content-Type`.
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;

    async fn post_multipart(
        &self,
        url: &str,
        file: &MultipartFile,
        headers: &Headers,
    ) -> Result<Response, HttpError>;
}
