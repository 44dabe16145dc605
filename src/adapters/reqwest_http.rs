//! Production transport over reqwest (rustls).

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use std::time::Duration;

use crate::config::DEFAULT_TIMEOUT;
use crate::traits::{Headers, HttpClient, HttpError, MultipartFile, Response};

/// [`HttpClient`] backed by a shared `reqwest::Client`.
///
/// ```ignore
/// use pge_client::adapters::ReqwestHttpClient;
/// use pge_client::traits::{Headers, HttpClient};
///
/// let client = ReqwestHttpClient::new();
/// let response = client.get("http://10.0.2.2:8000/api/dependencias", &Headers::new()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Client with the default 30 s connect and request timeouts.
    pub fn new() -> Self {
        Self::with_timeouts(DEFAULT_TIMEOUT, DEFAULT_TIMEOUT).unwrap_or_else(|_| Self {
            client: reqwest::Client::new(),
        })
    }

    pub fn with_timeouts(connect: Duration, request: Duration) -> Result<Self, HttpError> {
        reqwest::Client::builder()
            .connect_timeout(connect)
            .timeout(request)
            .build()
            .map(|client| Self { client })
            .map_err(|e| HttpError::Other(e.to_string()))
    }

    async fn send(&self, builder: RequestBuilder, headers: &Headers) -> Result<Response, HttpError> {
        let builder = headers
            .iter()
            .fold(builder, |builder, (name, value)| builder.header(name, value));

        let reply = builder.send().await.map_err(classify)?;
        let status = reply.status().as_u16();
        let reply_headers = header_map(reply.headers());
        let body = reply.bytes().await.map_err(classify)?;

        Ok(Response::with_headers(status, reply_headers, body))
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(err: reqwest::Error) -> HttpError {
    let message = err.to_string();
    if err.is_timeout() {
        HttpError::Timeout(message)
    } else if err.is_connect() {
        HttpError::ConnectionFailed(message)
    } else if err.is_builder() {
        HttpError::InvalidUrl(message)
    } else {
        HttpError::Other(message)
    }
}

/// Headers with non-UTF-8 values dropped.
fn header_map(headers: &reqwest::header::HeaderMap) -> Headers {
    headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect()
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.send(self.client.get(url), headers).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.send(self.client.post(url).body(body.to_owned()), headers)
            .await
    }

    async fn post_multipart(
        &self,
        url: &str,
        file: &MultipartFile,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        let mut part = Part::bytes(file.data.to_vec()).file_name(file.file_name.clone());
        if let Some(ref mime) = file.content_type {
            part = part
                .mime_str(mime)
                .map_err(|e| HttpError::Other(format!("Invalid content type {}: {}", mime, e)))?;
        }
        let form = Form::new().part(file.field_name.clone(), part);

        self.send(self.client.post(url).multipart(form), headers)
            .await
    }
}
