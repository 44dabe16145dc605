//! Recording [`HttpClient`] double keyed by URL.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{Headers, HttpClient, HttpError, MultipartFile, Response};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// "GET" or "POST"
    pub method: String,
    pub url: String,
    pub headers: Headers,
    /// JSON body of a plain POST
    pub body: Option<String>,
    /// File part of a multipart POST
    pub file: Option<MultipartFile>,
}

#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A reply with any status
    Success(Response),
    /// A transport failure
    Error(HttpError),
    /// Never resolves
    Pending,
}

/// Mock transport. Every call is recorded; responses are matched by exact URL first, then by the longest configured
/// prefix, then by the default response.
///
/// # Example
///
/// ```ignore
/// use pge_client::adapters::mock::{MockHttpClient, MockResponse};
/// use pge_client::traits::{HttpClient, Response, Headers};
/// use bytes::Bytes;
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://api/dependencias",
///     MockResponse::Success(Response::new(200, Bytes::from("[]"))),
/// );
///
/// let response = client.get("http://api/dependencias", &Headers::new()).await?;
/// assert_eq!(response.status, 200);
/// assert_eq!(client.get_requests().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer `url`, or any URL starting with it, with `response`.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Shorthand for a JSON response with the given status.
    pub fn set_json(&self, url: &str, status: u16, value: serde_json::Value) {
        self.set_response(url, MockResponse::Success(Response::json_body(status, &value)));
    }

    /// Fallback for URLs nothing else matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Every request so far, oldest first.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests whose URL starts with `prefix`.
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.get_requests()
            .into_iter()
            .filter(|r| r.url.starts_with(prefix))
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    pub fn clear_responses(&self) {
        self.responses.lock().unwrap().clear();
    }

    fn record_request(&self, request: RecordedRequest) {
        self.requests.lock().unwrap().push(request);
    }

    fn lookup(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        let prefix_match = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, response)| response.clone());
        if prefix_match.is_some() {
            return prefix_match;
        }

        self.default_response.lock().unwrap().clone()
    }

    async fn respond(&self, url: &str) -> Result<Response, HttpError> {
        match self.lookup(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Pending) => futures::future::pending().await,
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request(RecordedRequest {
            method: "GET".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: None,
            file: None,
        });
        self.respond(url).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request(RecordedRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: Some(body.to_string()),
            file: None,
        });
        self.respond(url).await
    }

    async fn post_multipart(
        &self,
        url: &str,
        file: &MultipartFile,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        self.record_request(RecordedRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: None,
            file: Some(file.clone()),
        });
        self.respond(url).await
    }
}
