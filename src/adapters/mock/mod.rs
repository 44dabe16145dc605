//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`InMemoryTokenStore`] - In-memory token storage

pub mod http;
pub mod token_store;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use token_store::InMemoryTokenStore;
