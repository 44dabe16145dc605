//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, multipart upload)
//! - [`TokenStore`] - Access-token storage and retrieval

pub mod http;
pub mod token_store;

pub use http::{Headers, HttpClient, HttpError, MultipartFile, Response};
pub use token_store::{TokenStore, TokenStoreError};
