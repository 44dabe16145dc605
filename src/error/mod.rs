//! Error handling for the PGE client.
//!
//! - **Network errors**: connection, timeout, non-2xx status, bad payloads
//! - **Auth errors**: rejected logins and sessions
//! - **Unified error type**: [`PgeError`] consolidates everything a
//!   repository or state holder can fail with
//!
//! Every state holder turns a [`PgeError`] into its own user-visible message;
//! there is no central error channel and nothing is retried.
//!
//! | Failure | Handling |
//! |---------|----------|
//! | Host unreachable / timeout | "cannot connect" message |
//! | Non-2xx response | server error with status and body |
//! | Undecodable body | treated like a server error |
//! | 401 during session check | silent logout |

mod auth;
mod network;
mod pge_error;
mod result;

pub use auth::AuthError;
pub use network::NetworkError;
pub use pge_error::PgeError;
pub use result::PgeResult;
