//! Framework-independent state holders.
//!
//! Each controller owns one [`Store`] that UIs read as immutable snapshots or
//! subscribe to. Every async action takes a `CancellationToken`; cancelling
//! it makes the action return [`PgeError::Cancelled`] and resets its loading
//! flag. Requests are not deduplicated: when two actions race, the last
//! response wins.

mod budget;
mod dashboard;
mod dependencies;
mod load;
mod projection;
mod public_dashboard;
mod session;
mod store;
mod upload;

pub use budget::{available_budget_years, BudgetController, BudgetState};
pub use dashboard::{DashboardController, DashboardState, ALL_DEPENDENCIES_LABEL};
pub use dependencies::DependencyListController;
pub use load::LoadState;
pub use projection::{ProjectionController, ProjectionState};
pub use public_dashboard::{
    available_public_years, PublicDashboardController, PublicDashboardState,
    DEFAULT_PUBLIC_YEAR,
};
pub use session::{SessionController, SessionState, SessionStatus};
pub use store::{cancellable, Store};
pub use upload::UploadController;

use crate::error::PgeError;

pub const CONNECTION_FAILURE_MESSAGE: &str =
    "Could not connect to the server. Check your connection.";

/// Message a fetcher shows for a failed request: a fixed text when the
/// server was unreachable, `"Error: <detail>"` otherwise.
pub fn failure_message(err: &PgeError) -> String {
    if err.is_connection_error() {
        CONNECTION_FAILURE_MESSAGE.to_string()
    } else {
        format!("Error: {}", err.user_message())
    }
}
