//! Typed pass-throughs over the two backends.
//!
//! Each repository owns an injected [`ApiClient`](crate::api::ApiClient) and
//! maps one endpoint group to domain types. Failures propagate unchanged as
//! [`PgeError`](crate::error::PgeError).

mod auth;
mod budget;
mod catalog;
mod dashboard;
mod dependency;
mod prediction;
mod upload;

pub use auth::AuthRepository;
pub use budget::BudgetRepository;
pub use catalog::CatalogRepository;
pub use dashboard::DashboardRepository;
pub use dependency::DependencyRepository;
pub use prediction::PredictionRepository;
pub use upload::UploadRepository;

use std::sync::Arc;

use crate::api::ApiClients;

/// Every repository, wired to the right backend.
#[derive(Clone)]
pub struct Repositories {
    pub auth: Arc<AuthRepository>,
    pub dashboard: Arc<DashboardRepository>,
    pub dependencies: Arc<DependencyRepository>,
    pub budgets: Arc<BudgetRepository>,
    pub uploads: Arc<UploadRepository>,
    pub catalog: Arc<CatalogRepository>,
    pub predictions: Arc<PredictionRepository>,
}

impl Repositories {
    pub fn new(clients: &ApiClients) -> Self {
        Self {
            auth: Arc::new(AuthRepository::new(clients.api.clone())),
            dashboard: Arc::new(DashboardRepository::new(clients.api.clone())),
            dependencies: Arc::new(DependencyRepository::new(clients.api.clone())),
            budgets: Arc::new(BudgetRepository::new(clients.api.clone())),
            uploads: Arc::new(UploadRepository::new(clients.api.clone())),
            catalog: Arc::new(CatalogRepository::new(clients.analytics.clone())),
            predictions: Arc::new(PredictionRepository::new(clients.analytics.clone())),
        }
    }
}
