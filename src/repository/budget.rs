use std::sync::Arc;
use tracing::debug;

use crate::api::{endpoints, ApiClient};
use crate::error::PgeResult;
use crate::models::{Budget, CreateBudgetRequest};

/// Quarterly budget allocations of one dependency.
pub struct BudgetRepository {
    api: Arc<ApiClient>,
}

impl BudgetRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Full allocation history of `dependency_id`, every year.
    pub async fn list(&self, dependency_id: i64) -> PgeResult<Vec<Budget>> {
        self.api.get_json(&endpoints::budgets(dependency_id), &[]).await
    }

    /// Create an allocation. Any 2xx reply counts as created; the stored
    /// allocation is returned when the body is a bare budget, and `None`
    /// for any other body (wrapped, empty, plain text).
    pub async fn create(
        &self,
        dependency_id: i64,
        request: &CreateBudgetRequest,
    ) -> PgeResult<Option<Budget>> {
        let response = self
            .api
            .post(&endpoints::budgets(dependency_id), request)
            .await?;
        match response.json::<Budget>() {
            Ok(budget) => Ok(Some(budget)),
            Err(e) => {
                debug!(dependency_id, "Create reply is not a budget: {}", e);
                Ok(None)
            }
        }
    }
}
