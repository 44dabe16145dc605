use std::sync::Arc;

use crate::api::{endpoints, ApiClient};
use crate::error::PgeResult;
use crate::models::Dependency;

/// Dependencies visible to the signed-in user.
pub struct DependencyRepository {
    api: Arc<ApiClient>,
}

impl DependencyRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> PgeResult<Vec<Dependency>> {
        self.api.get_json(endpoints::DEPENDENCIES, &[]).await
    }
}
