use std::sync::Arc;

use crate::api::{endpoints, ApiClient};
use crate::error::PgeResult;
use crate::models::{ProjectionQuery, ProjectionResponse, StrategyResponse};

/// Consumption projection and the strategic analysis derived from it.
pub struct PredictionRepository {
    api: Arc<ApiClient>,
}

impl PredictionRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn projection(&self, query: &ProjectionQuery) -> PgeResult<ProjectionResponse> {
        self.api.get_json(endpoints::PROJECTION, &params(query)).await
    }

    pub async fn strategy(&self, query: &ProjectionQuery) -> PgeResult<StrategyResponse> {
        self.api.get_json(endpoints::STRATEGY, &params(query)).await
    }
}

fn params(query: &ProjectionQuery) -> [(&'static str, Option<String>); 3] {
    [
        ("meses", Some(query.months.to_string())),
        ("ver_todo_historial", Some(query.include_history.to_string())),
        ("dependencia_id", query.dependency_id.map(|v| v.to_string())),
    ]
}
