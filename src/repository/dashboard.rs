use std::sync::Arc;

use crate::api::{endpoints, ApiClient};
use crate::error::PgeResult;
use crate::models::{DashboardQuery, DashboardSnapshot};

pub struct DashboardRepository {
    api: Arc<ApiClient>,
}

impl DashboardRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// GET `dashboard`, sending only the filters that are set.
    pub async fn fetch(&self, query: &DashboardQuery) -> PgeResult<DashboardSnapshot> {
        self.api
            .get_json(
                endpoints::DASHBOARD,
                &[
                    ("dependencia_id", query.dependency_id.map(|v| v.to_string())),
                    ("mes", query.month.map(|v| v.to_string())),
                    ("año", query.year.map(|v| v.to_string())),
                ],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryTokenStore, MockHttpClient};
    use serde_json::json;

    fn snapshot_json() -> serde_json::Value {
        json!({
            "status": "success",
            "periodo": {"mes": 5, "año": 2025, "trimestre": 2},
            "kpis": {"consumo_mes_kwh": 10.0, "costo_mes": 20.0, "presupuesto_trimestre": 30.0, "porcentaje_ejecucion": 66.6},
            "data_evolucion": [],
            "data_inmuebles": []
        })
    }

    #[tokio::test]
    async fn test_query_parameters() {
        let http = Arc::new(MockHttpClient::new());
        let api = ApiClient::new("http://10.0.2.2:8000/api", http.clone(), Arc::new(InMemoryTokenStore::new()));
        let repo = DashboardRepository::new(Arc::new(api));
        http.set_json("http://10.0.2.2:8000/api/dashboard", 200, snapshot_json());

        repo.fetch(&DashboardQuery::new()).await.unwrap();
        let snapshot = repo
            .fetch(&DashboardQuery::new().with_dependency(Some(4)).with_year(Some(2024)))
            .await
            .unwrap();
        assert_eq!(snapshot.kpis.pct_executed, Some(66.6));

        let urls: Vec<String> = http.get_requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://10.0.2.2:8000/api/dashboard".to_string(),
                "http://10.0.2.2:8000/api/dashboard?dependencia_id=4&a%C3%B1o=2024".to_string(),
            ]
        );
    }
}
