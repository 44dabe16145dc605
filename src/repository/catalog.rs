//! Public catalog and comparison charts served by the analytics service.

use std::sync::Arc;

use crate::api::{endpoints, ApiClient};
use crate::error::PgeResult;
use crate::models::{
    Building, CatalogDependency, ComparativeKind, ComparativeResult, ComparisonLevel, Sector,
};

pub struct CatalogRepository {
    api: Arc<ApiClient>,
}

impl CatalogRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn sectors(&self) -> PgeResult<Vec<Sector>> {
        self.api.get_json(endpoints::SECTORS, &[]).await
    }

    pub async fn dependencies(&self, sector_id: i64) -> PgeResult<Vec<CatalogDependency>> {
        self.api
            .get_json(&endpoints::catalog_dependencies(sector_id), &[])
            .await
    }

    pub async fn buildings(&self, dependency_id: i64) -> PgeResult<Vec<Building>> {
        self.api.get_json(&endpoints::buildings(dependency_id), &[]).await
    }

    /// One comparison chart for `ids` (comma-joined) at `level` in `year`.
    pub async fn comparative(
        &self,
        kind: ComparativeKind,
        year: i32,
        ids: &str,
        level: ComparisonLevel,
    ) -> PgeResult<ComparativeResult> {
        self.api
            .get_json(
                &endpoints::comparative(kind),
                &[
                    ("anio", Some(year.to_string())),
                    ("ids", Some(ids.to_string())),
                    ("tipo_filtro", Some(level.filter_type().to_string())),
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

    fn repo() -> (Arc<MockHttpClient>, CatalogRepository) {
        let http = Arc::new(MockHttpClient::new());
        let api = ApiClient::new("http://10.0.2.2:8001", http.clone(), Arc::new(InMemoryTokenStore::new()));
        (http, CatalogRepository::new(Arc::new(api)))
    }

    #[tokio::test]
    async fn test_catalog_paths() {
        let (http, repo) = repo();
        http.set_json("http://10.0.2.2:8001/catalogos/sectores", 200, json!([{"id": 1, "nombre": "Salud"}]));
        http.set_json(
            "http://10.0.2.2:8001/catalogos/dependencias/1",
            200,
            json!([{"id": 5, "nombre": "SESA", "sector_id": 1}]),
        );
        http.set_json(
            "http://10.0.2.2:8001/catalogos/edificios/5",
            200,
            json!([{"id": 50, "nombre": "Hospital General", "dependencia_id": 5}]),
        );

        assert_eq!(repo.sectors().await.unwrap()[0].name, "Salud");
        assert_eq!(repo.dependencies(1).await.unwrap()[0].sector_id, 1);
        assert_eq!(repo.buildings(5).await.unwrap()[0].dependency_id, 5);
    }

    #[tokio::test]
    async fn test_comparative_query() {
        let (http, repo) = repo();
        http.set_json(
            "http://10.0.2.2:8001/analisis/publico/ranking",
            200,
            json!({"titulo": "Ranking", "eje_x": [], "series": [], "dependencias_involucradas": []}),
        );

        let chart = repo
            .comparative(ComparativeKind::Ranking, 2024, "1,4", ComparisonLevel::Dependencies)
            .await
            .unwrap();
        assert_eq!(chart.title, "Ranking");
        assert_eq!(
            http.get_requests()[0].url,
            "http://10.0.2.2:8001/analisis/publico/ranking?anio=2024&ids=1%2C4&tipo_filtro=dependencia"
        );
    }
}
