//! Private dashboard: KPIs, evolution series and top buildings.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::load::LoadState;
use super::store::{cancellable, Store};
use super::failure_message;
use crate::error::{PgeError, PgeResult};
use crate::models::{DashboardQuery, DashboardSnapshot};
use crate::repository::DashboardRepository;

/// Label shown while no dependency filter is applied.
pub const ALL_DEPENDENCIES_LABEL: &str = "All dependencies";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub query: DashboardQuery,
    pub dependency_label: String,
    pub snapshot: LoadState<DashboardSnapshot>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            query: DashboardQuery::default(),
            dependency_label: ALL_DEPENDENCIES_LABEL.to_string(),
            snapshot: LoadState::Idle,
        }
    }
}

pub struct DashboardController {
    repository: Arc<DashboardRepository>,
    state: Store<DashboardState>,
}

impl DashboardController {
    pub fn new(repository: Arc<DashboardRepository>) -> Self {
        Self {
            repository,
            state: Store::default(),
        }
    }

    pub fn state(&self) -> &Store<DashboardState> {
        &self.state
    }

    /// Fetch with the current filters. The reply replaces the previous
    /// snapshot entirely.
    pub async fn fetch(&self, cancel: &CancellationToken) -> PgeResult<()> {
        let (query, previous) = self.state.read(|s| (s.query, s.snapshot.clone()));
        self.state.update(|s| s.snapshot = LoadState::Loading);
        debug!(?query, "Fetching dashboard");

        match cancellable(cancel, self.repository.fetch(&query)).await {
            Ok(snapshot) => {
                self.state.update(|s| s.snapshot = LoadState::Success(snapshot));
                Ok(())
            }
            Err(PgeError::Cancelled) => {
                self.state.update(|s| s.snapshot = previous);
                Err(PgeError::Cancelled)
            }
            Err(err) => {
                let message = failure_message(&err);
                self.state.update(|s| s.snapshot = LoadState::Error(message));
                Err(err)
            }
        }
    }

    /// Filter by dependency (`None` for all of them) and fetch again.
    pub async fn set_dependency(
        &self,
        dependency_id: Option<i64>,
        label: &str,
        cancel: &CancellationToken,
    ) -> PgeResult<()> {
        self.state.update(|s| {
            s.query.dependency_id = dependency_id;
            s.dependency_label = label.to_string();
        });
        self.fetch(cancel).await
    }

    /// Change the month/year filter and fetch again.
    pub async fn set_period(
        &self,
        month: Option<u32>,
        year: Option<i32>,
        cancel: &CancellationToken,
    ) -> PgeResult<()> {
        self.state.update(|s| {
            s.query.month = month;
            s.query.year = year;
        });
        self.fetch(cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryTokenStore, MockHttpClient, MockResponse};
    use crate::api::ApiClient;
    use crate::traits::{HttpError, Response};
    use bytes::Bytes;
    use serde_json::json;

    const URL: &str = "http://10.0.2.2:8000/api/dashboard";

    fn controller() -> (Arc<MockHttpClient>, DashboardController) {
        let http = Arc::new(MockHttpClient::new());
        let api = ApiClient::new("http://10.0.2.2:8000/api", http.clone(), Arc::new(InMemoryTokenStore::with_token("t")));
        let repo = Arc::new(DashboardRepository::new(Arc::new(api)));
        (http, DashboardController::new(repo))
    }

    fn snapshot(consumption: f64) -> serde_json::Value {
        json!({
            "status": "success",
            "periodo": {"mes": 4, "año": 2025, "trimestre": 2},
            "kpis": {"consumo_mes_kwh": consumption, "costo_mes": 1.0, "presupuesto_trimestre": 2.0},
            "data_evolucion": [],
            "data_inmuebles": [{"nombre_edificio": "Palacio", "consumo": 9.5}]
        })
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let (http, controller) = controller();
        http.set_json(URL, 200, snapshot(42.0));

        controller.fetch(&CancellationToken::new()).await.unwrap();

        let state = controller.state().snapshot();
        assert_eq!(state.snapshot.value().unwrap().kpis.consumption_kwh, 42.0);
        assert_eq!(http.get_requests()[0].url, URL);
    }

    #[tokio::test]
    async fn test_set_dependency_refetches_with_filter() {
        let (http, controller) = controller();
        http.set_json(URL, 200, snapshot(1.0));

        controller
            .set_dependency(Some(5), "SESA", &CancellationToken::new())
            .await
            .unwrap();

        let state = controller.state().snapshot();
        assert_eq!(state.dependency_label, "SESA");
        assert_eq!(http.get_requests()[0].url, format!("{}?dependencia_id=5", URL));
    }

    #[tokio::test]
    async fn test_connection_failure_message() {
        let (http, controller) = controller();
        http.set_response(URL, MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())));

        assert!(controller.fetch(&CancellationToken::new()).await.is_err());
        assert_eq!(
            controller.state().snapshot().snapshot.error(),
            Some("Could not connect to the server. Check your connection.")
        );
    }

    #[tokio::test]
    async fn test_server_failure_message() {
        let (http, controller) = controller();
        http.set_response(URL, MockResponse::Success(Response::new(500, Bytes::from("boom"))));

        assert!(controller.fetch(&CancellationToken::new()).await.is_err());
        let state = controller.state().snapshot();
        assert!(state.snapshot.error().unwrap().starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_cancel_restores_previous_snapshot() {
        let (http, controller) = controller();
        http.set_json(URL, 200, snapshot(7.0));
        controller.fetch(&CancellationToken::new()).await.unwrap();

        http.set_response(URL, MockResponse::Pending);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = controller.fetch(&cancel).await.unwrap_err();

        assert!(err.is_cancelled());
        let state = controller.state().snapshot();
        assert_eq!(state.snapshot.value().unwrap().kpis.consumption_kwh, 7.0);
    }
}
