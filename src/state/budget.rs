//! Budget screen: dependency picker, per-year filtering and creation.

use chrono::Datelike;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::store::{cancellable, Store};
use crate::error::{PgeError, PgeResult};
use crate::models::{
    quarter_from_label, summarize, Budget, BudgetSummary, CreateBudgetRequest, Dependency,
};
use crate::repository::{BudgetRepository, DependencyRepository};

pub const FIRST_BUDGET_YEAR: i32 = 2023;
pub const LAST_BUDGET_YEAR: i32 = 2030;

/// Years offered by the budget year picker, oldest first.
pub fn available_budget_years() -> Vec<i32> {
    (FIRST_BUDGET_YEAR..=LAST_BUDGET_YEAR).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetState {
    pub dependencies: Vec<Dependency>,
    pub selected_dependency: Option<Dependency>,
    /// Full history of the selected dependency, every year.
    pub history: Vec<Budget>,
    pub year: i32,
    /// `history` restricted to `year`, with its total and average.
    pub summary: BudgetSummary,
    pub loading: bool,
    /// Outcome of the last create attempt.
    pub notice: Option<String>,
}

impl Default for BudgetState {
    fn default() -> Self {
        Self {
            dependencies: Vec::new(),
            selected_dependency: None,
            history: Vec::new(),
            year: chrono::Local::now().year(),
            summary: BudgetSummary::default(),
            loading: false,
            notice: None,
        }
    }
}

impl BudgetState {
    fn recompute(&mut self) {
        self.summary = summarize(&self.history, self.year);
    }
}

pub struct BudgetController {
    dependencies: Arc<DependencyRepository>,
    budgets: Arc<BudgetRepository>,
    state: Store<BudgetState>,
}

impl BudgetController {
    pub fn new(dependencies: Arc<DependencyRepository>, budgets: Arc<BudgetRepository>) -> Self {
        Self {
            dependencies,
            budgets,
            state: Store::default(),
        }
    }

    pub fn state(&self) -> &Store<BudgetState> {
        &self.state
    }

    /// Load the user's dependencies and select the first one. A failed fetch
    /// leaves the list empty.
    pub async fn load_dependencies(&self, cancel: &CancellationToken) -> PgeResult<()> {
        self.state.update(|s| s.loading = true);
        let dependencies = match cancellable(cancel, self.dependencies.list()).await {
            Ok(list) => list,
            Err(PgeError::Cancelled) => {
                self.state.update(|s| s.loading = false);
                return Err(PgeError::Cancelled);
            }
            Err(err) => {
                warn!("Could not load dependencies: {}", err);
                Vec::new()
            }
        };

        let first = dependencies.first().cloned();
        self.state.update(|s| {
            s.dependencies = dependencies;
            s.loading = false;
        });

        match first {
            Some(dependency) => self.select_dependency(dependency, cancel).await,
            None => Ok(()),
        }
    }

    /// Select a dependency and load its full budget history. A failed fetch
    /// empties the history.
    pub async fn select_dependency(
        &self,
        dependency: Dependency,
        cancel: &CancellationToken,
    ) -> PgeResult<()> {
        let dependency_id = dependency.id;
        self.state.update(|s| {
            s.selected_dependency = Some(dependency);
            s.loading = true;
        });
        self.reload_history(dependency_id, cancel).await
    }

    async fn reload_history(&self, dependency_id: i64, cancel: &CancellationToken) -> PgeResult<()> {
        let history = match cancellable(cancel, self.budgets.list(dependency_id)).await {
            Ok(history) => history,
            Err(PgeError::Cancelled) => {
                self.state.update(|s| s.loading = false);
                return Err(PgeError::Cancelled);
            }
            Err(err) => {
                warn!(dependency_id, "Could not load budgets: {}", err);
                Vec::new()
            }
        };

        debug!(dependency_id, count = history.len(), "Budget history loaded");
        self.state.update(|s| {
            s.history = history;
            s.loading = false;
            s.recompute();
        });
        Ok(())
    }

    /// Change the year filter. No request is made.
    pub fn set_year(&self, year: i32) {
        self.state.update(|s| {
            s.year = year;
            s.recompute();
        });
    }

    /// Create an allocation for the selected dependency from form input.
    ///
    /// The year must be an integer. The quarter label goes through
    /// [`quarter_from_label`] and an amount that does not parse is sent as
    /// 0. Any 2xx reply counts as success and the history is fetched
    /// again; the stored allocation is returned when the reply carries one.
    pub async fn create_budget(
        &self,
        year_text: &str,
        quarter_label: &str,
        amount_text: &str,
        cancel: &CancellationToken,
    ) -> PgeResult<Option<Budget>> {
        let dependency_id = self
            .state
            .read(|s| s.selected_dependency.as_ref().map(|d| d.id))
            .ok_or_else(|| PgeError::validation("Select a dependency first."))?;
        let year: i32 = year_text
            .trim()
            .parse()
            .map_err(|_| PgeError::validation(format!("Invalid year: '{}'", year_text)))?;

        let request = CreateBudgetRequest {
            year,
            quarter: quarter_from_label(quarter_label),
            amount: amount_text.trim().parse().unwrap_or(0.0),
        };

        self.state.update(|s| {
            s.loading = true;
            s.notice = None;
        });

        match cancellable(cancel, self.budgets.create(dependency_id, &request)).await {
            Ok(created) => {
                info!(dependency_id, year, quarter = request.quarter, "Budget created");
                self.state.update(|s| s.notice = Some("Budget assigned".to_string()));
                self.reload_history(dependency_id, cancel).await?;
                Ok(created)
            }
            Err(err) => {
                let notice = if err.is_cancelled() {
                    None
                } else if err.is_connection_error() {
                    Some("Connection error".to_string())
                } else {
                    Some(format!("Error: {}", err.user_message()))
                };
                self.state.update(|s| {
                    s.loading = false;
                    s.notice = notice;
                });
                Err(err)
            }
        }
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

    const DEPS_URL: &str = "http://10.0.2.2:8000/api/dependencias";

    fn controller() -> (Arc<MockHttpClient>, BudgetController) {
        let http = Arc::new(MockHttpClient::new());
        let api = Arc::new(ApiClient::new(
            "http://10.0.2.2:8000/api",
            http.clone(),
            Arc::new(InMemoryTokenStore::with_token("t")),
        ));
        let controller = BudgetController::new(
            Arc::new(DependencyRepository::new(api.clone())),
            Arc::new(BudgetRepository::new(api)),
        );
        (http, controller)
    }

    fn history() -> serde_json::Value {
        json!([
            {"id": 1, "dependencia_id": 3, "año": 2025, "trimestre": 1, "monto_asignado": 100.0},
            {"id": 2, "dependencia_id": 3, "año": 2025, "trimestre": 2, "monto_asignado": 200.0},
            {"id": 3, "dependencia_id": 3, "año": 2024, "trimestre": 4, "monto_asignado": 50.0}
        ])
    }

    fn dependency(id: i64) -> Dependency {
        Dependency {
            id,
            name: format!("Dependencia {}", id),
            building_count: 0,
            sector_id: None,
        }
    }

    #[test]
    fn test_available_years() {
        assert_eq!(available_budget_years(), (2023..=2030).collect::<Vec<_>>());
        assert_eq!(BudgetState::default().year, chrono::Local::now().year());
    }

    #[tokio::test]
    async fn test_load_dependencies_selects_first() {
        let (http, controller) = controller();
        http.set_json(
            DEPS_URL,
            200,
            json!([{"id_dependencia": 3, "nombre_dependencia": "SESA"}, {"id_dependencia": 4, "nombre_dependencia": "SEQ"}]),
        );
        http.set_json(&format!("{}/3/presupuestos", DEPS_URL), 200, history());
        controller.set_year(2025);

        controller.load_dependencies(&CancellationToken::new()).await.unwrap();

        let state = controller.state().snapshot();
        assert_eq!(state.dependencies.len(), 2);
        assert_eq!(state.selected_dependency.map(|d| d.id), Some(3));
        assert_eq!(state.history.len(), 3);
        assert_eq!(state.summary.total, 300.0);
        assert_eq!(state.summary.average, 150.0);
        assert_eq!(
            http.get_requests()[1].url,
            "http://10.0.2.2:8000/api/dependencias/3/presupuestos"
        );
    }

    #[tokio::test]
    async fn test_load_dependencies_failure_gives_empty_list() {
        let (http, controller) = controller();
        http.set_response(
            DEPS_URL,
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );

        controller.load_dependencies(&CancellationToken::new()).await.unwrap();

        let state = controller.state().snapshot();
        assert!(state.dependencies.is_empty());
        assert!(state.selected_dependency.is_none());
        assert_eq!(http.get_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_set_year_refilters_without_request() {
        let (http, controller) = controller();
        http.set_json(&format!("{}/3/presupuestos", DEPS_URL), 200, history());
        controller
            .select_dependency(dependency(3), &CancellationToken::new())
            .await
            .unwrap();
        let sent = http.get_requests().len();

        controller.set_year(2024);
        assert_eq!(controller.state().snapshot().summary.total, 50.0);

        controller.set_year(2023);
        let summary = controller.state().snapshot().summary;
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.average, 0.0);
        assert!(summary.budgets.is_empty());

        assert_eq!(http.get_requests().len(), sent);
    }

    #[tokio::test]
    async fn test_history_failure_empties_list() {
        let (http, controller) = controller();
        http.set_response(
            &format!("{}/3/presupuestos", DEPS_URL),
            MockResponse::Success(Response::new(500, Bytes::from("boom"))),
        );
        controller.state().update(|s| s.history = vec![]);

        controller
            .select_dependency(dependency(3), &CancellationToken::new())
            .await
            .unwrap();
        assert!(controller.state().snapshot().history.is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_dependency() {
        let (http, controller) = controller();
        let err = controller
            .create_budget("2025", "Q1", "100", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PgeError::Validation { .. }));
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_year() {
        let (http, controller) = controller();
        controller
            .state()
            .update(|s| s.selected_dependency = Some(dependency(3)));

        let err = controller
            .create_budget("dos mil", "Q1", "100", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PgeError::Validation { .. }));
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_refetch() {
        let (http, controller) = controller();
        http.set_json(
            &format!("{}/3/presupuestos", DEPS_URL),
            201,
            json!({"id": 8, "dependencia_id": 3, "año": 2026, "trimestre": 4, "monto_asignado": 0.0}),
        );
        controller
            .state()
            .update(|s| s.selected_dependency = Some(dependency(3)));

        let created = controller
            .create_budget("2026", "Cuarto trimestre", "mucho", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(created.map(|b| b.id), Some(8));

        let requests = http.get_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[1].method, "GET");
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"año": 2026, "trimestre": 4, "monto_asignado": 0.0}));

        let state = controller.state().snapshot();
        assert_eq!(state.notice.as_deref(), Some("Budget assigned"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_create_wrapped_reply_still_refetches() {
        let (http, controller) = controller();
        let url = format!("{}/3/presupuestos", DEPS_URL);
        http.set_json(
            &url,
            201,
            json!({
                "message": "Presupuesto asignado",
                "data": {"id": 8, "dependencia_id": 3, "año": 2025, "trimestre": 1, "monto_asignado": 10.0}
            }),
        );
        controller
            .state()
            .update(|s| s.selected_dependency = Some(dependency(3)));

        let created = controller
            .create_budget("2025", "Q1", "10", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(created, None);

        let methods: Vec<String> = http.get_requests().iter().map(|r| r.method.clone()).collect();
        assert_eq!(methods, vec!["POST", "GET"]);
        let state = controller.state().snapshot();
        assert_eq!(state.notice.as_deref(), Some("Budget assigned"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_create_connection_error_notice() {
        let (http, controller) = controller();
        http.set_default_response(MockResponse::Error(HttpError::ConnectionFailed(
            "refused".to_string(),
        )));
        controller
            .state()
            .update(|s| s.selected_dependency = Some(dependency(3)));

        assert!(controller
            .create_budget("2025", "Q2 (Abr-Jun)", "10", &CancellationToken::new())
            .await
            .is_err());
        let state = controller.state().snapshot();
        assert_eq!(state.notice.as_deref(), Some("Connection error"));
        assert!(!state.loading);
    }
}
