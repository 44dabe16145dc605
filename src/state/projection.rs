//! Consumption projection and the strategic analysis on top of it.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::failure_message;
use super::load::LoadState;
use super::store::{cancellable, Store};
use crate::error::{PgeError, PgeResult};
use crate::models::{ProjectionQuery, ProjectionResponse, StrategyResponse};
use crate::repository::PredictionRepository;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionState {
    pub query: ProjectionQuery,
    pub projection: LoadState<ProjectionResponse>,
    pub strategy: LoadState<StrategyResponse>,
}

pub struct ProjectionController {
    repository: Arc<PredictionRepository>,
    state: Store<ProjectionState>,
}

impl ProjectionController {
    pub fn new(repository: Arc<PredictionRepository>) -> Self {
        Self {
            repository,
            state: Store::default(),
        }
    }

    pub fn state(&self) -> &Store<ProjectionState> {
        &self.state
    }

    pub async fn fetch(&self, cancel: &CancellationToken) -> PgeResult<()> {
        let (query, previous) = self.state.read(|s| (s.query, s.projection.clone()));
        self.state.update(|s| s.projection = LoadState::Loading);
        debug!(?query, "Fetching projection");

        match cancellable(cancel, self.repository.projection(&query)).await {
            Ok(response) => {
                self.state.update(|s| s.projection = LoadState::Success(response));
                Ok(())
            }
            Err(PgeError::Cancelled) => {
                self.state.update(|s| s.projection = previous);
                Err(PgeError::Cancelled)
            }
            Err(err) => {
                let message = failure_message(&err);
                self.state.update(|s| s.projection = LoadState::Error(message));
                Err(err)
            }
        }
    }

    /// Change the horizon and fetch again.
    pub async fn set_months(&self, months: u32, cancel: &CancellationToken) -> PgeResult<()> {
        self.state.update(|s| s.query.months = months);
        self.fetch(cancel).await
    }

    /// Takes effect on the next fetch.
    pub fn set_include_history(&self, include: bool) {
        self.state.update(|s| s.query.include_history = include);
    }

    /// Takes effect on the next fetch.
    pub fn set_dependency(&self, dependency_id: Option<i64>) {
        self.state.update(|s| s.query.dependency_id = dependency_id);
    }

    /// Request the strategic analysis for the current filters.
    pub async fn fetch_strategy(&self, cancel: &CancellationToken) -> PgeResult<()> {
        let (query, previous) = self.state.read(|s| (s.query, s.strategy.clone()));
        self.state.update(|s| s.strategy = LoadState::Loading);

        match cancellable(cancel, self.repository.strategy(&query)).await {
            Ok(response) => {
                self.state.update(|s| s.strategy = LoadState::Success(response));
                Ok(())
            }
            Err(PgeError::Cancelled) => {
                self.state.update(|s| s.strategy = previous);
                Err(PgeError::Cancelled)
            }
            Err(err) => {
                let message = failure_message(&err);
                self.state.update(|s| s.strategy = LoadState::Error(message));
                Err(err)
            }
        }
    }
}
