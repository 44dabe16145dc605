use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::store::{cancellable, Store};
use crate::error::{PgeError, PgeResult};
use crate::models::Dependency;
use crate::repository::DependencyRepository;

/// Plain dependency listing. Failures show as an empty list.
pub struct DependencyListController {
    repository: Arc<DependencyRepository>,
    state: Store<Vec<Dependency>>,
}

impl DependencyListController {
    pub fn new(repository: Arc<DependencyRepository>) -> Self {
        Self {
            repository,
            state: Store::default(),
        }
    }

    pub fn state(&self) -> &Store<Vec<Dependency>> {
        &self.state
    }

    pub async fn fetch(&self, cancel: &CancellationToken) -> PgeResult<()> {
        let list = match cancellable(cancel, self.repository.list()).await {
            Ok(list) => list,
            Err(PgeError::Cancelled) => return Err(PgeError::Cancelled),
            Err(err) => {
                warn!("Could not load dependencies: {}", err);
                Vec::new()
            }
        };
        self.state.update(|s| *s = list);
        Ok(())
    }
}
