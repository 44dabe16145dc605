//! Bulk consumption upload.

use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::failure_message;
use super::load::LoadState;
use super::store::{cancellable, Store};
use crate::error::{PgeError, PgeResult};
use crate::models::UploadOutcome;
use crate::repository::UploadRepository;

pub struct UploadController {
    repository: Arc<UploadRepository>,
    state: Store<LoadState<UploadOutcome>>,
}

impl UploadController {
    pub fn new(repository: Arc<UploadRepository>) -> Self {
        Self {
            repository,
            state: Store::default(),
        }
    }

    pub fn state(&self) -> &Store<LoadState<UploadOutcome>> {
        &self.state
    }

    pub async fn upload_file(&self, path: &Path, cancel: &CancellationToken) -> PgeResult<UploadOutcome> {
        self.run(self.repository.upload_file(path), cancel).await
    }

    pub async fn upload_bytes(&self, data: Bytes, cancel: &CancellationToken) -> PgeResult<UploadOutcome> {
        self.run(self.repository.upload_bytes(data), cancel).await
    }

    /// A server reply, even a validation failure, ends in `Success` with the
    /// outcome; only requests that never got an answer end in `Error`.
    async fn run<F>(&self, upload: F, cancel: &CancellationToken) -> PgeResult<UploadOutcome>
    where
        F: std::future::Future<Output = PgeResult<UploadOutcome>>,
    {
        let previous = self.state.snapshot();
        self.state.update(|s| *s = LoadState::Loading);

        match cancellable(cancel, upload).await {
            Ok(outcome) => {
                info!(status = outcome.status, success = outcome.is_success(), "Upload finished");
                let published = outcome.clone();
                self.state.update(|s| *s = LoadState::Success(published));
                Ok(outcome)
            }
            Err(PgeError::Cancelled) => {
                self.state.update(|s| *s = previous);
                Err(PgeError::Cancelled)
            }
            Err(err) => {
                let message = match err {
                    PgeError::Validation { ref message } => message.clone(),
                    _ => failure_message(&err),
                };
                self.state.update(|s| *s = LoadState::Error(message));
                Err(err)
            }
        }
    }
}
