//! Bulk consumption import.

use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::{endpoints, status_error, ApiClient};
use crate::error::{NetworkError, PgeError, PgeResult};
use crate::models::{UploadOutcome, UploadResponse};
use crate::traits::MultipartFile;

const CSV_CONTENT_TYPE: &str = "text/csv";

pub struct UploadRepository {
    api: Arc<ApiClient>,
}

impl UploadRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Read `path` and upload it. A missing or empty file is rejected
    /// before anything is sent.
    pub async fn upload_file(&self, path: &Path) -> PgeResult<UploadOutcome> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            PgeError::validation(format!("Could not read {}: {}", path.display(), e))
        })?;
        self.upload_bytes(Bytes::from(data)).await
    }

    /// Upload raw CSV content as the `archivo` form field.
    ///
    /// The reply body is decoded whatever the status, so per-row validation
    /// details of a 4xx reach the caller inside the [`UploadOutcome`].
    pub async fn upload_bytes(&self, data: Bytes) -> PgeResult<UploadOutcome> {
        if data.is_empty() {
            return Err(PgeError::validation("The selected file is empty."));
        }

        let file = MultipartFile {
            field_name: endpoints::UPLOAD_FIELD.to_string(),
            file_name: endpoints::UPLOAD_FILE_NAME.to_string(),
            content_type: Some(CSV_CONTENT_TYPE.to_string()),
            data,
        };
        let response = self.api.post_multipart(endpoints::BULK_UPLOAD, &file).await?;

        match response.json::<UploadResponse>() {
            Ok(body) => {
                debug!(status = response.status, "Upload answered");
                Ok(UploadOutcome {
                    status: response.status,
                    response: body,
                })
            }
            Err(e) if response.is_success() => {
                warn!("Undecodable upload response: {}", e);
                Err(NetworkError::InvalidResponse {
                    message: e.to_string(),
                }
                .into())
            }
            Err(_) => Err(status_error(&response).into()),
        }
    }
}
