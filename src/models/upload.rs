use serde::{Deserialize, Serialize};

/// One rejected cell reported by the bulk consumption import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadErrorDetail {
    #[serde(rename = "fila", default)]
    pub row: Option<i64>,
    #[serde(rename = "columna", default)]
    pub column: Option<String>,
    #[serde(rename = "error", default)]
    pub errors: Option<Vec<String>>,
    #[serde(rename = "valor_erroneo", default)]
    pub bad_value: Option<String>,
}

/// Reply of `POST consumos/carga-masiva`, on success and on validation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Vec<UploadErrorDetail>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What the client learned from an upload attempt that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub status: u16,
    pub response: UploadResponse,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.response.error.is_none()
    }

    /// Human-readable lines, one per rejected cell.
    pub fn detail_lines(&self) -> Vec<String> {
        self.response
            .details
            .iter()
            .flatten()
            .map(|d| {
                let row = d.row.map(|r| r.to_string()).unwrap_or_else(|| "?".to_string());
                let column = d.column.as_deref().unwrap_or("?");
                let errors = d.errors.as_ref().map(|e| e.join("; ")).unwrap_or_default();
                match d.bad_value {
                    Some(ref value) => format!("row {}, column {}: {} ({})", row, column, errors, value),
                    None => format!("row {}, column {}: {}", row, column, errors),
                }
            })
            .collect()
    }
}
