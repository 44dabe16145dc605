//! Paths of every backend operation, relative to the owning client's base URL.
//!
//! No path has a leading slash; the client joins each one to its base URL
//! with a single `/`.

use crate::models::ComparativeKind;

// REST backend

pub const LOGIN: &str = "login";
pub const CURRENT_USER: &str = "auth/me";
pub const DASHBOARD: &str = "dashboard";
pub const DEPENDENCIES: &str = "dependencias";
pub const BULK_UPLOAD: &str = "consumos/carga-masiva";

/// Multipart field the bulk upload expects the file under.
pub const UPLOAD_FIELD: &str = "archivo";
/// File name reported for every bulk upload.
pub const UPLOAD_FILE_NAME: &str = "archivo.csv";

pub fn budgets(dependency_id: i64) -> String {
    format!("dependencias/{}/presupuestos", dependency_id)
}

// Analytics service

pub const SECTORS: &str = "catalogos/sectores";
pub const PROJECTION: &str = "prediccion/proyeccion-matematica";
pub const STRATEGY: &str = "prediccion/ia-analisis-estrategico";

pub fn catalog_dependencies(sector_id: i64) -> String {
    format!("catalogos/dependencias/{}", sector_id)
}

pub fn buildings(dependency_id: i64) -> String {
    format!("catalogos/edificios/{}", dependency_id)
}

pub fn comparative(kind: ComparativeKind) -> String {
    format!("analisis/publico/{}", kind.path_segment())
}
