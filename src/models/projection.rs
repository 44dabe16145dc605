//! Prediction service payloads: the mathematical projection and the
//! strategic analysis built on top of it.

use serde::{Deserialize, Serialize};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Parameters of both prediction endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionQuery {
    /// Months to project ahead.
    pub months: u32,
    /// Return the whole history instead of the recent window.
    pub include_history: bool,
    pub dependency_id: Option<i64>,
}

impl Default for ProjectionQuery {
    fn default() -> Self {
        Self {
            months: 6,
            include_history: false,
            dependency_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PointKind {
    #[serde(rename = "real")]
    Real,
    #[serde(rename = "prediccion", alias = "prediction")]
    Prediction,
}

/// One month of the projection chart; historical and projected points share
/// this shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionPoint {
    #[serde(rename = "anio")]
    pub year: i32,
    #[serde(rename = "mes")]
    pub month: u32,
    pub total_kwh: f64,
    #[serde(rename = "total_costo")]
    pub total_cost: f64,
    #[serde(rename = "tipo")]
    pub kind: PointKind,
    /// Only set on prediction points.
    #[serde(rename = "rango_costo_min", default)]
    pub cost_range_min: Option<f64>,
    #[serde(rename = "rango_costo_max", default)]
    pub cost_range_max: Option<f64>,
}

impl ProjectionPoint {
    pub fn is_prediction(&self) -> bool {
        self.kind == PointKind::Prediction
    }

    /// Short axis label: month abbreviation and two-digit year, such as
    /// `"Feb 26"`. The year is taken modulo 100, so 2026 and 1926 both
    /// render as `26`. An out-of-range month renders as an empty month name.
    pub fn label(&self) -> String {
        let month = self
            .month
            .checked_sub(1)
            .and_then(|i| MONTH_ABBREVIATIONS.get(i as usize))
            .copied()
            .unwrap_or("");
        let year = self.year.rem_euclid(100);
        format!("{} {:02}", month, year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    #[serde(rename = "minimo")]
    pub min: f64,
    #[serde(rename = "maximo")]
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionSummary {
    #[serde(rename = "horizonte_meses")]
    pub horizon_months: u32,
    #[serde(rename = "tendencia_detectada")]
    pub detected_trend: String,
    #[serde(rename = "suma_total_costo_proyectada")]
    pub projected_total_cost: f64,
    #[serde(rename = "rango_precios_estimado")]
    pub estimated_range: PriceRange,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionResponse {
    pub status: String,
    #[serde(rename = "metodo")]
    pub method: String,
    #[serde(rename = "resumen_proyeccion")]
    pub summary: ProjectionSummary,
    #[serde(rename = "datos_para_grafica", default)]
    pub points: Vec<ProjectionPoint>,
}

impl ProjectionResponse {
    pub fn predictions(&self) -> impl Iterator<Item = &ProjectionPoint> {
        self.points.iter().filter(|p| p.is_prediction())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategicAction {
    #[serde(rename = "accion")]
    pub action: String,
    #[serde(rename = "plazo_implementacion")]
    pub timeframe: String,
    #[serde(rename = "descripcion")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategicAnalysis {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "resumen_ejecutivo")]
    pub executive_summary: String,
    /// "BAJO", "MEDIO" or "ALTO" as sent by the service.
    #[serde(rename = "nivel_riesgo_presupuestal")]
    pub budget_risk_level: String,
    #[serde(rename = "acciones_estrategicas", default)]
    pub actions: Vec<StrategicAction>,
}

/// Reply of `GET prediccion/ia-analisis-estrategico`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyResponse {
    pub status: String,
    #[serde(rename = "analisis_ia")]
    pub analysis: StrategicAnalysis,
}
