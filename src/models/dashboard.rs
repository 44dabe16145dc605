//! Private dashboard payload (`GET dashboard`).

use serde::{Deserialize, Serialize};

use super::number::{number_or_string, optional_number_or_string};

/// Filters accepted by the dashboard endpoint. Every field defaults to
/// `None`, which omits the parameter and lets the server pick (all
/// dependencies, current month and year).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    pub dependency_id: Option<i64>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl DashboardQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dependency(mut self, dependency_id: Option<i64>) -> Self {
        self.dependency_id = dependency_id;
        self
    }

    pub fn with_month(mut self, month: Option<u32>) -> Self {
        self.month = month;
        self
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Period {
    #[serde(rename = "mes")]
    pub month: u32,
    #[serde(rename = "año")]
    pub year: i32,
    #[serde(rename = "trimestre")]
    pub quarter: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Kpis {
    #[serde(rename = "consumo_mes_kwh", deserialize_with = "number_or_string")]
    pub consumption_kwh: f64,
    #[serde(rename = "costo_mes", deserialize_with = "number_or_string")]
    pub cost_amount: f64,
    #[serde(rename = "presupuesto_trimestre", deserialize_with = "number_or_string")]
    pub quarter_budget: f64,
    #[serde(
        rename = "porcentaje_ejecucion",
        default,
        deserialize_with = "optional_number_or_string"
    )]
    pub pct_executed: Option<f64>,
}

/// One month of the consumption/cost evolution series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvolutionPoint {
    #[serde(rename = "año")]
    pub year: i32,
    #[serde(rename = "mes")]
    pub month: u32,
    #[serde(rename = "total_consumo", deserialize_with = "number_or_string")]
    pub total_consumption: f64,
    #[serde(rename = "total_costo", deserialize_with = "number_or_string")]
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildingConsumption {
    #[serde(rename = "nombre_edificio")]
    pub building_name: String,
    #[serde(rename = "consumo", deserialize_with = "number_or_string")]
    pub consumption_kwh: f64,
}

/// Everything the dashboard screen shows for one query. Replaced wholesale
/// on every fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub status: String,
    #[serde(rename = "periodo")]
    pub period: Period,
    pub kpis: Kpis,
    #[serde(rename = "data_evolucion", default)]
    pub evolution_series: Vec<EvolutionPoint>,
    #[serde(rename = "data_inmuebles", default)]
    pub top_buildings: Vec<BuildingConsumption>,
}
