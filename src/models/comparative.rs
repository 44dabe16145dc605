//! Generic multi-series chart payload shared by all public comparisons.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSeries {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "datos")]
    pub values: Vec<f64>,
    #[serde(rename = "color", default)]
    pub color_hex: Option<String>,
}

/// Chart payload keyed by a shared x-axis label list.
///
/// Each series is expected to carry one value per label, but the server is
/// trusted; see [`ComparativeResult::is_consistent`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparativeResult {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "eje_x")]
    pub x_axis_labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    #[serde(rename = "dependencias_involucradas", default)]
    pub involved_entity_names: Vec<String>,
}

impl ComparativeResult {
    /// Whether every series has exactly one value per x-axis label.
    pub fn is_consistent(&self) -> bool {
        self.series
            .iter()
            .all(|s| s.values.len() == self.x_axis_labels.len())
    }
}

/// The four comparisons the public dashboard requests on every refresh,
/// in request order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparativeKind {
    Consumption,
    Cost,
    Ranking,
    BudgetVsExpense,
}

impl ComparativeKind {
    pub const ALL: [ComparativeKind; 4] = [
        ComparativeKind::Consumption,
        ComparativeKind::Cost,
        ComparativeKind::Ranking,
        ComparativeKind::BudgetVsExpense,
    ];

    /// Last path segment under `/analisis/publico/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ComparativeKind::Consumption => "comparativa-consumo",
            ComparativeKind::Cost => "comparativa-costos",
            ComparativeKind::Ranking => "ranking",
            ComparativeKind::BudgetVsExpense => "presupuesto-vs-gasto",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ComparativeResult {
        ComparativeResult {
            title: "Consumo mensual".to_string(),
            x_axis_labels: vec!["Ene".to_string(), "Feb".to_string()],
            series: vec![
                ChartSeries {
                    name: "Salud".to_string(),
                    values: vec![10.0, 12.5],
                    color_hex: Some("#FF0000".to_string()),
                },
                ChartSeries {
                    name: "Educación".to_string(),
                    values: vec![8.0, 9.0],
                    color_hex: None,
                },
            ],
            involved_entity_names: vec!["Salud".to_string(), "Educación".to_string()],
        }
    }

    #[test]
    fn test_round_trip_preserves_optional_fields() {
        let original = sample();
        let json = serde_json::to_string(&original).unwrap();
        let decoded: ComparativeResult = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.series[1].color_hex, None);
    }

    #[test]
    fn test_python_null_color() {
        let json = r#"{"titulo": "t", "eje_x": ["A"], "series": [{"nombre": "s", "datos": [1.0], "color": null}], "dependencias_involucradas": []}"#;
        let result: ComparativeResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.series[0].color_hex, None);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_inconsistent_lengths_are_accepted() {
        let mut result = sample();
        result.series[0].values.push(3.0);
        assert!(!result.is_consistent());
    }

    #[test]
    fn test_path_segments() {
        let segments: Vec<_> = ComparativeKind::ALL.iter().map(|k| k.path_segment()).collect();
        assert_eq!(
            segments,
            ["comparativa-consumo", "comparativa-costos", "ranking", "presupuesto-vs-gasto"]
        );
    }
}
