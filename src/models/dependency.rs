use serde::{Deserialize, Serialize};

/// A government department (dependencia) as listed by `GET dependencias`.
///
/// The general listing and the budget module return different subsets of
/// these fields; missing ones fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dependency {
    #[serde(rename = "id_dependencia")]
    pub id: i64,
    #[serde(rename = "nombre_dependencia")]
    pub name: String,
    #[serde(rename = "edificios_count", default)]
    pub building_count: i64,
    #[serde(default)]
    pub sector_id: Option<i64>,
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
