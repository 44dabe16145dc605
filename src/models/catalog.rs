//! Public catalog hierarchy: Sector → Dependency → Building.

use serde::{Deserialize, Serialize};

/// Common view over the three catalog levels.
pub trait CatalogItem {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
    /// Id of the parent item; sectors have none.
    fn parent_id(&self) -> Option<i64>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sector {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogDependency {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    pub sector_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Building {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "dependencia_id")]
    pub dependency_id: i64,
}

impl CatalogItem for Sector {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn parent_id(&self) -> Option<i64> {
        None
    }
}

impl CatalogItem for CatalogDependency {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn parent_id(&self) -> Option<i64> {
        Some(self.sector_id)
    }
}

impl CatalogItem for Building {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn parent_id(&self) -> Option<i64> {
        Some(self.dependency_id)
    }
}

/// Which catalog level the public comparison charts compare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ComparisonLevel {
    #[default]
    Sectors,
    Dependencies,
    Buildings,
}

impl ComparisonLevel {
    pub const ALL: [ComparisonLevel; 3] = [
        ComparisonLevel::Sectors,
        ComparisonLevel::Dependencies,
        ComparisonLevel::Buildings,
    ];

    /// Value of the `tipo_filtro` query parameter.
    pub fn filter_type(&self) -> &'static str {
        match self {
            ComparisonLevel::Sectors => "sector",
            ComparisonLevel::Dependencies => "dependencia",
            ComparisonLevel::Buildings => "edificio",
        }
    }

    /// Parse a level from a CLI/UI label. Accepts the English name, the
    /// Spanish screen label or the API filter name.
    pub fn parse(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "sectors" | "sectores" | "sector" => Some(ComparisonLevel::Sectors),
            "dependencies" | "dependencias" | "dependencia" => {
                Some(ComparisonLevel::Dependencies)
            }
            "buildings" | "edificios" | "edificio" => Some(ComparisonLevel::Buildings),
            _ => None,
        }
    }
}

impl std::fmt::Display for ComparisonLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ComparisonLevel::Sectors => "Sectors",
            ComparisonLevel::Dependencies => "Dependencies",
            ComparisonLevel::Buildings => "Buildings",
        };
        write!(f, "{}", label)
    }
}

/// Join the ids of `items` with commas, in order. Empty input gives "".
pub fn join_ids<T: CatalogItem>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.id().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
