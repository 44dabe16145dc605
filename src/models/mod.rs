pub mod auth;
pub mod budget;
pub mod catalog;
pub mod comparative;
pub mod dashboard;
mod dependency;
mod number;
pub mod projection;
mod upload;

pub use auth::{LoginRequest, LoginResponse, Session, User};
pub use budget::{quarter_from_label, summarize, Budget, BudgetSummary, CreateBudgetRequest};
pub use catalog::{join_ids, Building, CatalogDependency, CatalogItem, ComparisonLevel, Sector};
pub use comparative::{ChartSeries, ComparativeKind, ComparativeResult};
pub use dashboard::{
    BuildingConsumption, DashboardQuery, DashboardSnapshot, EvolutionPoint, Kpis, Period,
};
pub use dependency::Dependency;
pub use projection::{
    PointKind, PriceRange, ProjectionPoint, ProjectionQuery, ProjectionResponse,
    ProjectionSummary, StrategicAction, StrategicAnalysis, StrategyResponse,
};
pub use upload::{UploadErrorDetail, UploadOutcome, UploadResponse};
