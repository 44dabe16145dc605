//! Public comparison dashboard: the Sector → Dependency → Building cascade
//! and the four comparison charts.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::store::{cancellable, Store};
use crate::error::{PgeError, PgeResult};
use crate::models::{
    join_ids, Building, CatalogDependency, ComparativeKind, ComparativeResult, ComparisonLevel,
    Sector,
};
use crate::repository::CatalogRepository;

pub const DEFAULT_PUBLIC_YEAR: i32 = 2025;
pub const FIRST_PUBLIC_YEAR: i32 = 2015;

/// Years offered by the year picker, newest first.
pub fn available_public_years() -> Vec<i32> {
    (FIRST_PUBLIC_YEAR..=DEFAULT_PUBLIC_YEAR).rev().collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublicDashboardState {
    pub sectors: Vec<Sector>,
    pub dependencies: Vec<CatalogDependency>,
    pub buildings: Vec<Building>,
    pub selected_sector: Option<Sector>,
    pub selected_dependency: Option<CatalogDependency>,
    pub selected_building: Option<Building>,
    pub level: ComparisonLevel,
    pub year: i32,
    pub consumption: Option<ComparativeResult>,
    pub cost: Option<ComparativeResult>,
    pub ranking: Option<ComparativeResult>,
    pub budget_vs_expense: Option<ComparativeResult>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for PublicDashboardState {
    fn default() -> Self {
        Self {
            sectors: Vec::new(),
            dependencies: Vec::new(),
            buildings: Vec::new(),
            selected_sector: None,
            selected_dependency: None,
            selected_building: None,
            level: ComparisonLevel::default(),
            year: DEFAULT_PUBLIC_YEAR,
            consumption: None,
            cost: None,
            ranking: None,
            budget_vs_expense: None,
            loading: false,
            error: None,
        }
    }
}

impl PublicDashboardState {
    pub fn chart(&self, kind: ComparativeKind) -> Option<&ComparativeResult> {
        match kind {
            ComparativeKind::Consumption => self.consumption.as_ref(),
            ComparativeKind::Cost => self.cost.as_ref(),
            ComparativeKind::Ranking => self.ranking.as_ref(),
            ComparativeKind::BudgetVsExpense => self.budget_vs_expense.as_ref(),
        }
    }

    fn set_chart(&mut self, kind: ComparativeKind, result: ComparativeResult) {
        let slot = match kind {
            ComparativeKind::Consumption => &mut self.consumption,
            ComparativeKind::Cost => &mut self.cost,
            ComparativeKind::Ranking => &mut self.ranking,
            ComparativeKind::BudgetVsExpense => &mut self.budget_vs_expense,
        };
        *slot = Some(result);
    }

    /// Comma-joined ids of every loaded item at the current level.
    pub fn ids_at_level(&self) -> String {
        match self.level {
            ComparisonLevel::Sectors => join_ids(&self.sectors),
            ComparisonLevel::Dependencies => join_ids(&self.dependencies),
            ComparisonLevel::Buildings => join_ids(&self.buildings),
        }
    }
}

pub struct PublicDashboardController {
    catalog: Arc<CatalogRepository>,
    state: Store<PublicDashboardState>,
}

impl PublicDashboardController {
    pub fn new(catalog: Arc<CatalogRepository>) -> Self {
        Self {
            catalog,
            state: Store::default(),
        }
    }

    pub fn state(&self) -> &Store<PublicDashboardState> {
        &self.state
    }

    pub fn clear_error(&self) {
        self.state.update(|s| s.error = None);
    }

    pub async fn load_sectors(&self, cancel: &CancellationToken) -> PgeResult<()> {
        self.start_loading();
        let result = cancellable(cancel, self.catalog.sectors()).await;

        match result {
            Ok(sectors) => {
                debug!(count = sectors.len(), "Sectors loaded");
                self.state.update(|s| {
                    s.sectors = sectors;
                    s.loading = false;
                });
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Error: ")),
        }
    }

    /// Select a sector, drop everything below it, load its dependencies and
    /// refresh the charts.
    pub async fn select_sector(&self, sector: Sector, cancel: &CancellationToken) -> PgeResult<()> {
        let sector_id = sector.id;
        self.state.update(|s| {
            s.selected_sector = Some(sector);
            s.selected_dependency = None;
            s.selected_building = None;
            s.buildings.clear();
            s.loading = true;
            s.error = None;
        });

        match cancellable(cancel, self.catalog.dependencies(sector_id)).await {
            Ok(dependencies) => {
                self.state.update(|s| s.dependencies = dependencies);
                self.refresh(cancel).await
            }
            Err(err) => Err(self.fail(err, "Error loading dependencies: ")),
        }
    }

    /// Select a dependency, drop the building selection, load its buildings
    /// and refresh the charts.
    pub async fn select_dependency(
        &self,
        dependency: CatalogDependency,
        cancel: &CancellationToken,
    ) -> PgeResult<()> {
        let dependency_id = dependency.id;
        self.state.update(|s| {
            s.selected_dependency = Some(dependency);
            s.selected_building = None;
            s.loading = true;
            s.error = None;
        });

        match cancellable(cancel, self.catalog.buildings(dependency_id)).await {
            Ok(buildings) => {
                self.state.update(|s| s.buildings = buildings);
                self.refresh(cancel).await
            }
            Err(err) => Err(self.fail(err, "Error loading buildings: ")),
        }
    }

    pub async fn select_building(
        &self,
        building: Building,
        cancel: &CancellationToken,
    ) -> PgeResult<()> {
        self.state.update(|s| s.selected_building = Some(building));
        self.refresh(cancel).await
    }

    /// Change the comparison level. Going back to sectors also drops the
    /// dependency and building selections.
    pub async fn set_level(&self, level: ComparisonLevel, cancel: &CancellationToken) -> PgeResult<()> {
        self.state.update(|s| {
            s.level = level;
            if level == ComparisonLevel::Sectors {
                s.selected_dependency = None;
                s.selected_building = None;
            }
        });
        self.refresh(cancel).await
    }

    pub async fn set_year(&self, year: i32, cancel: &CancellationToken) -> PgeResult<()> {
        self.state.update(|s| s.year = year);
        self.refresh(cancel).await
    }

    /// Request the four charts for every loaded item at the current level.
    ///
    /// With nothing loaded at that level no request is made and the previous
    /// charts stay as they are. The requests run one after another and the
    /// first failure abandons the rest of the batch.
    pub async fn refresh(&self, cancel: &CancellationToken) -> PgeResult<()> {
        let (ids, level, year) = self.state.read(|s| (s.ids_at_level(), s.level, s.year));

        if ids.is_empty() {
            debug!(%level, "Nothing loaded at this level, charts left unchanged");
            self.state.update(|s| s.loading = false);
            return Ok(());
        }

        self.start_loading();
        debug!(year, ids = %ids, filter = level.filter_type(), "Refreshing comparisons");

        for kind in ComparativeKind::ALL {
            match cancellable(cancel, self.catalog.comparative(kind, year, &ids, level)).await {
                Ok(result) => self.state.update(|s| s.set_chart(kind, result)),
                Err(PgeError::Cancelled) => {
                    self.state.update(|s| s.loading = false);
                    return Err(PgeError::Cancelled);
                }
                Err(err) => {
                    warn!(chart = kind.path_segment(), "Comparison request failed: {}", err);
                    self.state.update(|s| {
                        s.loading = false;
                        s.error = Some("Error updating charts.".to_string());
                    });
                    return Err(err);
                }
            }
        }

        self.state.update(|s| s.loading = false);
        Ok(())
    }

    fn start_loading(&self) {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    /// Record a failed catalog fetch and hand the error back.
    fn fail(&self, err: PgeError, prefix: &str) -> PgeError {
        let message = (!err.is_cancelled()).then(|| format!("{}{}", prefix, err.user_message()));
        if message.is_some() {
            warn!("{}{}", prefix, err);
        }
        self.state.update(|s| {
            s.loading = false;
            if message.is_some() {
                s.error = message;
            }
        });
        err
    }
}
