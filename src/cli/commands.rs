//! Command handlers. Each one drives a state controller the way a screen
//! would and prints the resulting snapshot. After a cancelled fetch the
//! controller is back to its previous (idle) state.

use color_eyre::eyre::{bail, eyre, Result};
use std::fmt::Write as _;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::args::PredictionArgs;
use crate::error::PgeError;
use crate::models::{
    BudgetSummary, ComparativeKind, ComparativeResult, ComparisonLevel, DashboardQuery,
    DashboardSnapshot, Dependency, ProjectionResponse, StrategyResponse, UploadOutcome,
};
use crate::repository::Repositories;
use crate::state::{
    BudgetController, DashboardController, DependencyListController, LoadState,
    ProjectionController, PublicDashboardController, PublicDashboardState, SessionController,
    UploadController, ALL_DEPENDENCIES_LABEL,
};

/// Read the password from the terminal and log in.
pub async fn login(repos: &Repositories, email: &str, cancel: &CancellationToken) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;
    let controller = SessionController::new(repos.auth.clone());

    match controller.login(email, &password, cancel).await {
        Ok(session) => {
            println!("Logged in as {}", session.user.name);
            Ok(())
        }
        Err(err) => Err(eyre!(controller
            .state()
            .snapshot()
            .error
            .unwrap_or_else(|| err.to_string()))),
    }
}

pub async fn logout(repos: &Repositories) -> Result<()> {
    SessionController::new(repos.auth.clone()).logout().await?;
    println!("Logged out");
    Ok(())
}

pub async fn whoami(repos: &Repositories, cancel: &CancellationToken) -> Result<()> {
    let controller = SessionController::new(repos.auth.clone());
    match controller.check_session(cancel).await? {
        Some(user) => {
            match user.email {
                Some(ref email) => println!("{} <{}> (id {})", user.name, email, user.id),
                None => println!("{} (id {})", user.name, user.id),
            }
            Ok(())
        }
        None => bail!("Not logged in. Run `pge login <email>`."),
    }
}

pub async fn dashboard(
    repos: &Repositories,
    query: DashboardQuery,
    cancel: &CancellationToken,
) -> Result<()> {
    let controller = DashboardController::new(repos.dashboard.clone());
    let label = match query.dependency_id {
        Some(id) => format!("Dependency {}", id),
        None => ALL_DEPENDENCIES_LABEL.to_string(),
    };
    controller.state().update(|s| {
        s.query = query;
        s.dependency_label = label;
    });
    if let Err(err) = controller.fetch(cancel).await {
        debug!("Dashboard fetch failed: {}", err);
    }

    let state = controller.state().snapshot();
    match state.snapshot {
        LoadState::Success(ref snapshot) => {
            print!("{}", render_dashboard(&state.dependency_label, snapshot));
            Ok(())
        }
        LoadState::Error(message) => Err(eyre!(message)),
        LoadState::Idle | LoadState::Loading => Err(PgeError::Cancelled.into()),
    }
}

pub async fn dependencies(repos: &Repositories, cancel: &CancellationToken) -> Result<()> {
    let controller = DependencyListController::new(repos.dependencies.clone());
    controller.fetch(cancel).await?;
    print!("{}", render_dependencies(&controller.state().snapshot()));
    Ok(())
}

pub async fn budgets(
    repos: &Repositories,
    dependency_id: i64,
    year: Option<i32>,
    cancel: &CancellationToken,
) -> Result<()> {
    let controller = budget_controller(repos, dependency_id, cancel).await?;
    if let Some(year) = year {
        controller.set_year(year);
    }
    let state = controller.state().snapshot();
    print!("{}", render_budgets(state.year, &state.summary));
    Ok(())
}

pub async fn create_budget(
    repos: &Repositories,
    dependency_id: i64,
    year: &str,
    quarter: &str,
    amount: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    let controller = budget_controller(repos, dependency_id, cancel).await?;
    let created = controller.create_budget(year, quarter, amount, cancel).await;
    let state = controller.state().snapshot();

    match created {
        Ok(budget) => {
            if let Some(notice) = state.notice {
                println!("{}", notice);
            }
            let year = budget
                .map(|b| b.year)
                .or_else(|| year.trim().parse().ok())
                .unwrap_or(state.year);
            controller.set_year(year);
            print!("{}", render_budgets(year, &controller.state().snapshot().summary));
            Ok(())
        }
        Err(err) => Err(eyre!(state.notice.unwrap_or_else(|| err.user_message()))),
    }
}

/// Budget controller with the given dependency selected and its history
/// loaded.
async fn budget_controller(
    repos: &Repositories,
    dependency_id: i64,
    cancel: &CancellationToken,
) -> Result<BudgetController> {
    let controller = BudgetController::new(repos.dependencies.clone(), repos.budgets.clone());
    let dependency = Dependency {
        id: dependency_id,
        name: String::new(),
        building_count: 0,
        sector_id: None,
    };
    controller.select_dependency(dependency, cancel).await?;
    Ok(controller)
}

pub async fn upload(repos: &Repositories, path: &Path, cancel: &CancellationToken) -> Result<()> {
    let controller = UploadController::new(repos.uploads.clone());
    let result = controller.upload_file(path, cancel).await;

    match controller.state().snapshot() {
        LoadState::Success(outcome) => {
            print!("{}", render_upload(&outcome));
            if outcome.is_success() {
                Ok(())
            } else {
                bail!("Upload rejected ({})", outcome.status)
            }
        }
        LoadState::Error(message) => Err(eyre!(message)),
        LoadState::Idle | LoadState::Loading => Err(result
            .err()
            .map(color_eyre::Report::from)
            .unwrap_or_else(|| PgeError::Cancelled.into())),
    }
}

pub async fn public(
    repos: &Repositories,
    level: ComparisonLevel,
    year: Option<i32>,
    sector_id: Option<i64>,
    dependency_id: Option<i64>,
    cancel: &CancellationToken,
) -> Result<()> {
    let controller = PublicDashboardController::new(repos.catalog.clone());
    controller.state().update(|s| {
        s.level = level;
        if let Some(year) = year {
            s.year = year;
        }
    });

    controller.load_sectors(cancel).await?;

    match sector_id {
        Some(sector_id) => {
            let sector = controller
                .state()
                .read(|s| s.sectors.iter().find(|x| x.id == sector_id).cloned())
                .ok_or_else(|| eyre!("Unknown sector {}", sector_id))?;
            controller.select_sector(sector, cancel).await?;

            if let Some(dependency_id) = dependency_id {
                let dependency = controller
                    .state()
                    .read(|s| s.dependencies.iter().find(|x| x.id == dependency_id).cloned())
                    .ok_or_else(|| eyre!("Unknown dependency {} in this sector", dependency_id))?;
                controller.select_dependency(dependency, cancel).await?;
            }
        }
        None if dependency_id.is_some() => bail!("--dependency needs --sector"),
        None => controller.refresh(cancel).await?,
    }

    print!("{}", render_public(&controller.state().snapshot()));
    Ok(())
}

pub async fn projection(
    repos: &Repositories,
    args: PredictionArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let controller = prediction_controller(repos, args);
    if let Err(err) = controller.fetch(cancel).await {
        debug!("Projection fetch failed: {}", err);
    }

    match controller.state().snapshot().projection {
        LoadState::Success(ref response) => {
            print!("{}", render_projection(response));
            Ok(())
        }
        LoadState::Error(message) => Err(eyre!(message)),
        LoadState::Idle | LoadState::Loading => Err(PgeError::Cancelled.into()),
    }
}

pub async fn strategy(
    repos: &Repositories,
    args: PredictionArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let controller = prediction_controller(repos, args);
    if let Err(err) = controller.fetch_strategy(cancel).await {
        debug!("Strategy fetch failed: {}", err);
    }

    match controller.state().snapshot().strategy {
        LoadState::Success(ref response) => {
            print!("{}", render_strategy(response));
            Ok(())
        }
        LoadState::Error(message) => Err(eyre!(message)),
        LoadState::Idle | LoadState::Loading => Err(PgeError::Cancelled.into()),
    }
}

fn prediction_controller(repos: &Repositories, args: PredictionArgs) -> ProjectionController {
    let controller = ProjectionController::new(repos.predictions.clone());
    if let Some(months) = args.months {
        controller.state().update(|s| s.query.months = months);
    }
    controller.set_include_history(args.history);
    controller.set_dependency(args.dependency);
    debug!(query = ?controller.state().read(|s| s.query), "Prediction filters");
    controller
}

fn render_dashboard(label: &str, snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let period = &snapshot.period;
    let kpis = &snapshot.kpis;
    let _ = writeln!(
        out,
        "{} - {:02}/{} (Q{})",
        label, period.month, period.year, period.quarter
    );
    let _ = writeln!(out, "  Consumption:     {:>14.2} kWh", kpis.consumption_kwh);
    let _ = writeln!(out, "  Cost:            {:>14.2}", kpis.cost_amount);
    let _ = writeln!(out, "  Quarter budget:  {:>14.2}", kpis.quarter_budget);
    if let Some(pct) = kpis.pct_executed {
        let _ = writeln!(out, "  Executed:        {:>13.1}%", pct);
    }

    if !snapshot.evolution_series.is_empty() {
        let _ = writeln!(out, "\nEvolution");
        for point in &snapshot.evolution_series {
            let _ = writeln!(
                out,
                "  {:02}/{}  {:>12.2} kWh  {:>12.2}",
                point.month, point.year, point.total_consumption, point.total_cost
            );
        }
    }

    if !snapshot.top_buildings.is_empty() {
        let _ = writeln!(out, "\nTop buildings");
        for building in &snapshot.top_buildings {
            let _ = writeln!(
                out,
                "  {:<40} {:>12.2} kWh",
                building.building_name, building.consumption_kwh
            );
        }
    }
    out
}

fn render_dependencies(dependencies: &[Dependency]) -> String {
    if dependencies.is_empty() {
        return "No dependencies\n".to_string();
    }
    let mut out = String::new();
    for dependency in dependencies {
        let _ = write!(out, "{:>5}  {}", dependency.id, dependency.name);
        if dependency.building_count > 0 {
            let _ = write!(out, " ({} buildings)", dependency.building_count);
        }
        out.push('\n');
    }
    out
}

fn render_budgets(year: i32, summary: &BudgetSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Budgets {}", year);
    if summary.budgets.is_empty() {
        let _ = writeln!(out, "  No allocations");
    }
    for budget in &summary.budgets {
        let _ = writeln!(out, "  Q{}  {:>14.2}", budget.quarter, budget.amount);
    }
    let _ = writeln!(out, "  Total    {:>11.2}", summary.total);
    let _ = writeln!(out, "  Average  {:>11.2}", summary.average);
    out
}

fn render_upload(outcome: &UploadOutcome) -> String {
    let mut out = String::new();
    let response = &outcome.response;
    if let Some(ref message) = response.message {
        let _ = writeln!(out, "{}", message);
    }
    if let Some(ref error) = response.error {
        let _ = writeln!(out, "Error: {}", error);
    }
    for line in outcome.detail_lines() {
        let _ = writeln!(out, "  {}", line);
    }
    if out.is_empty() {
        let _ = writeln!(out, "Server replied {}", outcome.status);
    }
    out
}

fn render_chart(out: &mut String, kind: ComparativeKind, chart: &ComparativeResult) {
    let _ = writeln!(out, "\n{} [{}]", chart.title, kind.path_segment());
    if !chart.is_consistent() {
        let _ = writeln!(out, "  (series and axis lengths differ)");
    }
    for series in &chart.series {
        let _ = writeln!(out, "  {}", series.name);
        for (label, value) in chart.x_axis_labels.iter().zip(&series.values) {
            let _ = writeln!(out, "    {:<24} {:>14.2}", label, value);
        }
    }
}

fn render_public(state: &PublicDashboardState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Public comparison {} ({})", state.year, state.level);
    if let Some(ref sector) = state.selected_sector {
        let _ = writeln!(out, "  Sector: {}", sector.name);
    }
    if let Some(ref dependency) = state.selected_dependency {
        let _ = writeln!(out, "  Dependency: {}", dependency.name);
    }
    for kind in ComparativeKind::ALL {
        if let Some(chart) = state.chart(kind) {
            render_chart(&mut out, kind, chart);
        }
    }
    if let Some(ref error) = state.error {
        let _ = writeln!(out, "\n{}", error);
    }
    out
}

fn render_projection(response: &ProjectionResponse) -> String {
    let mut out = String::new();
    let summary = &response.summary;
    let _ = writeln!(out, "Projection ({}), {} months", response.method, summary.horizon_months);
    let _ = writeln!(out, "  Trend: {}", summary.detected_trend);
    let _ = writeln!(out, "  Projected cost: {:.2}", summary.projected_total_cost);
    let _ = writeln!(
        out,
        "  Estimated range: {:.2} - {:.2}",
        summary.estimated_range.min, summary.estimated_range.max
    );
    for point in &response.points {
        let marker = if point.is_prediction() { "*" } else { " " };
        let _ = writeln!(
            out,
            "  {}{:<7} {:>12.2} kWh {:>12.2}",
            marker,
            point.label(),
            point.total_kwh,
            point.total_cost
        );
    }
    out
}

fn render_strategy(response: &StrategyResponse) -> String {
    let mut out = String::new();
    let analysis = &response.analysis;
    let _ = writeln!(out, "{}", analysis.title);
    let _ = writeln!(out, "Budget risk: {}\n", analysis.budget_risk_level);
    let _ = writeln!(out, "{}", analysis.executive_summary);
    for (i, action) in analysis.actions.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {} ({})", i + 1, action.action, action.timeframe);
        let _ = writeln!(out, "   {}", action.description);
    }
    out
}
