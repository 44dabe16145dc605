//! Catalog cascade and comparison refresh against a mock analytics service.

mod common;

use pge_client::adapters::InMemoryTokenStore;
use pge_client::models::{Building, ComparativeKind, ComparisonLevel};
use pge_client::state::PublicDashboardController;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_sectors(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/catalogos/sectores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "nombre": "Salud"},
            {"id": 2, "nombre": "Educación"}
        ])))
        .mount(server)
        .await;
}

async fn mount_comparisons(server: &MockServer, ids: &str, filter: &str, year: &str) {
    for kind in ComparativeKind::ALL {
        Mock::given(method("GET"))
            .and(path(format!("/analisis/publico/{}", kind.path_segment())))
            .and(query_param("ids", ids))
            .and(query_param("tipo_filtro", filter))
            .and(query_param("anio", year))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(common::chart(kind.path_segment())),
            )
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_refresh_requests_all_four_charts() {
    let server = MockServer::start().await;
    mount_sectors(&server).await;
    mount_comparisons(&server, "1,2", "sector", "2024").await;

    let repos = common::repositories(&server, InMemoryTokenStore::new());
    let controller = PublicDashboardController::new(repos.catalog.clone());
    let cancel = CancellationToken::new();

    controller.state().update(|s| s.year = 2024);
    controller.load_sectors(&cancel).await.unwrap();
    controller.refresh(&cancel).await.unwrap();

    let state = controller.state().snapshot();
    assert_eq!(state.sectors.len(), 2);
    for kind in ComparativeKind::ALL {
        let chart = state.chart(kind).unwrap();
        assert_eq!(chart.title, kind.path_segment());
        assert!(chart.is_consistent());
    }
    assert!(!state.loading);
    assert_eq!(state.error, None);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);
    let paths: Vec<&str> = requests[1..].iter().map(|r| r.url.path()).collect();
    assert_eq!(
        paths,
        vec![
            "/analisis/publico/comparativa-consumo",
            "/analisis/publico/comparativa-costos",
            "/analisis/publico/ranking",
            "/analisis/publico/presupuesto-vs-gasto",
        ]
    );
}

#[tokio::test]
async fn test_select_sector_then_compare_its_dependencies() {
    let server = MockServer::start().await;
    mount_sectors(&server).await;
    Mock::given(method("GET"))
        .and(path("/catalogos/dependencias/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "nombre": "SESA", "sector_id": 1},
            {"id": 11, "nombre": "IMSS-Bienestar", "sector_id": 1}
        ])))
        .mount(&server)
        .await;
    mount_comparisons(&server, "1,2", "sector", "2025").await;
    mount_comparisons(&server, "10,11", "dependencia", "2025").await;

    let repos = common::repositories(&server, InMemoryTokenStore::new());
    let controller = PublicDashboardController::new(repos.catalog.clone());
    let cancel = CancellationToken::new();

    controller.load_sectors(&cancel).await.unwrap();
    let salud = controller.state().read(|s| s.sectors[0].clone());
    controller.select_sector(salud, &cancel).await.unwrap();
    controller
        .set_level(ComparisonLevel::Dependencies, &cancel)
        .await
        .unwrap();

    let state = controller.state().snapshot();
    assert_eq!(state.selected_sector.as_ref().map(|s| s.id), Some(1));
    assert_eq!(state.dependencies.len(), 2);
    assert_eq!(state.ids_at_level(), "10,11");

    let last = server.received_requests().await.unwrap().pop().unwrap();
    let query: Vec<(String, String)> = last.url.query_pairs().into_owned().collect();
    assert!(query.contains(&("ids".to_string(), "10,11".to_string())));
    assert!(query.contains(&("tipo_filtro".to_string(), "dependencia".to_string())));
}

#[tokio::test]
async fn test_select_sector_clears_children_before_fetching() {
    let server = MockServer::start().await;
    mount_sectors(&server).await;
    Mock::given(method("GET"))
        .and(path("/catalogos/dependencias/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let repos = common::repositories(&server, InMemoryTokenStore::new());
    let controller = PublicDashboardController::new(repos.catalog.clone());
    let cancel = CancellationToken::new();
    controller.load_sectors(&cancel).await.unwrap();

    let building = Building {
        id: 99,
        name: "Torre".to_string(),
        dependency_id: 10,
    };
    controller.state().update(|s| {
        s.buildings = vec![building.clone()];
        s.selected_building = Some(building);
    });

    let educacion = controller.state().read(|s| s.sectors[1].clone());
    assert!(controller.select_sector(educacion, &cancel).await.is_err());

    let state = controller.state().snapshot();
    assert!(state.buildings.is_empty());
    assert_eq!(state.selected_dependency, None);
    assert_eq!(state.selected_building, None);
    assert!(!state.loading);
    assert!(state
        .error
        .as_deref()
        .unwrap()
        .starts_with("Error loading dependencies: "));
}

#[tokio::test]
async fn test_refresh_with_nothing_loaded_sends_nothing() {
    let server = MockServer::start().await;
    let repos = common::repositories(&server, InMemoryTokenStore::new());
    let controller = PublicDashboardController::new(repos.catalog.clone());

    controller
        .set_level(ComparisonLevel::Buildings, &CancellationToken::new())
        .await
        .unwrap();

    let state = controller.state().snapshot();
    assert_eq!(state.consumption, None);
    assert!(!state.loading);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_chart_aborts_the_batch() {
    let server = MockServer::start().await;
    mount_sectors(&server).await;
    Mock::given(method("GET"))
        .and(path("/analisis/publico/comparativa-consumo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::chart("consumo")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/analisis/publico/comparativa-costos"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let repos = common::repositories(&server, InMemoryTokenStore::new());
    let controller = PublicDashboardController::new(repos.catalog.clone());
    let cancel = CancellationToken::new();
    controller.load_sectors(&cancel).await.unwrap();

    assert!(controller.refresh(&cancel).await.is_err());

    let state = controller.state().snapshot();
    assert!(state.consumption.is_some());
    assert_eq!(state.cost, None);
    assert_eq!(state.ranking, None);
    assert_eq!(state.error.as_deref(), Some("Error updating charts."));
    // sectors + two comparisons; the last two are never requested
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
