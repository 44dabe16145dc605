//! Shared fixtures for the wiremock integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use pge_client::adapters::{InMemoryTokenStore, ReqwestHttpClient};
use pge_client::api::ApiClients;
use pge_client::config::ClientConfig;
use pge_client::repository::Repositories;
use serde_json::{json, Value};
use wiremock::MockServer;

/// Config pointing both backends at the mock server: the REST backend under
/// `/api`, the analytics service at the root.
pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_api_base_url(format!("{}/api", server.uri()))
        .with_analytics_base_url(server.uri())
}

/// Repositories over a real reqwest transport and an in-memory token store.
pub fn repositories(server: &MockServer, tokens: InMemoryTokenStore) -> Repositories {
    let clients = ApiClients::new(
        &config_for(server),
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(tokens),
    );
    Repositories::new(&clients)
}

pub fn chart(title: &str) -> Value {
    json!({
        "titulo": title,
        "eje_x": ["Ene", "Feb", "Mar"],
        "series": [
            {"nombre": "Salud", "datos": [120.5, 98.0, 143.25], "color": "#1f77b4"},
            {"nombre": "Educación", "datos": [80.0, 75.5, 90.0]}
        ],
        "dependencias_involucradas": ["SESA", "SEQ"]
    })
}

pub fn budget(id: i64, year: i32, quarter: u8, amount: f64) -> Value {
    json!({
        "id": id,
        "dependencia_id": 3,
        "año": year,
        "trimestre": quarter,
        "monto_asignado": amount,
        "created_at": "2025-01-15T10:00:00Z"
    })
}
