use crate::api::AppState;
use axum::{extract::State, Json};
use mongodb::bson::doc;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    database_connected: bool,
    uptime_seconds: u64,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    // Test MongoDB connection
    let database_connected = state
        .database
        .run_command(doc! { "ping": 1 })
        .await
        .is_ok();

    Json(HealthResponse {
        status: if database_connected {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        database_connected,
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

pub async fn root() -> &'static str {
    "Campus Placement API"
}
