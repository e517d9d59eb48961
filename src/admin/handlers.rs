use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::config::schema::GatewayMode;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub mode: GatewayMode,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct AllowlistView {
    pub hosts: Vec<String>,
}

#[derive(Deserialize)]
pub struct ClassifyParams {
    #[serde(default)]
    pub host: String,
    pub path: String,
}

#[derive(Serialize)]
pub struct ClassifyResult {
    pub host: String,
    pub path: String,
    pub lane: &'static str,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let inner = state.inner.load_full();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        mode: inner.dispatcher.mode(),
        status: "operational",
    })
}

pub async fn get_allowlist(State(state): State<AppState>) -> Json<AllowlistView> {
    let inner = state.inner.load_full();
    Json(AllowlistView {
        hosts: inner.dispatcher.allowlist().entries(),
    })
}

/// Dry-run the dispatch decision for a host/path pair.
pub async fn classify_request(
    State(state): State<AppState>,
    Query(params): Query<ClassifyParams>,
) -> Json<ClassifyResult> {
    let inner = state.inner.load_full();
    let decision = inner.dispatcher.dispatch(&params.host, &params.path);
    Json(ClassifyResult {
        host: params.host,
        path: params.path,
        lane: decision.lane(),
    })
}
