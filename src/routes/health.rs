use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(root))
}

async fn root() -> Json<Value> {
    info!("GET / - Liveness check");
    Json(json!({
        "status": "healthy",
        "message": "Cryptofolio backend is running"
    }))
}
