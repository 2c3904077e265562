use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /health - Check that the incident store is reachable
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    match state.incident_store.count().await {
        Ok(count) => {
            status["checks"]["database"] = json!("ok");
            status["checks"]["crash_count"] = json!(count);
        }
        Err(e) => {
            status["checks"]["database"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    Json(status)
}
