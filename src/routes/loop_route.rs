use crate::error::{AppError, Result};
use crate::models::route::{LoopRouteRequest, RouteResponse};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /routes/loop
/// Plan out-and-back routes of roughly `distance_km`, ranked by accuracy and safety
pub async fn create_loop_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoopRouteRequest>,
) -> Result<Json<RouteResponse>> {
    request.validate().map_err(AppError::InvalidRequest)?;

    tracing::info!(
        lat = request.start_point.lat,
        lng = request.start_point.lng,
        distance_km = request.distance_km,
        "Loop route request: ({:.4}, {:.4}), {:.1}km",
        request.start_point.lat, request.start_point.lng, request.distance_km
    );

    let response = state
        .planner
        .plan_routes(request.start_point, request.distance_km)
        .await?;

    tracing::info!(
        routes = response.routes.len(),
        termination = %response.search.termination,
        "Returning {} routes",
        response.routes.len()
    );

    Ok(Json(response))
}
