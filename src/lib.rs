// Library exports for testing and reusability

pub mod cache;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use db::IncidentStore;
use services::route_planner::RoutePlanner;
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub incident_store: Arc<dyn IncidentStore>,
    pub planner: RoutePlanner,
}
