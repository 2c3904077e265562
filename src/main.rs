use axum::Router;
use runsafe::cache::MemoryBaselineCache;
use runsafe::config::Config;
use runsafe::constants::DEFAULT_BASELINE_CACHE_MAX_ENTRIES;
use runsafe::db::{IncidentStore, PgIncidentStore};
use runsafe::services::geocoding::{
    EndpointClassifier, GoogleGeocodingClassifier, GOOGLE_GEOCODING_BASE_URL,
};
use runsafe::services::google_routes::{DistanceVerifier, GoogleRoutesClient};
use runsafe::services::route_planner::RoutePlanner;
use runsafe::services::safety::SafetyAnalyzer;
use runsafe::AppState;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runsafe=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting RunSafe API server");
    tracing::info!(
        primary_multiplier = config.planner.primary_multiplier,
        sample_count = config.safety.sample_count,
        "Configuration loaded successfully"
    );

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = runsafe::db::create_pool(&config.database_url).await?;
    tracing::info!("Database connection established");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize collaborators
    let timeout = Duration::from_secs(config.provider_timeout_secs);
    let incident_store: Arc<dyn IncidentStore> = Arc::new(PgIncidentStore::new(db_pool));

    let geocoding_base_url = config
        .geocoding_base_url
        .clone()
        .unwrap_or_else(|| GOOGLE_GEOCODING_BASE_URL.to_string());
    let classifier: Arc<dyn EndpointClassifier> = Arc::new(GoogleGeocodingClassifier::with_config(
        config.google_api_key.clone(),
        geocoding_base_url,
        config.ignore_keywords.clone(),
        timeout,
    )?);

    let verifier: Arc<dyn DistanceVerifier> = match config.routes_base_url {
        Some(ref base_url) => Arc::new(GoogleRoutesClient::with_base_url(
            config.google_api_key.clone(),
            base_url.clone(),
            timeout,
        )?),
        None => Arc::new(GoogleRoutesClient::new(config.google_api_key.clone(), timeout)?),
    };

    let baseline_cache = Arc::new(MemoryBaselineCache::new(
        config.baseline_cache_ttl,
        DEFAULT_BASELINE_CACHE_MAX_ENTRIES,
    ));
    let safety = SafetyAnalyzer::new(incident_store.clone(), config.safety.clone())
        .with_baseline_cache(baseline_cache);
    let planner = RoutePlanner::new(classifier, verifier, safety, config.planner.clone());

    // Create application state
    let state = Arc::new(AppState {
        incident_store,
        planner,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", runsafe::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
