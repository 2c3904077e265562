//! Stable application-wide constants.
//!
//! Values here are structural invariants, algorithm coefficients, and default
//! fallbacks for env-var-based configuration. They should rarely change.
//! For tuning knobs that benefit from runtime experimentation, see
//! [`PlannerConfig`](crate::config::PlannerConfig) and
//! [`SafetyConfig`](crate::config::SafetyConfig) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

/// Default per-request timeout for the routes and geocoding providers.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

// --- Geodesy ---

/// Mean Earth radius used by the haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Flat-Earth approximation: kilometers per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

// --- Candidate search defaults ---

/// One-way distance as a fraction of the round-trip target for Phase 1.
/// Street-grid detours make the walked distance exceed the radial one, so
/// the endpoint sits well short of half the target.
pub const DEFAULT_PRIMARY_MULTIPLIER: f64 = 0.4;
/// Phase 2 multipliers, tried in order when Phase 1 is insufficient.
pub const DEFAULT_BACKUP_MULTIPLIERS: [f64; 2] = [0.35, 0.45];
/// Accuracy (%) at or above which a route counts as excellent.
pub const DEFAULT_EXCELLENT_ACCURACY: f64 = 95.0;
/// Accuracy (%) at or above which a route counts as good.
pub const DEFAULT_GOOD_ACCURACY: f64 = 90.0;
/// Accuracy (%) floor for the pooled Phase 2 result set.
pub const DEFAULT_FALLBACK_ACCURACY: f64 = 80.0;
/// Number of excellent (or good) Phase 1 routes that ends the search early.
pub const DEFAULT_MIN_SUFFICIENT_ROUTES: usize = 3;

// --- Safety scoring defaults ---

/// Maximum number of sampled path points per route.
pub const DEFAULT_SAFETY_SAMPLE_COUNT: usize = 5;
/// Incident lookup radius around each sampled point.
pub const DEFAULT_SAFETY_RADIUS_KM: f64 = 0.5;
/// Incident lookback window.
pub const DEFAULT_SAFETY_DAYS_BACK: u32 = 60;
/// Spacing (degrees) between baseline sample windows (~1.1 km of latitude).
pub const DEFAULT_BASELINE_GRID_STEP_DEG: f64 = 0.01;
/// Half-width of the baseline grid: offsets run from -2 to +2 (5x5 windows).
pub const BASELINE_GRID_HALF_WIDTH: i32 = 2;
/// Baselines are computed per cell of this many decimal places (~100m).
/// The grid is anchored on the cell center, so one cell has one baseline.
pub const BASELINE_CELL_DECIMALS: u32 = 3;
/// Segments scoring strictly below this are flagged dangerous.
pub const DEFAULT_DANGEROUS_THRESHOLD: f64 = 80.0;

/// Lower bound inside every logarithm; caps the "below average" bonus and avoids ln(0).
pub const RATIO_LOG_FLOOR: f64 = 0.1;
pub const CRASH_PENALTY_COEFFICIENT: f64 = 15.0;
pub const CRASH_PENALTY_MAX: f64 = 30.0;
pub const INJURY_PENALTY_COEFFICIENT: f64 = 20.0;
pub const INJURY_PENALTY_MAX: f64 = 35.0;
pub const FATALITY_PENALTY_COEFFICIENT: f64 = 25.0;
pub const FATALITY_PENALTY_MAX: f64 = 50.0;

// --- Ranking defaults ---

/// Weight of distance accuracy in the combined score.
pub const DEFAULT_ACCURACY_WEIGHT: f64 = 0.4;
/// Weight of mean safety in the combined score.
pub const DEFAULT_SAFETY_WEIGHT: f64 = 0.6;

// --- Baseline cache ---

/// Default baseline cache TTL: 6 hours. Overridden by `BASELINE_CACHE_TTL`.
pub const DEFAULT_BASELINE_CACHE_TTL_SECONDS: u64 = 21_600;
/// Maximum entries held by the in-memory baseline cache.
pub const DEFAULT_BASELINE_CACHE_MAX_ENTRIES: u64 = 10_000;

// --- Request validation ---

/// Longest round trip the HTTP layer accepts.
pub const MAX_TARGET_DISTANCE_KM: f64 = 50.0;

// --- Endpoint classification ---

/// Address fragments that mark a geocoded endpoint as water, off-grid, or
/// outside the covered jurisdiction. Overridden by `GEOCODING_IGNORE_KEYWORDS`.
pub const DEFAULT_IGNORE_KEYWORDS: [&str; 12] = [
    "North America",
    "Atlantic Ocean",
    "Hudson River",
    "East River",
    "New York Harbor",
    "Unnamed Road",
    "Jersey",
    "NJ",
    "Long Island",
    "Astoria",
    "+",
    "Plus Code",
];
