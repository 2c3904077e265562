use crate::constants::*;
use std::env;
use std::str::FromStr;

/// Read an env var, falling back to `default` when it is absent.
fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| format!("Invalid {}", key)),
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated list of multipliers, e.g. "0.35,0.45".
fn parse_multipliers(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| format!("Invalid multiplier '{}' in ROUTE_BACKUP_MULTIPLIERS", s))
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub google_api_key: String,
    /// Overrides the Google Routes endpoint (proxies, tests)
    pub routes_base_url: Option<String>,
    /// Overrides the Google Geocoding endpoint
    pub geocoding_base_url: Option<String>,
    pub provider_timeout_secs: u64,
    pub baseline_cache_ttl: u64,
    pub ignore_keywords: Vec<String>,
    pub planner: PlannerConfig,
    pub safety: SafetyConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Fraction of the round-trip target used as one-way distance in Phase 1
    pub primary_multiplier: f64,

    /// Multipliers swept in Phase 2, in order
    pub backup_multipliers: Vec<f64>,

    /// Accuracy (%) for a route to count as excellent
    pub excellent_accuracy: f64,

    /// Accuracy (%) for a route to count as good
    pub good_accuracy: f64,

    /// Accuracy floor (%) applied to the pooled Phase 2 results
    pub fallback_accuracy: f64,

    /// Excellent/good count that stops the search after Phase 1
    pub min_sufficient_routes: usize,

    /// Weight of accuracy in the combined ranking score
    pub accuracy_weight: f64,

    /// Weight of mean safety in the combined ranking score
    pub safety_weight: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            primary_multiplier: DEFAULT_PRIMARY_MULTIPLIER,
            backup_multipliers: DEFAULT_BACKUP_MULTIPLIERS.to_vec(),
            excellent_accuracy: DEFAULT_EXCELLENT_ACCURACY,
            good_accuracy: DEFAULT_GOOD_ACCURACY,
            fallback_accuracy: DEFAULT_FALLBACK_ACCURACY,
            min_sufficient_routes: DEFAULT_MIN_SUFFICIENT_ROUTES,
            accuracy_weight: DEFAULT_ACCURACY_WEIGHT,
            safety_weight: DEFAULT_SAFETY_WEIGHT,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let backup_multipliers = match env::var("ROUTE_BACKUP_MULTIPLIERS") {
            Ok(raw) => parse_multipliers(&raw)?,
            Err(_) => defaults.backup_multipliers.clone(),
        };

        let config = Self {
            primary_multiplier: env_or("ROUTE_PRIMARY_MULTIPLIER", defaults.primary_multiplier)?,
            backup_multipliers,
            excellent_accuracy: env_or("ROUTE_EXCELLENT_ACCURACY", defaults.excellent_accuracy)?,
            good_accuracy: env_or("ROUTE_GOOD_ACCURACY", defaults.good_accuracy)?,
            fallback_accuracy: env_or("ROUTE_FALLBACK_ACCURACY", defaults.fallback_accuracy)?,
            min_sufficient_routes: env_or(
                "ROUTE_MIN_SUFFICIENT_ROUTES",
                defaults.min_sufficient_routes,
            )?,
            accuracy_weight: env_or("RANK_ACCURACY_WEIGHT", defaults.accuracy_weight)?,
            safety_weight: env_or("RANK_SAFETY_WEIGHT", defaults.safety_weight)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let all_multipliers =
            std::iter::once(&self.primary_multiplier).chain(self.backup_multipliers.iter());
        for m in all_multipliers {
            if !(*m > 0.0 && *m <= 1.0) {
                return Err(format!("Route multiplier {} must be in (0, 1]", m));
            }
        }
        if self.good_accuracy > self.excellent_accuracy {
            return Err("ROUTE_GOOD_ACCURACY must not exceed ROUTE_EXCELLENT_ACCURACY".to_string());
        }
        if self.min_sufficient_routes == 0 {
            return Err("ROUTE_MIN_SUFFICIENT_ROUTES must be at least 1".to_string());
        }
        if self.accuracy_weight < 0.0 || self.safety_weight < 0.0 {
            return Err("Ranking weights must be non-negative".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SafetyConfig {
    /// Maximum sampled points per route path
    pub sample_count: usize,

    /// Incident lookup radius around each sampled point (km)
    pub radius_km: f64,

    /// Incident lookback window (days)
    pub days_back: u32,

    /// Spacing of the 5x5 baseline grid (degrees)
    pub baseline_grid_step_deg: f64,

    /// Segments scoring below this are reported as dangerous
    pub dangerous_threshold: f64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAFETY_SAMPLE_COUNT,
            radius_km: DEFAULT_SAFETY_RADIUS_KM,
            days_back: DEFAULT_SAFETY_DAYS_BACK,
            baseline_grid_step_deg: DEFAULT_BASELINE_GRID_STEP_DEG,
            dangerous_threshold: DEFAULT_DANGEROUS_THRESHOLD,
        }
    }
}

impl SafetyConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            sample_count: env_or("SAFETY_SAMPLE_COUNT", defaults.sample_count)?,
            radius_km: env_or("SAFETY_RADIUS_KM", defaults.radius_km)?,
            days_back: env_or("SAFETY_DAYS_BACK", defaults.days_back)?,
            baseline_grid_step_deg: env_or(
                "SAFETY_BASELINE_GRID_STEP_DEG",
                defaults.baseline_grid_step_deg,
            )?,
            dangerous_threshold: env_or(
                "SAFETY_DANGEROUS_THRESHOLD",
                defaults.dangerous_threshold,
            )?,
        };

        if config.sample_count < 2 {
            return Err("SAFETY_SAMPLE_COUNT must be at least 2".to_string());
        }
        if config.radius_km <= 0.0 || config.radius_km > 5.0 {
            return Err("SAFETY_RADIUS_KM must be between 0 and 5 km".to_string());
        }
        if config.baseline_grid_step_deg <= 0.0 {
            return Err("SAFETY_BASELINE_GRID_STEP_DEG must be positive".to_string());
        }
        Ok(config)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let ignore_keywords = match env::var("GEOCODING_IGNORE_KEYWORDS") {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => DEFAULT_IGNORE_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            google_api_key: env::var("GOOGLE_ROUTES_API_KEY")
                .map_err(|_| "GOOGLE_ROUTES_API_KEY must be set")?,
            routes_base_url: env::var("GOOGLE_ROUTES_BASE_URL").ok(),
            geocoding_base_url: env::var("GOOGLE_GEOCODING_BASE_URL").ok(),
            provider_timeout_secs: env_or("PROVIDER_TIMEOUT_SECS", DEFAULT_PROVIDER_TIMEOUT_SECS)?,
            baseline_cache_ttl: env_or("BASELINE_CACHE_TTL", DEFAULT_BASELINE_CACHE_TTL_SECONDS)?,
            ignore_keywords,
            planner: PlannerConfig::from_env()?,
            safety: SafetyConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
