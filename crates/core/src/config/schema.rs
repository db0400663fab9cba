//! Configuration schema definitions
//!
//! Every section has defaults, so an empty file (or no file) is a valid
//! configuration. The generator and filters receive these values explicitly;
//! nothing reads them from globals.

use crate::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Synthetic location generator settings
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Deduplication and radius filter settings
    #[serde(default)]
    pub proximity: ProximityConfig,

    /// External data providers
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("server.port must be non-zero"));
        }

        let g = &self.generator;
        if !(-90.0..=90.0).contains(&g.default_latitude)
            || !(-180.0..=180.0).contains(&g.default_longitude)
        {
            return Err(invalid(format!(
                "generator default center ({}, {}) is out of range",
                g.default_latitude, g.default_longitude
            )));
        }
        for (name, window) in [
            ("surplus_window_deg", g.surplus_window_deg),
            ("shortage_window_deg", g.shortage_window_deg),
            ("community_window_deg", g.community_window_deg),
        ] {
            if !(window > 0.0 && window <= MAX_WINDOW_DEG) {
                return Err(invalid(format!(
                    "generator.{name} must be in (0, {MAX_WINDOW_DEG}], got {window}"
                )));
            }
        }
        if g.surplus_count > MAX_GENERATED || g.shortage_count > MAX_GENERATED {
            return Err(invalid(format!(
                "generator counts must not exceed {MAX_GENERATED}"
            )));
        }

        let p = &self.proximity;
        if !(p.duplicate_threshold_km > 0.0 && p.duplicate_threshold_km.is_finite()) {
            return Err(invalid("proximity.duplicate_threshold_km must be positive"));
        }
        if !(p.default_radius_km > 0.0 && p.default_radius_km.is_finite()) {
            return Err(invalid("proximity.default_radius_km must be positive"));
        }

        if self.providers.timeout_secs == 0 {
            return Err(invalid("providers.timeout_secs must be non-zero"));
        }

        Ok(())
    }
}

/// Offsets beyond one degree (~111 km) stop looking like "nearby".
const MAX_WINDOW_DEG: f64 = 1.0;

/// Upper bound on records generated per call.
const MAX_GENERATED: usize = 100;

fn invalid(message: impl Into<String>) -> Error {
    Error::new(ErrorCode::ConfigValidationError, message)
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind (overridden by `PORT`)
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Synthetic location generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Fallback center latitude when a request has none (New Delhi)
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,

    /// Fallback center longitude when a request has none (New Delhi)
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,

    /// Surplus records per call
    #[serde(default = "default_surplus_count")]
    pub surplus_count: usize,

    /// Shortage records per call
    #[serde(default = "default_shortage_count")]
    pub shortage_count: usize,

    /// Half-width of the surplus scatter window in degrees
    #[serde(default = "default_surplus_window")]
    pub surplus_window_deg: f64,

    /// Half-width of the shortage scatter window in degrees
    #[serde(default = "default_shortage_window")]
    pub shortage_window_deg: f64,

    /// Half-width of the community report scatter window in degrees
    #[serde(default = "default_community_window")]
    pub community_window_deg: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            surplus_count: default_surplus_count(),
            shortage_count: default_shortage_count(),
            surplus_window_deg: default_surplus_window(),
            shortage_window_deg: default_shortage_window(),
            community_window_deg: default_community_window(),
        }
    }
}

fn default_latitude() -> f64 {
    28.6139
}

fn default_longitude() -> f64 {
    77.2090
}

fn default_surplus_count() -> usize {
    3
}

fn default_shortage_count() -> usize {
    2
}

fn default_surplus_window() -> f64 {
    0.01
}

fn default_shortage_window() -> f64 {
    0.015
}

fn default_community_window() -> f64 {
    0.05
}

/// Proximity filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProximityConfig {
    /// Records closer than this are treated as the same place
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold_km: f64,

    /// Radius used when a nearby query does not give one
    #[serde(default = "default_radius")]
    pub default_radius_km: f64,

    /// Cap on nearby results (unlimited when absent)
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold_km: default_duplicate_threshold(),
            default_radius_km: default_radius(),
            max_results: None,
        }
    }
}

fn default_duplicate_threshold() -> f64 {
    0.1
}

fn default_radius() -> f64 {
    50.0
}

/// External data provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Query remote providers from the nearby endpoint
    #[serde(default)]
    pub remote_enabled: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// USDA FoodData Central key (`DEMO_KEY` when absent)
    #[serde(default)]
    pub usda_api_key: Option<String>,

    /// Feeding America key (provider disabled when absent)
    #[serde(default)]
    pub feeding_america_api_key: Option<String>,

    /// Food Rescue US key (provider disabled when absent)
    #[serde(default)]
    pub food_rescue_us_api_key: Option<String>,

    /// Open Food Facts search endpoint
    #[serde(default = "default_open_food_facts_url")]
    pub open_food_facts_url: String,

    /// USDA FoodData Central base URL
    #[serde(default = "default_usda_url")]
    pub usda_url: String,

    /// Feeding America base URL
    #[serde(default = "default_feeding_america_url")]
    pub feeding_america_url: String,

    /// Food Rescue US base URL
    #[serde(default = "default_food_rescue_us_url")]
    pub food_rescue_us_url: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            remote_enabled: false,
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            usda_api_key: None,
            feeding_america_api_key: None,
            food_rescue_us_api_key: None,
            open_food_facts_url: default_open_food_facts_url(),
            usda_url: default_usda_url(),
            feeding_america_url: default_feeding_america_url(),
            food_rescue_us_url: default_food_rescue_us_url(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_open_food_facts_url() -> String {
    "https://world.openfoodfacts.org/cgi/search.pl".to_string()
}

fn default_usda_url() -> String {
    "https://api.nal.usda.gov/fdc/v1".to_string()
}

fn default_feeding_america_url() -> String {
    "https://api.feedingamerica.org/v2".to_string()
}

fn default_food_rescue_us_url() -> String {
    "https://api.foodrescue.us/v1".to_string()
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let schema = ConfigSchema::default();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.server.port, 3000);
        assert_eq!(schema.generator.surplus_count, 3);
        assert_eq!(schema.generator.shortage_count, 2);
        assert_eq!(schema.proximity.duplicate_threshold_km, 0.1);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [server]
            port = 8080

            [generator]
            surplus_count = 5
            "#,
        )
        .unwrap();

        assert_eq!(schema.server.port, 8080);
        assert_eq!(schema.server.host, "0.0.0.0");
        assert_eq!(schema.generator.surplus_count, 5);
        assert_eq!(schema.generator.shortage_window_deg, 0.015);
    }

    #[test]
    fn test_validation_rejects_bad_window() {
        let mut schema = ConfigSchema::default();
        schema.generator.surplus_window_deg = 0.0;
        let err = schema.validate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
        assert!(err.message.contains("surplus_window_deg"));
    }

    #[test]
    fn test_validation_rejects_bad_threshold() {
        let mut schema = ConfigSchema::default();
        schema.proximity.duplicate_threshold_km = f64::NAN;
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_center() {
        let mut schema = ConfigSchema::default();
        schema.generator.default_latitude = 95.0;
        assert!(schema.validate().is_err());
    }
}
