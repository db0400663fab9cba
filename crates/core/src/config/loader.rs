//! Configuration file loading and environment overrides

use super::schema::{ConfigSchema, ProvidersConfig};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::debug;

/// Environment variable holding the listener port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable holding the listener host.
pub const ENV_HOST: &str = "ANNASEVA_HOST";
/// Environment variable pointing at a configuration file.
pub const ENV_CONFIG: &str = "ANNASEVA_CONFIG";
/// Environment variable enabling remote providers.
pub const ENV_REMOTE_PROVIDERS: &str = "ANNASEVA_REMOTE_PROVIDERS";
/// Environment variable holding the USDA FoodData Central key.
pub const ENV_USDA_KEY: &str = "ANNASEVA_USDA_API_KEY";
/// Environment variable holding the Feeding America key.
pub const ENV_FEEDING_AMERICA_KEY: &str = "ANNASEVA_FEEDING_AMERICA_API_KEY";
/// Environment variable holding the Food Rescue US key.
pub const ENV_FOOD_RESCUE_US_KEY: &str = "ANNASEVA_FOOD_RESCUE_US_API_KEY";
/// Environment variable holding the provider timeout in seconds.
pub const ENV_PROVIDER_TIMEOUT: &str = "ANNASEVA_PROVIDER_TIMEOUT_SECS";

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed and validated settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults, then apply
    /// environment overrides and validate.
    ///
    /// An explicit path (argument or `ANNASEVA_CONFIG`) must exist; the
    /// standard locations are optional.
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`], reading variables through `lookup`.
    pub fn load_with<F>(path: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = path.map(String::from).or_else(|| lookup(ENV_CONFIG));

        let config_path = match explicit {
            Some(p) if !Path::new(&p).exists() => return Err(Error::config_not_found(&p)),
            Some(p) => Some(p),
            None => find_config_file(),
        };

        let mut schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        apply_env_overrides(&mut schema, &lookup)?;
        schema.validate()?;

        debug!(path = ?config_path, port = schema.server.port, "Configuration loaded");

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = ["annaseva.toml", ".annaseva.toml", ".config/annaseva.toml"];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::from(e).with_context(format!("Failed to read config file {path}"))
    })?;

    toml::from_str(&content)
        .map_err(|e| Error::from(e).with_context(format!("Failed to parse config file {path}")))
}

fn apply_env_overrides<F>(schema: &mut ConfigSchema, lookup: &F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = non_empty(lookup(ENV_PORT)) {
        schema.server.port = port
            .trim()
            .parse()
            .map_err(|_| Error::invalid_env(ENV_PORT, &port))?;
    }

    if let Some(host) = non_empty(lookup(ENV_HOST)) {
        schema.server.host = host;
    }

    schema.providers.apply_env(lookup)
}

impl ProvidersConfig {
    /// Defaults overridden by the `ANNASEVA_*` provider variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`ProvidersConfig::from_env`], reading variables through `lookup`.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut providers = Self::default();
        providers.apply_env(&lookup)?;
        Ok(providers)
    }

    fn apply_env<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(flag) = non_empty(lookup(ENV_REMOTE_PROVIDERS)) {
            self.remote_enabled = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(Error::invalid_env(ENV_REMOTE_PROVIDERS, &flag)),
            };
        }

        if let Some(timeout) = non_empty(lookup(ENV_PROVIDER_TIMEOUT)) {
            self.timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|_| Error::invalid_env(ENV_PROVIDER_TIMEOUT, &timeout))?;
        }

        if let Some(key) = non_empty(lookup(ENV_USDA_KEY)) {
            self.usda_api_key = Some(key);
        }
        if let Some(key) = non_empty(lookup(ENV_FEEDING_AMERICA_KEY)) {
            self.feeding_america_api_key = Some(key);
        }
        if let Some(key) = non_empty(lookup(ENV_FOOD_RESCUE_US_KEY)) {
            self.food_rescue_us_api_key = Some(key);
        }

        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.path.is_none());
        assert_eq!(config.schema.server.port, 3000);
    }

    #[test]
    fn test_port_override() {
        let config = Config::load_with(None, env(&[(ENV_PORT, "8081")])).unwrap();
        assert_eq!(config.schema.server.port, 8081);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = Config::load_with(None, env(&[(ENV_PORT, "eighty")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let config = Config::load_with(None, env(&[(ENV_PORT, ""), (ENV_USDA_KEY, " ")])).unwrap();
        assert_eq!(config.schema.server.port, 3000);
        assert!(config.schema.providers.usda_api_key.is_none());
    }

    #[test]
    fn test_provider_keys_from_env() {
        let config = Config::load_with(
            None,
            env(&[
                (ENV_FEEDING_AMERICA_KEY, "fa-key"),
                (ENV_REMOTE_PROVIDERS, "true"),
            ]),
        )
        .unwrap();
        assert_eq!(
            config.schema.providers.feeding_america_api_key.as_deref(),
            Some("fa-key")
        );
        assert!(config.schema.providers.remote_enabled);
    }

    #[test]
    fn test_provider_env_alone() {
        let mut providers = ProvidersConfig::default();
        providers
            .apply_env(&env(&[(ENV_PROVIDER_TIMEOUT, "4"), (ENV_USDA_KEY, "usda")]))
            .unwrap();
        assert_eq!(providers.timeout_secs, 4);
        assert_eq!(providers.usda_api_key.as_deref(), Some("usda"));
        assert!(!providers.remote_enabled);

        let err = providers
            .apply_env(&env(&[(ENV_REMOTE_PROVIDERS, "maybe")]))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn test_providers_from_env() {
        let providers = ProvidersConfig::from_env_with(env(&[
            (ENV_REMOTE_PROVIDERS, "on"),
            (ENV_FOOD_RESCUE_US_KEY, "fr-key"),
        ]))
        .unwrap();
        assert!(providers.remote_enabled);
        assert_eq!(providers.food_rescue_us_api_key.as_deref(), Some("fr-key"));
        assert_eq!(providers.timeout_secs, ProvidersConfig::default().timeout_secs);

        let err = ProvidersConfig::from_env_with(env(&[(ENV_PROVIDER_TIMEOUT, "soon")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }

    #[test]
    fn test_providers_from_process_env() {
        let expected =
            ProvidersConfig::from_env_with(|key| std::env::var(key).ok()).map(|p| p.usda_api_key);
        let actual = ProvidersConfig::from_env().map(|p| p.usda_api_key);
        assert_eq!(actual.ok(), expected.ok());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load_with(Some("/definitely/not/here.toml"), env(&[])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_load_file_then_env_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 4000\n\n[proximity]\ndefault_radius_km = 5.0").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = Config::load_with(Some(&path), env(&[])).unwrap();
        assert_eq!(config.schema.server.port, 4000);
        assert_eq!(config.schema.proximity.default_radius_km, 5.0);
        assert_eq!(config.path.as_deref(), Some(path.as_str()));

        let config = Config::load_with(Some(&path), env(&[(ENV_PORT, "4001")])).unwrap();
        assert_eq!(config.schema.server.port, 4001);
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let err = Config::load_with(Some(&path), env(&[])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_config_env_var_points_at_file() {
        let err = Config::load_with(None, env(&[(ENV_CONFIG, "/nope/annaseva.toml")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }
}
