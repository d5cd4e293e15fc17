//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use crate::config::schema::PlannerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a TOML file, apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<PlannerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(&content, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Parse and validate configuration text.
///
/// `lookup` resolves environment overrides; see [`apply_env_overrides`].
pub fn parse_config<F>(content: &str, lookup: F) -> Result<PlannerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: PlannerConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    apply_env_overrides(&mut config, lookup);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay secrets and the bind address from the environment.
///
/// Both spellings of the GraphHopper key are honoured; the misspelt
/// `GRAPHOPPER_API_KEY` is what existing deployments export.
pub fn apply_env_overrides<F>(config: &mut PlannerConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty("GRAPHHOPPER_API_KEY").or_else(|| non_empty("GRAPHOPPER_API_KEY")) {
        config.graphhopper.api_key = key;
    }
    if let Some(token) = non_empty("MAPBOX_TOKEN") {
        config.map.access_token = token;
    }
    if let Some(addr) = non_empty("PLANNER_BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
}
