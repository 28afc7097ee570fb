//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `listener.port`.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT value {0:?}")]
    Port(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve the effective configuration: file (if any), then environment.
pub fn resolve_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    apply_env_overrides(&mut config, std::env::var(PORT_ENV).ok().as_deref())?;
    Ok(config)
}

/// Apply environment overrides. Takes the raw `PORT` value so callers and
/// tests do not have to touch the process environment.
pub fn apply_env_overrides(config: &mut ServiceConfig, port: Option<&str>) -> Result<(), ConfigError> {
    if let Some(raw) = port {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            config.listener.port = trimmed
                .parse()
                .map_err(|_| ConfigError::Port(raw.to_string()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_port_override() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, Some("8088")).unwrap();
        assert_eq!(config.listener.port, 8088);

        apply_env_overrides(&mut config, Some("")).unwrap();
        assert_eq!(config.listener.port, 8088);

        apply_env_overrides(&mut config, None).unwrap();
        assert_eq!(config.listener.port, 8088);
    }

    #[test]
    fn test_invalid_port() {
        let mut config = ServiceConfig::default();
        let err = apply_env_overrides(&mut config, Some("http")).unwrap_err();
        assert!(matches!(err, ConfigError::Port(ref v) if v == "http"));
        assert_eq!(config.listener.port, 3000);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!("selfheal-config-{}.toml", std::process::id()));
        {
            let mut file = fs::File::create(&path).unwrap();
            writeln!(file, "[load]\nmax_leak_mb = 500").unwrap();
        }

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("max_leak_mb"));

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/selfheal.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
