//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ThrottleConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
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
pub fn load_config(path: &Path) -> Result<ThrottleConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ThrottleConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.toml", name, std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_file() {
        let path = write_temp(
            "throttle-valid",
            r#"
            [listener]
            bind_address = "127.0.0.1:3000"

            [limiter]
            max_requests = 5
            period_ms = 2000
            "#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.limiter.max_requests, 5);
        assert_eq!(config.limiter.period_ms, 2000);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_load_reports_every_validation_error() {
        let path = write_temp(
            "throttle-invalid",
            r#"
            [limiter]
            max_requests = 0
            status_code = 7
            "#,
        );

        match load_config(&path) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_load_errors() {
        let missing = std::env::temp_dir().join("throttle-does-not-exist.toml");
        assert!(matches!(load_config(&missing), Err(ConfigError::Io(_))));

        let path = write_temp("throttle-garbage", "[limiter\nmax_requests = ");
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_file(path);
    }
}
