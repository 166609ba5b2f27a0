//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::StrategyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Why a configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<StrategyConfig, ConfigError> {
    let config: StrategyConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<StrategyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[refresh]\ninterval_secs = 5\n\n[[servers]]\nhost = \"a\"\nport = 1").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.refresh.interval_secs, 5);
        assert_eq!(config.servers.len(), 1);
    }

    #[test]
    fn test_load_config_errors() {
        assert!(matches!(
            load_config(Path::new("/nonexistent/strategy.toml")),
            Err(ConfigError::Io(_))
        ));
        assert!(matches!(parse_config("[refresh"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            parse_config("[refresh]\ninterval_secs = 0"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_oversized_interval_is_rejected() {
        let err = parse_config("[refresh]\ninterval_secs = 9223372036854775807").unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::Validation(errors)
                if matches!(errors[..], [ValidationError::RefreshIntervalTooLong { .. }])
        ));

        let err = parse_config("[refresh]\ninterval_secs = 0\n\n[statistics]\npath = \"\"").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config: refresh.interval_secs must be > 0; statistics.path must not be empty"
        );
    }
}
