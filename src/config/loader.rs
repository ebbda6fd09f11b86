//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::EdgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `edition.paid_enterprise_features_enabled`.
pub const EDITION_FLAG_ENV: &str = "ENABLE_PAID_ENTERPRISE_EDITION_FEATURES";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// The edition flag is read from the environment once here; after this call
/// nothing re-reads it.
pub fn load_config(path: &Path) -> Result<EdgeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let env_flag = std::env::var(EDITION_FLAG_ENV).ok();
    parse_config(&content, env_flag.as_deref())
}

/// Built-in defaults with the environment override applied.
pub fn load_defaults() -> Result<EdgeConfig, ConfigError> {
    let env_flag = std::env::var(EDITION_FLAG_ENV).ok();
    parse_config("", env_flag.as_deref())
}

/// Parse, apply the environment override, and validate.
pub fn parse_config(content: &str, env_flag: Option<&str>) -> Result<EdgeConfig, ConfigError> {
    let mut config: EdgeConfig = toml::from_str(content)?;

    if let Some(raw) = env_flag {
        config.edition.paid_enterprise_features_enabled = parse_flag(raw);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_flag_overrides_file() {
        let file = "[edition]\npaid_enterprise_features_enabled = false\n";
        let config = parse_config(file, Some("true")).unwrap();
        assert!(config.edition.paid_enterprise_features_enabled);

        let config = parse_config(file, Some("1")).unwrap();
        assert!(config.edition.paid_enterprise_features_enabled);

        let file = "[edition]\npaid_enterprise_features_enabled = true\n";
        let config = parse_config(file, Some("yes please")).unwrap();
        assert!(!config.edition.paid_enterprise_features_enabled);

        let config = parse_config(file, None).unwrap();
        assert!(config.edition.paid_enterprise_features_enabled);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[routes\nprotected = 3", None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_everything() {
        let err = parse_config("[locale]\ndefault = \"fr\"\n[edition]\nnamespace = \"ee\"\n", None)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Validation failed: "));
        assert!(message.contains("\"fr\""));
        assert!(message.contains("\"ee\""));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("edge-gate-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[auth]\nlogin_path = \"/auth/signin\"\n").unwrap();
        let loaded = load_config(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap().auth.login_path, "/auth/signin");
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/edge-gate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
