//! # Configuration Loader
//!
//! Reads a TOML file and maps it to the [`AppConfig`] DTO. No validation and
//! no defaults here: whatever the file says is taken as fact.

use std::path::Path;

use anyhow::Context;
use cv_core::config::AppConfig;

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File cannot be read (I/O error)
/// - Content is not valid TOML (parse error)
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [capture]
            debounce_ms = 150
            formats = ["Text", "PNG"]

            [history]
            root = "/var/lib/clipvault/History"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.debounce_ms, Some(150));
        assert_eq!(
            config.formats,
            Some(vec!["Text".to_string(), "PNG".to_string()])
        );
        assert_eq!(
            config.history_root,
            Some(PathBuf::from("/var/lib/clipvault/History"))
        );
    }

    #[test]
    fn test_load_config_returns_empty_values_when_missing() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[capture]\n[history]\n").unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn test_load_config_fails_for_missing_file() {
        let err = load_config(Path::new("/nonexistent/clipvault.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_fails_for_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[capture\ndebounce_ms = ").unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config as TOML"));
    }
}
