//! # Pure Data Module - Data Transfer Objects Only
//!
//! ## Responsibilities
//!
//! - Define configuration data structures
//! - Provide TOML → DTO mapping
//!
//! ## Prohibited
//!
//! - No business logic or policies
//! - No validation logic
//! - No default value calculation
//!
//! Absent keys stay `None`; filling in defaults is the job of the
//! infrastructure layer (`cv_infra::config::CaptureSettings`).

use std::path::PathBuf;

/// One `[[owner_filters]]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerFilterConfig {
    pub name: String,
    pub pattern: String,
}

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// `[capture] max_item_bytes`
    pub max_item_bytes: Option<u64>,

    /// `[capture] debounce_ms`
    pub debounce_ms: Option<u64>,

    /// `[capture] acquire_attempts`
    pub acquire_attempts: Option<u32>,

    /// `[capture] acquire_delay_ms`
    pub acquire_delay_ms: Option<u64>,

    /// `[capture] hash_algorithm`, unparsed
    pub hash_algorithm: Option<String>,

    /// `[capture] formats`, unparsed format names
    pub formats: Option<Vec<String>>,

    /// `[history] root` (path info only, no existence check)
    pub history_root: Option<PathBuf>,

    /// `[history] retention`, unparsed
    pub retention: Option<String>,

    pub owner_filters: Vec<OwnerFilterConfig>,
}

fn section_str(value: &toml::Value, section: &str, key: &str) -> Option<String> {
    value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn section_int(value: &toml::Value, section: &str, key: &str) -> Option<i64> {
    value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_integer())
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// **Prohibited**: This method must NOT contain any validation or default
    /// value logic. Negative integers are dropped because they cannot be
    /// represented, not because they are judged invalid.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let formats = toml_value
            .get("capture")
            .and_then(|c| c.get("formats"))
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            });

        let owner_filters = toml_value
            .get("owner_filters")
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| OwnerFilterConfig {
                        name: entry
                            .get("name")
                            .and_then(|v| v.as_str())
                            .unwrap_or("")
                            .to_string(),
                        pattern: entry
                            .get("pattern")
                            .and_then(|v| v.as_str())
                            .unwrap_or("")
                            .to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            max_item_bytes: section_int(toml_value, "capture", "max_item_bytes")
                .and_then(|v| u64::try_from(v).ok()),
            debounce_ms: section_int(toml_value, "capture", "debounce_ms")
                .and_then(|v| u64::try_from(v).ok()),
            acquire_attempts: section_int(toml_value, "capture", "acquire_attempts")
                .and_then(|v| u32::try_from(v).ok()),
            acquire_delay_ms: section_int(toml_value, "capture", "acquire_delay_ms")
                .and_then(|v| u64::try_from(v).ok()),
            hash_algorithm: section_str(toml_value, "capture", "hash_algorithm"),
            formats,
            history_root: section_str(toml_value, "history", "root").map(PathBuf::from),
            retention: section_str(toml_value, "history", "retention"),
            owner_filters,
        })
    }

    /// Create empty AppConfig (every key absent)
    pub fn empty() -> Self {
        Self::default()
    }
}
