use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use cv_core::config::{AppConfig, OwnerFilterConfig};
use cv_core::{AcquirePolicy, FormatCatalog, HashAlgorithm, LogicalFormat, RetentionPeriod};

pub const HISTORY_DIR_NAME: &str = "History";

/// Effective capture settings: the fixed defaults with configured values laid over them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSettings {
    /// Per-item byte limit; items above it are omitted.
    pub max_item_bytes: usize,
    pub debounce: Duration,
    pub acquire: AcquirePolicy,
    pub hash_algorithm: HashAlgorithm,
    pub formats: Vec<LogicalFormat>,
    pub history_root: PathBuf,
    pub retention: RetentionPeriod,
    pub owner_filters: Vec<OwnerFilterConfig>,
}

impl CaptureSettings {
    /// v1 defaults. Keep these stable: stored history and user expectations depend on them.
    pub fn defaults(data_dir: &Path) -> Self {
        Self {
            max_item_bytes: usize::MAX,
            debounce: Duration::from_millis(100),
            acquire: AcquirePolicy::default(),
            hash_algorithm: HashAlgorithm::Sha256,
            formats: LogicalFormat::ALL.to_vec(),
            history_root: data_dir.join(HISTORY_DIR_NAME),
            retention: RetentionPeriod::Month,
            owner_filters: Vec::new(),
        }
    }

    pub fn resolve(config: &AppConfig, data_dir: &Path) -> Result<Self> {
        let mut settings = Self::defaults(data_dir);

        if let Some(max) = config.max_item_bytes {
            settings.max_item_bytes = usize::try_from(max).unwrap_or(usize::MAX);
        }
        if let Some(ms) = config.debounce_ms {
            settings.debounce = Duration::from_millis(ms);
        }
        if let Some(attempts) = config.acquire_attempts {
            settings.acquire.attempts = attempts;
        }
        if let Some(ms) = config.acquire_delay_ms {
            settings.acquire.delay = Duration::from_millis(ms);
        }
        if let Some(name) = &config.hash_algorithm {
            settings.hash_algorithm = parse_hash_algorithm(name)?;
        }
        if let Some(names) = &config.formats {
            settings.formats = names
                .iter()
                .map(|name| {
                    LogicalFormat::from_name(name)
                        .with_context(|| format!("Invalid [capture] formats entry '{name}'"))
                })
                .collect::<Result<_>>()?;
        }
        if let Some(root) = &config.history_root {
            settings.history_root = root.clone();
        }
        if let Some(name) = &config.retention {
            settings.retention = RetentionPeriod::from_name(name)
                .context("Invalid [history] retention")?;
        }
        settings.owner_filters = config.owner_filters.clone();

        Ok(settings)
    }

    pub fn catalog(&self) -> FormatCatalog {
        FormatCatalog::with_formats(self.formats.iter().copied())
    }
}

fn parse_hash_algorithm(name: &str) -> Result<HashAlgorithm> {
    match name.trim().to_ascii_lowercase().as_str() {
        "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
        "blake3" | "blake3v1" | "blake3_v1" => Ok(HashAlgorithm::Blake3V1),
        other => bail!("Unsupported [capture] hash_algorithm '{other}'"),
    }
}
