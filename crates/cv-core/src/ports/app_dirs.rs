use std::path::PathBuf;

use thiserror::Error;

/// Resolved per-user application directories. Facts only, nothing is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
}

impl AppDirs {
    pub fn logs_dir(&self) -> PathBuf {
        self.app_data_root.join("logs")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppDirsError {
    #[error("local data directory is unavailable on this system")]
    DataLocalDirUnavailable,
}

pub trait AppDirsPort: Send + Sync {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError>;
}
