mod capture_settings;
mod loader;

pub use capture_settings::{CaptureSettings, HISTORY_DIR_NAME};
pub use loader::load_config;
