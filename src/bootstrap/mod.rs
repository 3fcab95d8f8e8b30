pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::resolve_settings;
pub use run::{run_cli, run_command};
pub use wiring::{in_memory_platform, native_platform, wire, AppRuntime, PlatformParts};
