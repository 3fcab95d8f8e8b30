use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cv_core::clipboard::WindowHandle;
use cv_core::ports::ProcessInfoPort;

/// Resolver for platforms without owner lookup: everything is unknown.
pub struct NoopProcessInfo;

#[async_trait]
impl ProcessInfoPort for NoopProcessInfo {
    fn path_of(&self, _window: WindowHandle) -> Option<PathBuf> {
        None
    }

    async fn icon_bytes_of(&self, _path: &Path) -> Option<Vec<u8>> {
        None
    }
}
