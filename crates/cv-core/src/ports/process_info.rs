use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::clipboard::WindowHandle;

/// Resolves which program owns the clipboard content.
///
/// Lookups never fail loudly: anything unresolvable is `None`.
#[async_trait]
pub trait ProcessInfoPort: Send + Sync {
    /// Executable path of the process that created `window`. Cheap and synchronous.
    fn path_of(&self, window: WindowHandle) -> Option<PathBuf>;

    /// PNG-encoded icon of the executable at `path`.
    async fn icon_bytes_of(&self, path: &Path) -> Option<Vec<u8>>;
}
