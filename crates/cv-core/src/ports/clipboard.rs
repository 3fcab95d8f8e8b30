use thiserror::Error;

use crate::clipboard::{OsFormat, WindowHandle};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardBackendError {
    #[error("clipboard is held by another process")]
    Busy,

    #[error("clipboard format {0} could not be registered")]
    Registration(String),

    #[error("clipboard operation failed: {0}")]
    Os(String),
}

/// Raw access to the system clipboard.
///
/// Implementations are thin: no retries, no format knowledge. The lock
/// protocol on top of them lives in [`crate::gateway::ClipboardGateway`].
/// `is_available`, `read`, `write` and `clear` are only valid between a
/// successful `open` and the matching `close`.
pub trait SystemClipboardPort: Send + Sync {
    /// Single attempt to take the exclusive clipboard lock.
    fn open(&self) -> Result<(), ClipboardBackendError>;

    fn close(&self);

    fn is_available(&self, format: OsFormat) -> bool;

    /// Copy of the entry stored under `format`, if any.
    fn read(&self, format: OsFormat) -> Option<Vec<u8>>;

    /// Add an entry without clearing the others.
    fn write(&self, format: OsFormat, data: &[u8]) -> Result<(), ClipboardBackendError>;

    fn clear(&self) -> Result<(), ClipboardBackendError>;

    /// Monotonic change counter maintained by the system; readable without the lock.
    fn sequence_number(&self) -> u32;

    /// Window that placed the current content, readable without the lock.
    fn owner_window(&self) -> Option<WindowHandle>;
}
