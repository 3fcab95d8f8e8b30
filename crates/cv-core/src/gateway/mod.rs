//! Clipboard lock protocol.
//!
//! The native clipboard is a single-writer resource shared with every other
//! process. [`ClipboardGateway`] owns the backend and hands out a
//! [`ClipboardSession`] when the lock is taken; dropping the session closes it,
//! so every successful acquire is paired with exactly one release.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::clipboard::{OsFormat, WindowHandle};
use crate::ports::{ClipboardBackendError, SystemClipboardPort};

/// Bounded retry used when the clipboard is held by someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquirePolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for AcquirePolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_millis(50),
        }
    }
}

pub struct ClipboardGateway {
    backend: Arc<dyn SystemClipboardPort>,
    policy: AcquirePolicy,
    self_originated: bool,
}

impl ClipboardGateway {
    pub fn new(backend: Arc<dyn SystemClipboardPort>, policy: AcquirePolicy) -> Self {
        Self {
            backend,
            policy,
            self_originated: false,
        }
    }

    pub fn policy(&self) -> AcquirePolicy {
        self.policy
    }

    /// Try to take the lock, sleeping `policy.delay` between failed attempts.
    ///
    /// Blocks the calling thread for at most `(attempts - 1) * delay`.
    pub fn try_acquire(&mut self) -> Option<ClipboardSession<'_>> {
        let attempts = self.policy.attempts.max(1);
        for attempt in 1..=attempts {
            match self.backend.open() {
                Ok(()) => return Some(ClipboardSession { gateway: self }),
                Err(err) => {
                    debug!(attempt, attempts, error = %err, "Clipboard open failed");
                    if attempt < attempts {
                        std::thread::sleep(self.policy.delay);
                    }
                }
            }
        }
        None
    }

    pub fn sequence_number(&self) -> u32 {
        self.backend.sequence_number()
    }

    pub fn owner_window(&self) -> Option<WindowHandle> {
        self.backend.owner_window()
    }

    /// Returns and clears the marker set by [`ClipboardSession::mark_self_originated`].
    pub fn take_self_originated(&mut self) -> bool {
        std::mem::take(&mut self.self_originated)
    }
}

/// Exclusive hold on the clipboard. Closed on drop.
pub struct ClipboardSession<'a> {
    gateway: &'a mut ClipboardGateway,
}

impl ClipboardSession<'_> {
    pub fn probe(&self, format: OsFormat) -> bool {
        self.gateway.backend.is_available(format)
    }

    /// True when any of `aliases` is present.
    pub fn any_present(&self, aliases: &[OsFormat]) -> bool {
        aliases.iter().any(|alias| self.probe(*alias))
    }

    pub fn read(&self, format: OsFormat) -> Option<Vec<u8>> {
        self.gateway.backend.read(format)
    }

    pub fn write(&self, format: OsFormat, data: &[u8]) -> Result<(), ClipboardBackendError> {
        self.gateway.backend.write(format, data)
    }

    pub fn clear(&self) -> Result<(), ClipboardBackendError> {
        self.gateway.backend.clear()
    }

    /// Flag the content written in this session as ours, so the notification
    /// it triggers is not captured again.
    pub fn mark_self_originated(&mut self) {
        self.gateway.self_originated = true;
    }

    /// Close the clipboard now instead of at end of scope.
    pub fn release(self) {}
}

impl Drop for ClipboardSession<'_> {
    fn drop(&mut self) {
        self.gateway.backend.close();
    }
}
