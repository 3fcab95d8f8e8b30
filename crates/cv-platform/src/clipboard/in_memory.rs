use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use cv_core::clipboard::{OsFormat, WindowHandle};
use cv_core::ports::{ClipboardBackendError, SystemClipboardPort};
use tracing::trace;

use crate::notify::ManualNotifier;

#[derive(Default)]
struct Inner {
    entries: HashMap<OsFormat, Vec<u8>>,
    open: bool,
    dirty: bool,
    sequence: u32,
    owner: Option<WindowHandle>,
    busy_opens: u32,
    open_count: u32,
}

/// Process-local clipboard with the same lock and sequence semantics as the
/// native one.
///
/// Used on platforms without a native backend and to drive the monitor in
/// tests. The sequence number advances once per session that changed the
/// content, when the session closes; an attached [`ManualNotifier`] is told
/// at the same moment.
#[derive(Default)]
pub struct InMemoryClipboard {
    inner: Mutex<Inner>,
    notifier: Mutex<Option<ManualNotifier>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a change notification through `notifier` after every content change.
    pub fn attach_notifier(&self, notifier: ManualNotifier) {
        *lock(&self.notifier) = Some(notifier);
    }

    /// Make the next `attempts` opens fail as if another process held the lock.
    pub fn hold_busy(&self, attempts: u32) {
        lock(&self.inner).busy_opens = attempts;
    }

    /// Replace the content as another application would.
    pub fn place(&self, owner: Option<WindowHandle>, entries: &[(OsFormat, &[u8])]) {
        {
            let mut inner = lock(&self.inner);
            inner.entries = entries
                .iter()
                .map(|(format, data)| (*format, data.to_vec()))
                .collect();
            inner.owner = owner;
            inner.sequence = inner.sequence.wrapping_add(1);
        }
        self.notify();
    }

    /// Hand ownership to another window without touching the content.
    /// No sequence change, no notification.
    pub fn set_owner(&self, owner: Option<WindowHandle>) {
        lock(&self.inner).owner = owner;
    }

    /// Entry currently stored under `format`, without taking the lock.
    pub fn peek(&self, format: OsFormat) -> Option<Vec<u8>> {
        lock(&self.inner).entries.get(&format).cloned()
    }

    pub fn is_open(&self) -> bool {
        lock(&self.inner).open
    }

    /// Number of open attempts so far, successful or not.
    pub fn open_count(&self) -> u32 {
        lock(&self.inner).open_count
    }

    fn notify(&self) {
        if let Some(notifier) = lock(&self.notifier).as_ref() {
            notifier.clipboard_changed();
        }
    }
}

impl SystemClipboardPort for InMemoryClipboard {
    fn open(&self) -> Result<(), ClipboardBackendError> {
        let mut inner = lock(&self.inner);
        inner.open_count += 1;
        if inner.busy_opens > 0 {
            inner.busy_opens -= 1;
            return Err(ClipboardBackendError::Busy);
        }
        if inner.open {
            return Err(ClipboardBackendError::Busy);
        }
        inner.open = true;
        Ok(())
    }

    fn close(&self) {
        let changed = {
            let mut inner = lock(&self.inner);
            inner.open = false;
            let changed = std::mem::take(&mut inner.dirty);
            if changed {
                inner.sequence = inner.sequence.wrapping_add(1);
            }
            changed
        };
        if changed {
            trace!("In-memory clipboard changed");
            self.notify();
        }
    }

    fn is_available(&self, format: OsFormat) -> bool {
        let inner = lock(&self.inner);
        inner.open && inner.entries.contains_key(&format)
    }

    fn read(&self, format: OsFormat) -> Option<Vec<u8>> {
        let inner = lock(&self.inner);
        if !inner.open {
            return None;
        }
        inner.entries.get(&format).cloned()
    }

    fn write(&self, format: OsFormat, data: &[u8]) -> Result<(), ClipboardBackendError> {
        let mut inner = lock(&self.inner);
        if !inner.open {
            return Err(ClipboardBackendError::Os("clipboard is not open".into()));
        }
        inner.entries.insert(format, data.to_vec());
        inner.dirty = true;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClipboardBackendError> {
        let mut inner = lock(&self.inner);
        if !inner.open {
            return Err(ClipboardBackendError::Os("clipboard is not open".into()));
        }
        inner.entries.clear();
        inner.owner = None;
        inner.dirty = true;
        Ok(())
    }

    fn sequence_number(&self) -> u32 {
        lock(&self.inner).sequence
    }

    fn owner_window(&self) -> Option<WindowHandle> {
        lock(&self.inner).owner
    }
}
