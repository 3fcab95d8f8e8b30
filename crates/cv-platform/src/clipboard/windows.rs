use std::collections::HashMap;
use std::sync::Mutex;

use clipboard_win::raw;
use cv_core::clipboard::{OsFormat, WindowHandle};
use cv_core::ports::{ClipboardBackendError, SystemClipboardPort};
use tracing::warn;
use winapi::um::winuser::{GetClipboardOwner, GetClipboardSequenceNumber};

/// Native Windows clipboard through `clipboard-win`'s raw API.
///
/// Registered format names are resolved once and cached.
#[derive(Default)]
pub struct Win32Clipboard {
    registered: Mutex<HashMap<&'static str, u32>>,
}

impl Win32Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn format_id(&self, format: OsFormat) -> Result<u32, ClipboardBackendError> {
        match format {
            OsFormat::Standard(id) => Ok(id),
            OsFormat::Registered(name) => {
                let mut cache = self
                    .registered
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                if let Some(id) = cache.get(name) {
                    return Ok(*id);
                }
                let id = raw::register_format(name)
                    .map(|id| id.get())
                    .ok_or_else(|| ClipboardBackendError::Registration(name.to_string()))?;
                cache.insert(name, id);
                Ok(id)
            }
        }
    }
}

impl SystemClipboardPort for Win32Clipboard {
    fn open(&self) -> Result<(), ClipboardBackendError> {
        raw::open().map_err(|_| ClipboardBackendError::Busy)
    }

    fn close(&self) {
        if let Err(e) = raw::close() {
            warn!(error = %e, "CloseClipboard failed");
        }
    }

    fn is_available(&self, format: OsFormat) -> bool {
        match self.format_id(format) {
            Ok(id) => raw::is_format_avail(id),
            Err(_) => false,
        }
    }

    fn read(&self, format: OsFormat) -> Option<Vec<u8>> {
        let id = self.format_id(format).ok()?;
        let mut out = Vec::new();
        match raw::get_vec(id, &mut out) {
            Ok(_) => Some(out),
            Err(e) => {
                warn!(format = %format, error = %e, "GetClipboardData failed");
                None
            }
        }
    }

    fn write(&self, format: OsFormat, data: &[u8]) -> Result<(), ClipboardBackendError> {
        let id = self.format_id(format)?;
        raw::set_without_clear(id, data).map_err(|e| ClipboardBackendError::Os(e.to_string()))
    }

    fn clear(&self) -> Result<(), ClipboardBackendError> {
        raw::empty().map_err(|e| ClipboardBackendError::Os(e.to_string()))
    }

    fn sequence_number(&self) -> u32 {
        unsafe { GetClipboardSequenceNumber() }
    }

    fn owner_window(&self) -> Option<WindowHandle> {
        let hwnd = unsafe { GetClipboardOwner() };
        if hwnd.is_null() {
            None
        } else {
            Some(WindowHandle(hwnd as isize))
        }
    }
}
