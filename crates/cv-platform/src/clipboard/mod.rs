//! Clipboard backends implementing [`cv_core::ports::SystemClipboardPort`].

mod in_memory;
#[cfg(windows)]
mod windows;

pub use in_memory::InMemoryClipboard;
#[cfg(windows)]
pub use windows::Win32Clipboard;
