//! Clipboard owner lookup implementing [`cv_core::ports::ProcessInfoPort`].

mod noop;
#[cfg(windows)]
mod windows;

pub use noop::NoopProcessInfo;
#[cfg(windows)]
pub use windows::Win32ProcessInfo;
