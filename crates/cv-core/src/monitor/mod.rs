//! Monitor state machine.
//!
//! Decides *when* a capture cycle runs. The machine is pure: it consumes
//! [`MonitorEvent`]s and returns the [`MonitorAction`]s the runtime must carry
//! out (subscribe, arm or cancel the debounce timer, resolve the owner, run a
//! capture). Timers and the clipboard itself live in the runtime.

mod state_machine;

pub use state_machine::MonitorState;

use thiserror::Error;

use crate::clipboard::WindowHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    Stopped,
    /// Listening, no timer pending.
    Armed,
    /// Debounce timer pending.
    Debouncing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Start watching `window`; `sequence` is the clipboard sequence number now.
    Start { window: WindowHandle, sequence: u32 },
    Stop,
    WindowDestroyed { window: WindowHandle },
    /// Raw change notification with the sequence number read on arrival.
    Notification { window: WindowHandle, sequence: u32 },
    /// The load path just wrote to the clipboard.
    SelfWriteCompleted,
    TimerFired,
    /// Capture right away, bypassing the debounce delay.
    CaptureRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorAction {
    Subscribe { window: WindowHandle },
    Unsubscribe { window: WindowHandle },
    ResetPreviousState,
    StartDebounceTimer,
    CancelDebounceTimer,
    /// Look up and cache the clipboard owner's process path.
    ResolveOwner,
    RunCapture,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("already monitoring window {current}, cannot start on {requested}")]
    AlreadyMonitoringDifferentWindow {
        current: WindowHandle,
        requested: WindowHandle,
    },
}
