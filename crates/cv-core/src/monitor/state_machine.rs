use super::{MonitorAction, MonitorError, MonitorEvent, MonitorPhase};
use crate::clipboard::WindowHandle;

/// Per-window monitor context.
///
/// One value per started monitor, owned by whoever drives it; restarting
/// reuses it without carrying over a timer or a pending self-write marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    phase: MonitorPhase,
    window: Option<WindowHandle>,
    last_sequence: u32,
    self_write_pending: bool,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorState {
    pub fn new() -> Self {
        Self {
            phase: MonitorPhase::Stopped,
            window: None,
            last_sequence: 0,
            self_write_pending: false,
        }
    }

    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    pub fn window(&self) -> Option<WindowHandle> {
        self.window
    }

    pub fn last_sequence(&self) -> u32 {
        self.last_sequence
    }

    pub fn self_write_pending(&self) -> bool {
        self.self_write_pending
    }

    pub fn is_monitoring(&self) -> bool {
        self.phase != MonitorPhase::Stopped
    }

    pub fn apply(&mut self, event: MonitorEvent) -> Result<Vec<MonitorAction>, MonitorError> {
        match event {
            MonitorEvent::Start { window, sequence } => self.start(window, sequence),
            MonitorEvent::Stop => Ok(self.stop()),
            MonitorEvent::WindowDestroyed { window } => {
                if self.window == Some(window) {
                    Ok(self.stop())
                } else {
                    Ok(Vec::new())
                }
            }
            MonitorEvent::Notification { window, sequence } => {
                Ok(self.notification(window, sequence))
            }
            MonitorEvent::SelfWriteCompleted => {
                if !self.is_monitoring() {
                    return Ok(Vec::new());
                }
                self.self_write_pending = true;
                // Whatever the pending timer was for has been overwritten by our own content.
                if self.phase == MonitorPhase::Debouncing {
                    self.phase = MonitorPhase::Armed;
                    return Ok(vec![MonitorAction::CancelDebounceTimer]);
                }
                Ok(Vec::new())
            }
            MonitorEvent::TimerFired => {
                if self.phase == MonitorPhase::Debouncing {
                    self.phase = MonitorPhase::Armed;
                    Ok(vec![MonitorAction::RunCapture])
                } else {
                    Ok(Vec::new())
                }
            }
            MonitorEvent::CaptureRequested => {
                if self.phase == MonitorPhase::Debouncing {
                    self.phase = MonitorPhase::Armed;
                    Ok(vec![
                        MonitorAction::CancelDebounceTimer,
                        MonitorAction::RunCapture,
                    ])
                } else {
                    Ok(vec![MonitorAction::RunCapture])
                }
            }
        }
    }

    fn start(
        &mut self,
        window: WindowHandle,
        sequence: u32,
    ) -> Result<Vec<MonitorAction>, MonitorError> {
        match self.window {
            Some(current) if self.is_monitoring() && current == window => Ok(Vec::new()),
            Some(current) if self.is_monitoring() => {
                Err(MonitorError::AlreadyMonitoringDifferentWindow {
                    current,
                    requested: window,
                })
            }
            _ => {
                self.phase = MonitorPhase::Armed;
                self.window = Some(window);
                self.last_sequence = sequence;
                self.self_write_pending = false;
                Ok(vec![
                    MonitorAction::ResetPreviousState,
                    MonitorAction::Subscribe { window },
                ])
            }
        }
    }

    fn stop(&mut self) -> Vec<MonitorAction> {
        let mut actions = Vec::new();
        if self.phase == MonitorPhase::Debouncing {
            actions.push(MonitorAction::CancelDebounceTimer);
        }
        if let Some(window) = self.window.take() {
            actions.push(MonitorAction::Unsubscribe { window });
        }
        self.phase = MonitorPhase::Stopped;
        self.self_write_pending = false;
        actions
    }

    fn notification(&mut self, window: WindowHandle, sequence: u32) -> Vec<MonitorAction> {
        if !self.is_monitoring() || self.window != Some(window) {
            return Vec::new();
        }

        let mut actions = vec![MonitorAction::ResolveOwner];

        if sequence == self.last_sequence {
            return actions;
        }
        self.last_sequence = sequence;

        if self.self_write_pending {
            self.self_write_pending = false;
            return actions;
        }

        if self.phase == MonitorPhase::Armed {
            self.phase = MonitorPhase::Debouncing;
            actions.push(MonitorAction::StartDebounceTimer);
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: WindowHandle = WindowHandle(0x10);
    const OTHER: WindowHandle = WindowHandle(0x20);

    fn started(sequence: u32) -> MonitorState {
        let mut state = MonitorState::new();
        state
            .apply(MonitorEvent::Start {
                window: WINDOW,
                sequence,
            })
            .unwrap();
        state
    }

    fn notify(state: &mut MonitorState, sequence: u32) -> Vec<MonitorAction> {
        state
            .apply(MonitorEvent::Notification {
                window: WINDOW,
                sequence,
            })
            .unwrap()
    }

    #[test]
    fn start_arms_and_subscribes() {
        let mut state = MonitorState::new();
        let actions = state
            .apply(MonitorEvent::Start {
                window: WINDOW,
                sequence: 3,
            })
            .unwrap();

        assert_eq!(
            actions,
            vec![
                MonitorAction::ResetPreviousState,
                MonitorAction::Subscribe { window: WINDOW }
            ]
        );
        assert_eq!(state.phase(), MonitorPhase::Armed);
        assert_eq!(state.last_sequence(), 3);
    }

    #[test]
    fn start_on_same_window_is_a_no_op() {
        let mut state = started(3);
        let actions = state
            .apply(MonitorEvent::Start {
                window: WINDOW,
                sequence: 9,
            })
            .unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.last_sequence(), 3);
    }

    #[test]
    fn start_on_another_window_fails() {
        let mut state = started(3);
        let err = state
            .apply(MonitorEvent::Start {
                window: OTHER,
                sequence: 3,
            })
            .unwrap_err();
        assert_eq!(
            err,
            MonitorError::AlreadyMonitoringDifferentWindow {
                current: WINDOW,
                requested: OTHER
            }
        );
        assert_eq!(state.window(), Some(WINDOW));
    }

    #[test]
    fn burst_of_notifications_starts_one_timer() {
        let mut state = started(1);

        let first = notify(&mut state, 2);
        let second = notify(&mut state, 3);
        let third = notify(&mut state, 4);

        assert_eq!(
            first,
            vec![MonitorAction::ResolveOwner, MonitorAction::StartDebounceTimer]
        );
        assert_eq!(second, vec![MonitorAction::ResolveOwner]);
        assert_eq!(third, vec![MonitorAction::ResolveOwner]);
        assert_eq!(state.phase(), MonitorPhase::Debouncing);

        let fired = state.apply(MonitorEvent::TimerFired).unwrap();
        assert_eq!(fired, vec![MonitorAction::RunCapture]);
        assert_eq!(state.phase(), MonitorPhase::Armed);
    }

    #[test]
    fn duplicate_sequence_number_is_ignored() {
        let mut state = started(5);
        assert_eq!(notify(&mut state, 5), vec![MonitorAction::ResolveOwner]);
        assert_eq!(state.phase(), MonitorPhase::Armed);
    }

    #[test]
    fn self_write_echo_is_suppressed_once() {
        let mut state = started(1);
        state.apply(MonitorEvent::SelfWriteCompleted).unwrap();

        assert_eq!(notify(&mut state, 2), vec![MonitorAction::ResolveOwner]);
        assert!(!state.self_write_pending());
        assert_eq!(state.phase(), MonitorPhase::Armed);

        assert_eq!(
            notify(&mut state, 3),
            vec![MonitorAction::ResolveOwner, MonitorAction::StartDebounceTimer]
        );
    }

    #[test]
    fn self_write_during_debounce_cancels_the_timer() {
        let mut state = started(1);
        notify(&mut state, 2);
        assert_eq!(state.phase(), MonitorPhase::Debouncing);

        let actions = state.apply(MonitorEvent::SelfWriteCompleted).unwrap();

        assert_eq!(actions, vec![MonitorAction::CancelDebounceTimer]);
        assert_eq!(state.phase(), MonitorPhase::Armed);
        assert!(state.self_write_pending());
        assert!(state.apply(MonitorEvent::TimerFired).unwrap().is_empty());
    }

    #[test]
    fn duplicate_notification_does_not_consume_self_write_marker() {
        let mut state = started(1);
        state.apply(MonitorEvent::SelfWriteCompleted).unwrap();

        notify(&mut state, 1);
        assert!(state.self_write_pending());
    }

    #[test]
    fn notifications_are_ignored_when_stopped_or_for_other_windows() {
        let mut stopped = MonitorState::new();
        assert!(notify(&mut stopped, 7).is_empty());

        let mut state = started(1);
        let actions = state
            .apply(MonitorEvent::Notification {
                window: OTHER,
                sequence: 2,
            })
            .unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.last_sequence(), 1);
    }

    #[test]
    fn stop_cancels_pending_timer_and_is_idempotent() {
        let mut state = started(1);
        notify(&mut state, 2);

        let actions = state.apply(MonitorEvent::Stop).unwrap();
        assert_eq!(
            actions,
            vec![
                MonitorAction::CancelDebounceTimer,
                MonitorAction::Unsubscribe { window: WINDOW }
            ]
        );
        assert_eq!(state.phase(), MonitorPhase::Stopped);
        assert!(state.apply(MonitorEvent::Stop).unwrap().is_empty());
        assert!(state.apply(MonitorEvent::TimerFired).unwrap().is_empty());
    }

    #[test]
    fn restart_after_stop_starts_clean() {
        let mut state = started(1);
        state.apply(MonitorEvent::SelfWriteCompleted).unwrap();
        notify(&mut state, 2);
        state.apply(MonitorEvent::Stop).unwrap();

        let actions = state
            .apply(MonitorEvent::Start {
                window: OTHER,
                sequence: 8,
            })
            .unwrap();

        assert_eq!(actions[0], MonitorAction::ResetPreviousState);
        assert_eq!(state.phase(), MonitorPhase::Armed);
        assert_eq!(state.window(), Some(OTHER));
        assert!(!state.self_write_pending());
    }

    #[test]
    fn destroyed_window_stops_only_its_own_monitor() {
        let mut state = started(1);
        assert!(state
            .apply(MonitorEvent::WindowDestroyed { window: OTHER })
            .unwrap()
            .is_empty());
        assert!(state.is_monitoring());

        let actions = state
            .apply(MonitorEvent::WindowDestroyed { window: WINDOW })
            .unwrap();
        assert_eq!(actions, vec![MonitorAction::Unsubscribe { window: WINDOW }]);
        assert!(!state.is_monitoring());
    }

    #[test]
    fn capture_request_preempts_the_debounce_timer() {
        let mut state = started(1);
        notify(&mut state, 2);

        let actions = state.apply(MonitorEvent::CaptureRequested).unwrap();
        assert_eq!(
            actions,
            vec![MonitorAction::CancelDebounceTimer, MonitorAction::RunCapture]
        );
        assert_eq!(state.phase(), MonitorPhase::Armed);

        let idle = started(1).apply(MonitorEvent::CaptureRequested).unwrap();
        assert_eq!(idle, vec![MonitorAction::RunCapture]);
    }
}
