//! Suppression of stray key presses

use std::time::{Duration, Instant};

use super::InputEvent;
use crate::speech::OutputLock;

/// Default debounce window between accepted events
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default hold-off after speech output ends
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(300);

/// Decides whether an input event may reach the state machine.
///
/// An event is rejected while speech output is in progress, within the
/// cooldown after output ends, or within the debounce window of the last
/// accepted event. The three checks are independent.
#[derive(Debug, Clone)]
pub struct InputGate {
    lock: OutputLock,
    debounce: Duration,
    cooldown: Duration,
    last_accepted: Option<Instant>,
}

impl InputGate {
    /// Gate with the default windows
    #[must_use]
    pub const fn new(lock: OutputLock) -> Self {
        Self::with_windows(lock, DEFAULT_DEBOUNCE, DEFAULT_COOLDOWN)
    }

    /// Gate with explicit debounce and cooldown windows
    #[must_use]
    pub const fn with_windows(lock: OutputLock, debounce: Duration, cooldown: Duration) -> Self {
        Self {
            lock,
            debounce,
            cooldown,
            last_accepted: None,
        }
    }

    /// Check an event, recording it as the last accepted one on success
    pub fn accepts(&mut self, event: &InputEvent) -> bool {
        let state = self.lock.state();
        let speaking = state.speaking;
        let cooling = state
            .released_at
            .is_some_and(|released| event.at.saturating_duration_since(released) < self.cooldown);
        let bouncing = self
            .last_accepted
            .is_some_and(|last| event.at.saturating_duration_since(last) < self.debounce);

        if speaking || cooling || bouncing {
            tracing::debug!(action = ?event.action, speaking, cooling, bouncing, "input suppressed");
            return false;
        }

        self.last_accepted = Some(event.at);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Action;

    fn event_at(at: Instant) -> InputEvent {
        InputEvent {
            action: Action::Down,
            at,
        }
    }

    #[test]
    fn test_debounce_window() {
        let mut gate = InputGate::new(OutputLock::new());
        let t0 = Instant::now();

        assert!(gate.accepts(&event_at(t0)));
        assert!(!gate.accepts(&event_at(t0 + Duration::from_millis(100))));
        assert!(!gate.accepts(&event_at(t0 + Duration::from_millis(299))));
        assert!(gate.accepts(&event_at(t0 + Duration::from_millis(300))));
    }

    #[test]
    fn test_rejected_events_do_not_extend_debounce() {
        let mut gate = InputGate::new(OutputLock::new());
        let t0 = Instant::now();

        assert!(gate.accepts(&event_at(t0)));
        assert!(!gate.accepts(&event_at(t0 + Duration::from_millis(200))));
        assert!(gate.accepts(&event_at(t0 + Duration::from_millis(350))));
    }

    #[test]
    fn test_rejects_while_speaking() {
        let lock = OutputLock::new();
        let mut gate = InputGate::with_windows(lock.clone(), Duration::ZERO, Duration::ZERO);

        let guard = lock.hold();
        assert!(!gate.accepts(&event_at(Instant::now())));
        drop(guard);
        assert!(gate.accepts(&event_at(Instant::now())));
    }

    #[test]
    fn test_cooldown_after_release() {
        let lock = OutputLock::new();
        let mut gate = InputGate::with_windows(lock.clone(), Duration::ZERO, DEFAULT_COOLDOWN);

        drop(lock.hold());
        let released = lock.state().released_at.unwrap();

        assert!(!gate.accepts(&event_at(released + Duration::from_millis(100))));
        assert!(gate.accepts(&event_at(released + Duration::from_millis(300))));
    }
}
