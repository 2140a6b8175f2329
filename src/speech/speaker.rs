//! Exclusive speech output
//!
//! [`Speaker`] owns the output collaborator and the "speaking" lock. The lock
//! is held for the whole duration of a speak call and released on every
//! path, recording the release time so input can be held off briefly after
//! speech ends.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use super::{SpeechOutcome, SpeechOutput};

/// Snapshot of the output lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockState {
    /// Speech output in progress
    pub speaking: bool,
    /// When speech output last finished
    pub released_at: Option<Instant>,
}

/// Shared handle to the speaking flag
#[derive(Debug, Clone, Default)]
pub struct OutputLock(Arc<Mutex<LockState>>);

impl OutputLock {
    /// Create a released lock
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark output as in progress until the guard is dropped
    #[must_use]
    pub fn hold(&self) -> SpeakingGuard {
        self.update(|state| state.speaking = true);
        SpeakingGuard { lock: self.clone() }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> LockState {
        self.update(|state| *state)
    }

    /// Whether output is in progress
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.state().speaking
    }

    fn update<R>(&self, f: impl FnOnce(&mut LockState) -> R) -> R {
        let mut state = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

/// Releases the output lock when dropped
#[derive(Debug)]
pub struct SpeakingGuard {
    lock: OutputLock,
}

impl Drop for SpeakingGuard {
    fn drop(&mut self) {
        self.lock.update(|state| {
            state.speaking = false;
            state.released_at = Some(Instant::now());
        });
    }
}

/// Speaks through a [`SpeechOutput`] while holding the output lock
pub struct Speaker {
    output: Box<dyn SpeechOutput>,
    lock: OutputLock,
}

impl Speaker {
    /// Wrap an output collaborator
    #[must_use]
    pub fn new(output: Box<dyn SpeechOutput>) -> Self {
        Self {
            output,
            lock: OutputLock::new(),
        }
    }

    /// Handle to the lock, for input gating
    #[must_use]
    pub fn lock(&self) -> OutputLock {
        self.lock.clone()
    }

    /// Speak `text`.
    ///
    /// Blank text is skipped. A retryable failure is retried once; any
    /// remaining failure is logged and swallowed so the session carries on.
    pub async fn say(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        tracing::info!(text, "speaking");
        let _guard = self.lock.hold();

        let outcome = match self.output.speak(text).await {
            SpeechOutcome::Retryable(reason) => {
                tracing::debug!(reason, "speech output busy, retrying once");
                self.output.speak(text).await
            }
            outcome => outcome,
        };

        match outcome {
            SpeechOutcome::Done => {}
            SpeechOutcome::Retryable(reason) | SpeechOutcome::Fatal(reason) => {
                tracing::warn!(reason, text, "speech output failed");
            }
        }
    }
}

impl std::fmt::Debug for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Speaker").field("lock", &self.lock).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_and_stamps() {
        let lock = OutputLock::new();
        assert_eq!(lock.state(), LockState::default());

        let before = Instant::now();
        {
            let _guard = lock.hold();
            assert!(lock.is_speaking());
        }

        let state = lock.state();
        assert!(!state.speaking);
        assert!(state.released_at.is_some_and(|t| t >= before));
    }

    #[test]
    fn test_clones_share_state() {
        let lock = OutputLock::new();
        let other = lock.clone();
        let _guard = lock.hold();
        assert!(other.is_speaking());
    }
}
