//! Input events, gating and delivery
//!
//! Input sources push [`InputEvent`]s into an [`EventSink`]. The sink applies
//! the [`InputGate`] at dispatch time and forwards accepted events to the
//! [`Inbox`], which the control loop drains one action at a time. The inbox is
//! also where confirmation waits read their Select/Back answer from.

mod gate;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::mpsc;

pub use gate::{DEFAULT_COOLDOWN, DEFAULT_DEBOUNCE, InputGate};

use crate::error::Result;

/// Abstract user actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Select,
    Back,
    Random,
    Repeat,
    Shutdown,
}

/// An action stamped with the moment it happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub action: Action,
    pub at: Instant,
}

impl InputEvent {
    /// Event happening now
    #[must_use]
    pub fn now(action: Action) -> Self {
        Self {
            action,
            at: Instant::now(),
        }
    }
}

/// Produces input events for the kiosk
pub trait InputSource: Send {
    /// Start delivering events to `sink`.
    ///
    /// # Errors
    ///
    /// Returns error if the source cannot be started
    fn subscribe(self: Box<Self>, sink: EventSink) -> Result<()>;
}

/// Source that never produces anything
#[derive(Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn subscribe(self: Box<Self>, _sink: EventSink) -> Result<()> {
        tracing::info!("no input source configured");
        Ok(())
    }
}

/// Create a connected sink and inbox sharing `gate`
#[must_use]
pub fn channel(gate: InputGate) -> (EventSink, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sink = EventSink {
        gate: Arc::new(Mutex::new(gate)),
        tx,
    };
    let inbox = Inbox {
        rx,
        shutdown_pending: false,
        closed: false,
    };
    (sink, inbox)
}

/// Gated entry point for input sources
#[derive(Debug, Clone)]
pub struct EventSink {
    gate: Arc<Mutex<InputGate>>,
    tx: mpsc::UnboundedSender<InputEvent>,
}

impl EventSink {
    /// Offer an event. Returns whether it was accepted.
    ///
    /// Shutdown always passes the gate.
    pub fn dispatch(&self, event: InputEvent) -> bool {
        if event.action != Action::Shutdown {
            let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
            if !gate.accepts(&event) {
                return false;
            }
        }

        tracing::debug!(action = ?event.action, "input accepted");
        self.tx.send(event).is_ok()
    }

    /// Whether the receiving side is gone
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Outcome of a confirmation wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
    TimedOut,
}

impl Confirmation {
    /// Only an explicit Select counts as yes
    #[must_use]
    pub const fn is_confirmed(self) -> bool {
        matches!(self, Self::Confirmed)
    }
}

/// Waits for the user to confirm or cancel
#[async_trait]
pub trait Confirmer: Send {
    /// Wait up to `timeout` for Select (confirm) or Back (cancel)
    async fn confirm(&mut self, timeout: Duration) -> Confirmation;
}

/// Receiving end of accepted input
#[derive(Debug)]
pub struct Inbox {
    rx: mpsc::UnboundedReceiver<InputEvent>,
    shutdown_pending: bool,
    closed: bool,
}

impl Inbox {
    /// Next accepted action.
    ///
    /// A shutdown seen during a confirmation wait is returned first. Once all
    /// sources are gone this never resolves.
    pub async fn next(&mut self) -> Action {
        if std::mem::take(&mut self.shutdown_pending) {
            return Action::Shutdown;
        }

        if !self.closed {
            if let Some(event) = self.rx.recv().await {
                return event.action;
            }
            tracing::info!("input sources closed");
            self.closed = true;
        }

        std::future::pending().await
    }

    /// Wait for Select or Back, ignoring everything else.
    ///
    /// Events stamped before the wait began are stale and skipped. A shutdown
    /// cancels the wait and is replayed by the next [`Inbox::next`].
    pub async fn await_confirmation(&mut self, timeout: Duration) -> Confirmation {
        let started = Instant::now();
        let rx = &mut self.rx;
        let shutdown_pending = &mut self.shutdown_pending;

        let wait = async {
            while let Some(event) = rx.recv().await {
                if event.at < started {
                    tracing::trace!(action = ?event.action, "stale event ignored");
                    continue;
                }
                match event.action {
                    Action::Select => return Confirmation::Confirmed,
                    Action::Back => return Confirmation::Cancelled,
                    Action::Shutdown => {
                        *shutdown_pending = true;
                        return Confirmation::Cancelled;
                    }
                    action => tracing::trace!(?action, "ignored while confirming"),
                }
            }
            std::future::pending().await
        };

        let outcome = tokio::time::timeout(timeout, wait)
            .await
            .unwrap_or(Confirmation::TimedOut);
        tracing::debug!(?outcome, "confirmation");
        outcome
    }
}

#[async_trait]
impl Confirmer for Inbox {
    async fn confirm(&mut self, timeout: Duration) -> Confirmation {
        self.await_confirmation(timeout).await
    }
}
