//! Daemon - the kiosk control loop
//!
//! Drains accepted input one action at a time and hands it to the
//! [`Navigator`]. Ctrl-C and the Shutdown action both end the session.

use tokio::sync::mpsc;

use crate::Result;
use crate::input::{Action, Inbox};
use crate::navigation::Navigator;

/// The kiosk daemon
#[derive(Debug)]
pub struct Daemon {
    navigator: Navigator,
    inbox: Inbox,
}

impl Daemon {
    /// Create a daemon over a navigator and its input
    #[must_use]
    pub const fn new(navigator: Navigator, inbox: Inbox) -> Self {
        Self { navigator, inbox }
    }

    /// Run until shutdown
    ///
    /// # Errors
    ///
    /// Returns error if the daemon encounters a fatal error
    #[allow(clippy::future_not_send)]
    pub async fn run(mut self) -> Result<()> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(()).await;
            }
        });

        self.navigator.start().await;
        tracing::info!("kiosk running");

        loop {
            let action = tokio::select! {
                Some(()) = shutdown_rx.recv() => {
                    tracing::info!("shutdown requested");
                    break;
                }
                action = self.inbox.next() => action,
            };

            if action == Action::Shutdown {
                tracing::info!("shutdown requested from input");
                break;
            }

            self.navigator.handle(action, &mut self.inbox).await;
        }

        self.navigator.shutdown().await;
        tracing::info!("kiosk stopped");
        Ok(())
    }
}
