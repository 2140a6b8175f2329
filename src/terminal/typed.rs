//! Typed questions standing in for speech capture

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use console::Term;
use tokio::sync::mpsc;

use crate::speech::{CaptureError, CapturedAudio, SpeechCapture, Utterance};

/// [`SpeechCapture`] reading one typed line from the terminal
#[derive(Debug)]
pub struct TypedCapture {
    term: Term,
    line_mode: Arc<AtomicBool>,
    lines: mpsc::UnboundedReceiver<String>,
}

impl TypedCapture {
    pub(super) const fn new(
        term: Term,
        line_mode: Arc<AtomicBool>,
        lines: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        Self {
            term,
            line_mode,
            lines,
        }
    }
}

#[async_trait]
impl SpeechCapture for TypedCapture {
    /// Typing gets `timeout + phrase_limit` in total
    async fn listen(
        &mut self,
        timeout: Duration,
        phrase_limit: Duration,
    ) -> Result<Utterance, CaptureError> {
        while self.lines.try_recv().is_ok() {}

        let _ = self.term.write_str("> ");
        self.line_mode.store(true, Ordering::SeqCst);
        let received = tokio::time::timeout(timeout + phrase_limit, self.lines.recv()).await;
        self.line_mode.store(false, Ordering::SeqCst);

        match received {
            Err(_) => {
                let _ = self.term.write_line("");
                Err(CaptureError::Timeout)
            }
            Ok(None) => Err(CaptureError::Device("keyboard closed".to_string())),
            Ok(Some(line)) => {
                let text = line.trim().to_string();
                if text.is_empty() {
                    return Err(CaptureError::Unrecognized);
                }
                Ok(Utterance {
                    audio: Some(CapturedAudio::from_bytes(text.clone().into_bytes())),
                    text,
                })
            }
        }
    }

    async fn recognize(&mut self, audio: &CapturedAudio) -> Result<String, CaptureError> {
        String::from_utf8(audio.as_bytes().to_vec()).map_err(|_| CaptureError::Unrecognized)
    }
}
