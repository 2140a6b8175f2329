//! Speech collaborators consumed by the kiosk
//!
//! The kiosk never talks to audio hardware directly. It speaks through a
//! [`SpeechOutput`] and listens through a [`SpeechCapture`]; terminal and
//! audio-device implementations live in `terminal` and `voice`.

mod speaker;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use speaker::{LockState, OutputLock, Speaker, SpeakingGuard};

/// Result of one speech output call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Text was spoken to completion
    Done,
    /// Transient failure (busy engine, rate limit); worth one more try
    Retryable(String),
    /// Permanent failure for this text
    Fatal(String),
}

/// Synthesizes text to the user
#[async_trait]
pub trait SpeechOutput: Send {
    /// Speak `text`, returning once output has finished
    async fn speak(&mut self, text: &str) -> SpeechOutcome;
}

/// Why a capture produced no text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// Nothing was said before the timeout
    #[error("no speech before timeout")]
    Timeout,

    /// Something was heard but could not be transcribed
    #[error("speech not recognized")]
    Unrecognized,

    /// Microphone, network or recognizer failure
    #[error("capture failed: {0}")]
    Device(String),
}

/// Opaque handle to the raw input of the last capture
///
/// Only the [`SpeechCapture`] that produced it knows how to interpret the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAudio(Arc<[u8]>);

impl CapturedAudio {
    /// Wrap captured bytes
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Text recognized from one capture, with its raw input when available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub text: String,
    pub audio: Option<CapturedAudio>,
}

/// Captures one spoken (or typed) question
#[async_trait]
pub trait SpeechCapture: Send {
    /// Wait up to `timeout` for speech to start, then record at most
    /// `phrase_limit` of it and transcribe
    async fn listen(
        &mut self,
        timeout: Duration,
        phrase_limit: Duration,
    ) -> Result<Utterance, CaptureError>;

    /// Transcribe a previously captured input again
    async fn recognize(&mut self, audio: &CapturedAudio) -> Result<String, CaptureError>;
}
