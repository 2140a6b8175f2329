//! Starlight - voice-driven question and answer kiosk
//!
//! A kiosk that lets a user browse a two-level knowledge base (topics and
//! subtopics) with a handful of keys, ask questions by voice, and hear the
//! best-matching answer after confirming it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────┐   ┌──────────────┐
//! │ InputSource  ├──►│ InputGate ├──►│    Inbox     │
//! └──────────────┘   └─────┬─────┘   └──────┬───────┘
//!                          │ speaking       │ actions
//!                          │                ▼
//! ┌──────────────┐   ┌─────┴─────┐   ┌──────────────┐   ┌────────────────┐
//! │ SpeechOutput │◄──┤  Speaker  │◄──┤  Navigator   ├──►│  MatchEngine   │
//! └──────────────┘   └───────────┘   └──┬────────┬──┘   └───────┬────────┘
//!                                       │        │              │
//!                           SpeechCapture  ConsoleRenderer  KnowledgeStore
//! ```

pub mod config;
pub mod daemon;
pub mod error;
pub mod input;
pub mod knowledge;
pub mod matching;
pub mod navigation;
pub mod render;
pub mod speech;
pub mod terminal;
pub mod text;
#[cfg(feature = "audio")]
pub mod voice;

pub use config::Config;
pub use daemon::Daemon;
pub use error::{Error, Result};
pub use input::{Action, Confirmation, Confirmer, EventSink, Inbox, InputEvent, InputGate, InputSource};
pub use knowledge::{KnowledgeIndex, KnowledgeStore, Record, RecordSource};
pub use matching::{Match, MatchEngine, MatchResult, MatchTier, SearchScope};
pub use navigation::{NavigationState, Navigator, SessionContext, SessionOptions};
pub use render::{ConsoleRenderer, Screen};
pub use speech::{CaptureError, SpeechCapture, SpeechOutcome, SpeechOutput, Speaker};
