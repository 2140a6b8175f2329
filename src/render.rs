//! What the kiosk shows on screen
//!
//! The state machine describes each screen as a [`Screen`] value and hands it
//! to a [`ConsoleRenderer`]. Layout lives in the renderer.

use crate::knowledge::Suggestion;
use crate::matching::MatchTier;

/// One screenful of kiosk output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Startup menu with the key legend
    MainMenu,
    /// Topic list with the highlighted entry
    Topics { topics: Vec<String>, cursor: usize },
    /// Subtopic list of the chosen topic
    Subtopics {
        topic: String,
        subtopics: Vec<String>,
        cursor: usize,
    },
    /// Ready to take a spoken question
    QuestionMode { topic: String, subtopic: String },
    /// Recognized question awaiting confirmation
    ConfirmQuestion { question: String },
    /// Matched record awaiting confirmation
    MatchFound {
        tier: MatchTier,
        related_question: String,
        asked: String,
    },
    /// Suggested questions after a failed search
    Suggestions(Vec<Suggestion>),
    /// Transient status line
    Waiting { message: String },
    /// Replay submenu
    ReplayMenu { options: Vec<String>, cursor: usize },
}

/// Draws screens
pub trait ConsoleRenderer: Send {
    fn render(&mut self, screen: &Screen);
}
