//! Printed stand-in for speech output

use async_trait::async_trait;
use console::{Term, style};

use crate::speech::{SpeechOutcome, SpeechOutput};

/// [`SpeechOutput`] that prints instead of speaking
#[derive(Debug, Clone)]
pub struct PrintedSpeech {
    term: Term,
}

impl PrintedSpeech {
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for PrintedSpeech {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechOutput for PrintedSpeech {
    async fn speak(&mut self, text: &str) -> SpeechOutcome {
        match self.term.write_line(&format!("{} {text}", style("🔊").cyan())) {
            Ok(()) => SpeechOutcome::Done,
            Err(e) => SpeechOutcome::Fatal(e.to_string()),
        }
    }
}
