//! Shared test utilities

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use starlight_kiosk::input::{Confirmation, Confirmer};
use starlight_kiosk::navigation::{Navigator, SessionOptions};
use starlight_kiosk::render::{ConsoleRenderer, Screen};
use starlight_kiosk::speech::{
    CaptureError, CapturedAudio, SpeechCapture, SpeechOutcome, SpeechOutput, Speaker, Utterance,
};
use starlight_kiosk::KnowledgeStore;

pub const KINETIC_QUESTION: &str = "O que é energia cinética?";
pub const KINETIC_ANSWER: &str = "É a energia associada ao movimento de um corpo.";
pub const POTENTIAL_QUESTION: &str = "O que é energia potencial?";
pub const POTENTIAL_ANSWER: &str = "É a energia armazenada pela posição de um corpo.";
pub const SKY_QUESTION: &str = "Por que o céu é azul?";
pub const SKY_ANSWER: &str = "Por causa do espalhamento da luz do Sol na atmosfera.";
pub const INDEPENDENCE_QUESTION: &str = "Quando o Brasil ficou independente?";
pub const INDEPENDENCE_ANSWER: &str = "Em 7 de setembro de 1822.";

/// Write `<root>/<topic>/<subtopic>.json`
pub fn write_subtopic(root: &Path, topic: &str, subtopic: &str, json: &str) {
    let dir = root.join(topic);
    std::fs::create_dir_all(&dir).expect("failed to create topic dir");
    std::fs::write(dir.join(format!("{subtopic}.json")), json).expect("failed to write subtopic");
}

/// Two topics: Fisica {Energia (2), Optica (1)} and Historia {Brasil (1), Vazio (0)}
pub fn knowledge_base() -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let root = dir.path();

    write_subtopic(
        root,
        "Fisica",
        "Energia",
        &format!(
            r#"[
                {{"pergunta": "{KINETIC_QUESTION}", "resposta": "{KINETIC_ANSWER}",
                  "palavras_chave": ["energia cinética", "cinética", "movimento"]}},
                {{"pergunta": "{POTENTIAL_QUESTION}", "resposta": "{POTENTIAL_ANSWER}",
                  "palavras_chave": ["energia potencial", "potencial", "altura"]}}
            ]"#
        ),
    );
    write_subtopic(
        root,
        "Fisica",
        "Optica",
        &format!(
            r#"[{{"pergunta": "{SKY_QUESTION}", "resposta": "{SKY_ANSWER}",
                 "palavras_chave": ["céu azul", "espalhamento", "luz"]}}]"#
        ),
    );
    write_subtopic(
        root,
        "Historia",
        "Brasil",
        &format!(
            r#"[{{"pergunta": "{INDEPENDENCE_QUESTION}", "resposta": "{INDEPENDENCE_ANSWER}",
                 "palavras_chave": ["independência", "1822"]}}]"#
        ),
    );
    write_subtopic(root, "Historia", "Vazio", "[]");

    dir
}

/// Everything the kiosk said, in order
#[derive(Debug, Clone, Default)]
pub struct Transcript(Arc<Mutex<Vec<String>>>);

impl Transcript {
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn said(&self, text: &str) -> bool {
        self.0.lock().unwrap().iter().any(|line| line == text)
    }

    pub fn said_containing(&self, fragment: &str) -> bool {
        self.0.lock().unwrap().iter().any(|line| line.contains(fragment))
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    fn push(&self, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }
}

/// Speech output that records every attempt and replays scripted outcomes
#[derive(Debug, Default)]
pub struct RecordingSpeech {
    transcript: Transcript,
    outcomes: VecDeque<SpeechOutcome>,
}

impl RecordingSpeech {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            transcript,
            outcomes: VecDeque::new(),
        }
    }

    /// Outcomes returned by the next calls, then `Done`
    pub fn with_outcomes(mut self, outcomes: impl IntoIterator<Item = SpeechOutcome>) -> Self {
        self.outcomes.extend(outcomes);
        self
    }
}

#[async_trait]
impl SpeechOutput for RecordingSpeech {
    async fn speak(&mut self, text: &str) -> SpeechOutcome {
        self.transcript.push(text);
        self.outcomes.pop_front().unwrap_or(SpeechOutcome::Done)
    }
}

/// Capture replaying scripted results; times out once the script runs dry
#[derive(Debug, Default)]
pub struct ScriptedCapture {
    replies: VecDeque<Result<Utterance, CaptureError>>,
    listens: Arc<Mutex<Vec<(Duration, Duration)>>>,
}

impl ScriptedCapture {
    pub fn new(replies: impl IntoIterator<Item = Result<Utterance, CaptureError>>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            listens: Arc::default(),
        }
    }

    /// Timeouts passed to each listen call
    pub fn listens(&self) -> Arc<Mutex<Vec<(Duration, Duration)>>> {
        Arc::clone(&self.listens)
    }
}

/// A heard question whose raw input decodes back to the same text
pub fn heard(text: &str) -> Result<Utterance, CaptureError> {
    Ok(Utterance {
        text: text.to_string(),
        audio: Some(CapturedAudio::from_bytes(text.as_bytes().to_vec())),
    })
}

#[async_trait]
impl SpeechCapture for ScriptedCapture {
    async fn listen(
        &mut self,
        timeout: Duration,
        phrase_limit: Duration,
    ) -> Result<Utterance, CaptureError> {
        self.listens.lock().unwrap().push((timeout, phrase_limit));
        self.replies.pop_front().unwrap_or(Err(CaptureError::Timeout))
    }

    async fn recognize(&mut self, audio: &CapturedAudio) -> Result<String, CaptureError> {
        String::from_utf8(audio.as_bytes().to_vec()).map_err(|_| CaptureError::Unrecognized)
    }
}

/// Screens drawn, in order
#[derive(Debug, Clone, Default)]
pub struct ScreenLog(Arc<Mutex<Vec<Screen>>>);

impl ScreenLog {
    pub fn screens(&self) -> Vec<Screen> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Screen> {
        self.0.lock().unwrap().last().cloned()
    }
}

impl ConsoleRenderer for ScreenLog {
    fn render(&mut self, screen: &Screen) {
        self.0.lock().unwrap().push(screen.clone());
    }
}

/// Confirmer answering from a script; times out once the script runs dry
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: VecDeque<Confirmation>,
    pub asked: usize,
}

impl ScriptedConfirmer {
    pub fn new(answers: impl IntoIterator<Item = Confirmation>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: 0,
        }
    }
}

#[async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&mut self, _timeout: Duration) -> Confirmation {
        self.asked += 1;
        self.answers.pop_front().unwrap_or(Confirmation::TimedOut)
    }
}

/// Session options with no pauses and no intro
pub fn quiet_options() -> SessionOptions {
    SessionOptions {
        show_intro: false,
        narration_pause: Duration::ZERO,
        ..SessionOptions::default()
    }
}

/// A navigator over the fixture knowledge base with recording collaborators
pub struct Harness {
    pub navigator: Navigator,
    pub transcript: Transcript,
    pub screens: ScreenLog,
    pub listens: Arc<Mutex<Vec<(Duration, Duration)>>>,
    pub dir: TempDir,
}

impl Harness {
    pub fn new(replies: impl IntoIterator<Item = Result<Utterance, CaptureError>>) -> Self {
        Self::with_options(replies, quiet_options())
    }

    pub fn with_options(
        replies: impl IntoIterator<Item = Result<Utterance, CaptureError>>,
        options: SessionOptions,
    ) -> Self {
        let dir = knowledge_base();
        let store = KnowledgeStore::open(dir.path());
        let transcript = Transcript::default();
        let screens = ScreenLog::default();
        let capture = ScriptedCapture::new(replies);
        let listens = capture.listens();

        let navigator = Navigator::new(
            store,
            Speaker::new(Box::new(RecordingSpeech::new(transcript.clone()))),
            Box::new(capture),
            Box::new(screens.clone()),
            options,
        );

        Self {
            navigator,
            transcript,
            screens,
            listens,
            dir,
        }
    }
}
