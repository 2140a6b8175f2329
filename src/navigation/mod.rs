//! Kiosk navigation state machine
//!
//! [`Navigator`] owns the session: it interprets each accepted [`Action`]
//! according to the current [`NavigationState`], drives the spoken protocols
//! and keeps the screen in sync. All collaborators are injected.

mod prompts;
mod protocol;

use std::time::Duration;

use rand::Rng;

use crate::input::{Action, Confirmer};
use crate::knowledge::{KnowledgeStore, Record};
use crate::matching::MatchEngine;
use crate::render::{ConsoleRenderer, Screen};
use crate::speech::{CapturedAudio, SpeechCapture, Speaker};

/// Where the user is in the menus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigationState {
    #[default]
    MainMenu,
    ChoosingTopic,
    ChoosingSubtopic,
    QuestionMode,
    /// Modal; returns to the state it was opened from
    RepeatSubmenu,
}

/// Entries of the replay submenu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOption {
    /// Re-recognize the last captured input
    CapturedAudio,
    /// Speak the last answer again
    LastAnswer,
}

impl ReplayOption {
    pub const ALL: [Self; 2] = [Self::CapturedAudio, Self::LastAnswer];
}

/// Session startup parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Narrate the key legend and search notes at start
    pub show_intro: bool,
    /// How long confirmation waits for Select or Back
    pub confirm_timeout: Duration,
    /// How long capture waits for speech to start
    pub listen_timeout: Duration,
    /// Longest phrase capture records
    pub phrase_limit: Duration,
    /// Pause between narrated blocks
    pub narration_pause: Duration,
    /// Suggestions offered after a failed search
    pub suggestion_count: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            show_intro: true,
            confirm_timeout: Duration::from_secs(8),
            listen_timeout: Duration::from_secs(8),
            phrase_limit: Duration::from_secs(6),
            narration_pause: Duration::from_millis(500),
            suggestion_count: 2,
        }
    }
}

/// Mutable session state, owned by the [`Navigator`]
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub state: NavigationState,
    pub topic_cursor: usize,
    pub subtopic_cursor: usize,
    pub replay_cursor: usize,
    /// Chosen topic
    pub topic: Option<String>,
    /// Chosen subtopic, set while in question mode
    pub subtopic: Option<String>,
    /// Records of the chosen subtopic
    pub records: Vec<Record>,
    pub last_query: Option<String>,
    pub last_audio: Option<CapturedAudio>,
    /// Last answer actually spoken
    pub last_answer: Option<String>,
    /// State to restore when the replay submenu closes
    pub return_state: Option<NavigationState>,
}

/// The kiosk controller
pub struct Navigator {
    store: KnowledgeStore,
    engine: MatchEngine,
    speaker: Speaker,
    capture: Box<dyn SpeechCapture>,
    renderer: Box<dyn ConsoleRenderer>,
    options: SessionOptions,
    ctx: SessionContext,
}

impl Navigator {
    /// Create a navigator in the main menu
    #[must_use]
    pub fn new(
        store: KnowledgeStore,
        speaker: Speaker,
        capture: Box<dyn SpeechCapture>,
        renderer: Box<dyn ConsoleRenderer>,
        options: SessionOptions,
    ) -> Self {
        Self {
            store,
            engine: MatchEngine::new(),
            speaker,
            capture,
            renderer,
            options,
            ctx: SessionContext::default(),
        }
    }

    /// Session state
    #[must_use]
    pub const fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> NavigationState {
        self.ctx.state
    }

    /// Narrate the intro (if enabled) and show the main menu
    pub async fn start(&mut self) {
        tracing::info!(
            topics = self.store.index().len(),
            show_intro = self.options.show_intro,
            "kiosk session starting"
        );

        if self.options.show_intro {
            let (welcome, legend) = prompts::INTRO.split_at(1);
            for line in welcome {
                self.speaker.say(line).await;
            }
            self.pause().await;
            for line in legend {
                self.speaker.say(line).await;
            }
            self.pause().await;
            for line in prompts::SEARCH_NOTES {
                self.speaker.say(line).await;
            }
        }

        self.render_current();
    }

    /// Say goodbye
    pub async fn shutdown(&mut self) {
        tracing::info!("kiosk session ending");
        self.speaker.say(prompts::FAREWELL).await;
    }

    /// Handle one accepted action.
    ///
    /// Confirmation waits read their answer from `confirmer`.
    pub async fn handle(&mut self, action: Action, confirmer: &mut dyn Confirmer) {
        use Action::{Back, Down, Random, Repeat, Select, Shutdown, Up};
        use NavigationState::{ChoosingSubtopic, ChoosingTopic, MainMenu, QuestionMode, RepeatSubmenu};

        tracing::debug!(state = ?self.ctx.state, ?action, "handling action");

        match (self.ctx.state, action) {
            (_, Shutdown) | (RepeatSubmenu, Repeat | Random) => {
                tracing::debug!(state = ?self.ctx.state, ?action, "action ignored");
            }
            (_, Repeat) => self.open_replay_menu().await,

            (RepeatSubmenu, Up) => self.move_replay_cursor(false),
            (RepeatSubmenu, Down) => self.move_replay_cursor(true),
            (RepeatSubmenu, Select) => self.replay().await,
            (RepeatSubmenu, Back) => self.close_replay_menu(),

            (MainMenu, Select) => {
                self.ctx.state = ChoosingTopic;
                self.render_current();
                self.speaker.say(prompts::CHOOSE_TOPIC).await;
            }
            (MainMenu, Random) => self.random_anywhere(confirmer).await,

            (ChoosingTopic, Up) => self.move_topic_cursor(false).await,
            (ChoosingTopic, Down) => self.move_topic_cursor(true).await,
            (ChoosingTopic, Select) => self.choose_topic().await,
            (ChoosingTopic, Back) => {
                self.ctx.state = MainMenu;
                self.render_current();
                self.speaker.say(prompts::MAIN_MENU).await;
            }
            (ChoosingTopic, Random) => self.random_in_topic(confirmer).await,

            (ChoosingSubtopic, Up) => self.move_subtopic_cursor(false).await,
            (ChoosingSubtopic, Down) => self.move_subtopic_cursor(true).await,
            (ChoosingSubtopic, Select) => self.enter_question_mode().await,
            (ChoosingSubtopic, Back) => {
                self.ctx.state = ChoosingTopic;
                self.render_current();
                self.speaker.say(prompts::CHOOSING_TOPIC).await;
            }
            (ChoosingSubtopic, Random) => self.draw_subtopic().await,

            (QuestionMode, Select) => self.ask_and_match(confirmer).await,
            (QuestionMode, Back) => self.leave_question_mode().await,
            (QuestionMode, Random) => self.random_in_subtopic(confirmer).await,

            (MainMenu | QuestionMode, Up | Down) | (MainMenu, Back) => {
                tracing::trace!(state = ?self.ctx.state, ?action, "no effect");
            }
        }
    }

    async fn move_topic_cursor(&mut self, forward: bool) {
        let topics = self.store.topics();
        let Some(cursor) = step(self.ctx.topic_cursor, topics.len(), forward) else {
            return;
        };
        self.ctx.topic_cursor = cursor;
        self.render_current();
        self.speaker.say(&topics[cursor]).await;
    }

    async fn choose_topic(&mut self) {
        let topics = self.store.topics();
        let Some(topic) = topics.get(self.ctx.topic_cursor).cloned() else {
            self.speaker.say(prompts::NO_TOPICS).await;
            return;
        };

        tracing::info!(topic = %topic, "topic chosen");
        self.ctx.topic = Some(topic.clone());
        self.ctx.subtopic_cursor = 0;
        self.ctx.state = NavigationState::ChoosingSubtopic;
        self.render_current();
        self.speaker.say(&prompts::topic_chosen(&topic)).await;
    }

    async fn move_subtopic_cursor(&mut self, forward: bool) {
        let subtopics = self.current_subtopics();
        let Some(cursor) = step(self.ctx.subtopic_cursor, subtopics.len(), forward) else {
            return;
        };
        self.ctx.subtopic_cursor = cursor;
        self.render_current();
        self.speaker.say(&subtopics[cursor]).await;
    }

    async fn draw_subtopic(&mut self) {
        let subtopics = self.current_subtopics();
        if subtopics.is_empty() {
            return;
        }
        let cursor = rand::thread_rng().gen_range(0..subtopics.len());
        self.ctx.subtopic_cursor = cursor;
        self.render_current();
        self.speaker.say(&prompts::subtopic_drawn(&subtopics[cursor])).await;
    }

    async fn enter_question_mode(&mut self) {
        let Some(topic) = self.ctx.topic.clone() else {
            return;
        };
        let Some(subtopic) = self.current_subtopics().get(self.ctx.subtopic_cursor).cloned() else {
            return;
        };

        tracing::info!(topic = %topic, subtopic = %subtopic, "entering question mode");
        self.ctx.subtopic = Some(subtopic.clone());
        self.ctx.state = NavigationState::QuestionMode;
        self.speaker.say(&prompts::loading(&subtopic)).await;

        self.ctx.records = self.store.load_records(&topic, &subtopic);
        if self.ctx.records.is_empty() {
            self.speaker.say(prompts::LOAD_FAILED).await;
            self.leave_question_mode().await;
            return;
        }

        self.render_current();
        self.speaker.say(&prompts::loaded(self.ctx.records.len())).await;
    }

    async fn leave_question_mode(&mut self) {
        self.ctx.state = NavigationState::ChoosingSubtopic;
        self.ctx.subtopic = None;
        self.ctx.records.clear();
        self.render_current();
        self.speaker.say(prompts::CHOOSING_SUBTOPIC).await;
    }

    async fn open_replay_menu(&mut self) {
        self.ctx.return_state = Some(self.ctx.state);
        self.ctx.state = NavigationState::RepeatSubmenu;
        self.ctx.replay_cursor = 0;
        self.render_current();
        self.speaker.say(prompts::REPLAY_MENU).await;
    }

    fn close_replay_menu(&mut self) {
        self.ctx.state = self.ctx.return_state.take().unwrap_or_default();
        self.render_current();
    }

    fn move_replay_cursor(&mut self, forward: bool) {
        if let Some(cursor) = step(self.ctx.replay_cursor, ReplayOption::ALL.len(), forward) {
            self.ctx.replay_cursor = cursor;
            self.render_current();
        }
    }

    fn current_subtopics(&self) -> Vec<String> {
        self.ctx
            .topic
            .as_deref()
            .map(|topic| self.store.list_subtopics(topic).to_vec())
            .unwrap_or_default()
    }

    fn render(&mut self, screen: &Screen) {
        self.renderer.render(screen);
    }

    /// Draw the screen of the current state
    fn render_current(&mut self) {
        let screen = match self.ctx.state {
            NavigationState::MainMenu => Screen::MainMenu,
            NavigationState::ChoosingTopic => Screen::Topics {
                topics: self.store.topics(),
                cursor: self.ctx.topic_cursor,
            },
            NavigationState::ChoosingSubtopic => Screen::Subtopics {
                topic: self.ctx.topic.clone().unwrap_or_default(),
                subtopics: self.current_subtopics(),
                cursor: self.ctx.subtopic_cursor,
            },
            NavigationState::QuestionMode => Screen::QuestionMode {
                topic: self.ctx.topic.clone().unwrap_or_default(),
                subtopic: self.ctx.subtopic.clone().unwrap_or_default(),
            },
            NavigationState::RepeatSubmenu => Screen::ReplayMenu {
                options: prompts::REPLAY_OPTIONS.iter().map(ToString::to_string).collect(),
                cursor: self.ctx.replay_cursor,
            },
        };
        self.render(&screen);
    }

    async fn pause(&self) {
        if !self.options.narration_pause.is_zero() {
            tokio::time::sleep(self.options.narration_pause).await;
        }
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("store", &self.store)
            .field("options", &self.options)
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}

/// Move a cursor one step with wrap-around; `None` for empty lists
const fn step(cursor: usize, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let cursor = if cursor >= len { 0 } else { cursor };
    Some(if forward {
        (cursor + 1) % len
    } else {
        (cursor + len - 1) % len
    })
}
