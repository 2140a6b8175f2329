//! Spoken protocols: ask-and-match, answer offers, suggestions, replay

use rand::seq::SliceRandom;

use super::{Navigator, ReplayOption, prompts};
use crate::input::Confirmer;
use crate::knowledge::Pick;
use crate::matching::{Match, MatchResult, SearchScope};
use crate::render::Screen;
use crate::speech::CaptureError;

impl Navigator {
    /// Capture a question, confirm it, search and offer the answer
    pub(super) async fn ask_and_match(&mut self, confirmer: &mut dyn Confirmer) {
        self.speaker.say(prompts::ASK).await;
        self.render(&Screen::Waiting {
            message: prompts::LISTENING.to_string(),
        });

        let Some(query) = self.capture_query().await else {
            self.render_current();
            return;
        };

        self.render(&Screen::ConfirmQuestion {
            question: query.clone(),
        });
        self.speaker.say(&prompts::you_asked(&query)).await;

        let confirmation = confirmer.confirm(self.options.confirm_timeout).await;
        if !confirmation.is_confirmed() {
            tracing::info!(?confirmation, "question not confirmed");
            self.speaker.say(prompts::QUESTION_CANCELLED).await;
            self.render_current();
            return;
        }

        self.render(&Screen::Waiting {
            message: prompts::SEARCHING.to_string(),
        });
        let scope = self.scope();
        match self.engine.find(&self.store, &query, scope.as_ref()) {
            MatchResult::Found(found) => self.offer_match(&found, &query, confirmer).await,
            MatchResult::NoMatch => self.suggest_alternatives().await,
        }
        self.render_current();
    }

    /// Listen once; failures are spoken and yield `None`
    async fn capture_query(&mut self) -> Option<String> {
        let captured = self
            .capture
            .listen(self.options.listen_timeout, self.options.phrase_limit)
            .await
            .and_then(|utterance| {
                if utterance.text.trim().is_empty() {
                    Err(CaptureError::Unrecognized)
                } else {
                    Ok(utterance)
                }
            });

        match captured {
            Ok(utterance) => {
                let text = utterance.text.trim().to_string();
                tracing::info!(query = %text, "question captured");
                self.ctx.last_query = Some(text.clone());
                if utterance.audio.is_some() {
                    self.ctx.last_audio = utterance.audio;
                }
                Some(text)
            }
            Err(e) => {
                tracing::warn!(error = %e, "capture produced no question");
                let notice = match e {
                    CaptureError::Timeout => prompts::HEARD_NOTHING,
                    CaptureError::Unrecognized => prompts::NOT_UNDERSTOOD,
                    CaptureError::Device(_) => prompts::MICROPHONE_ERROR,
                };
                self.speaker.say(notice).await;
                None
            }
        }
    }

    fn scope(&self) -> Option<SearchScope> {
        let topic = self.ctx.topic.as_deref()?;
        Some(match self.ctx.subtopic.as_deref() {
            Some(subtopic) => SearchScope::subtopic(topic, subtopic),
            None => SearchScope::topic(topic),
        })
    }

    async fn offer_match(&mut self, found: &Match, asked: &str, confirmer: &mut dyn Confirmer) {
        self.render(&Screen::MatchFound {
            tier: found.tier(),
            related_question: found.record.question.clone(),
            asked: asked.to_string(),
        });

        self.speaker.say(prompts::tier(found.tier())).await;
        self.speaker.say(prompts::RELATED_QUESTION).await;
        self.speaker.say(&found.record.question).await;
        self.speaker.say(prompts::OFFER_MATCHED_ANSWER).await;

        if confirmer.confirm(self.options.confirm_timeout).await.is_confirmed() {
            self.speak_answer(&found.record.answer).await;
        } else {
            self.speaker.say(prompts::ANSWER_NOT_PLAYED).await;
        }
    }

    /// Narrate suggested questions after a failed search
    async fn suggest_alternatives(&mut self) {
        self.speaker.say(prompts::NO_ANSWER).await;
        self.pause().await;

        let suggestions = self
            .store
            .suggest_questions(self.ctx.topic.as_deref(), self.options.suggestion_count);
        if suggestions.is_empty() {
            self.speaker.say(prompts::NO_SUGGESTIONS).await;
            return;
        }

        self.speaker.say(prompts::SUGGESTIONS_INTRO).await;
        self.pause().await;
        self.render(&Screen::Suggestions(suggestions.clone()));

        let last = suggestions.len();
        for (position, suggestion) in (1..).zip(&suggestions) {
            self.speaker
                .say(&prompts::suggestion(position, &suggestion.topic, &suggestion.subtopic))
                .await;
            self.speaker.say(&suggestion.question).await;
            if position < last {
                self.pause().await;
            }
        }

        self.speaker.say(prompts::SUGGESTIONS_OUTRO).await;
    }

    pub(super) async fn random_anywhere(&mut self, confirmer: &mut dyn Confirmer) {
        self.speaker.say(prompts::RANDOM_ANYWHERE).await;
        match self.store.random_record_anywhere() {
            Some(pick) => self.offer_answer(pick, confirmer).await,
            None => self.speaker.say(prompts::NOTHING_ANYWHERE).await,
        }
    }

    pub(super) async fn random_in_topic(&mut self, confirmer: &mut dyn Confirmer) {
        let Some(topic) = self.store.topics().get(self.ctx.topic_cursor).cloned() else {
            return;
        };

        self.speaker.say(&prompts::random_from_topic(&topic)).await;
        match self.store.random_record(&topic, None) {
            Some(pick) => self.offer_answer(pick, confirmer).await,
            None => self.speaker.say(&prompts::nothing_in_topic(&topic)).await,
        }
    }

    pub(super) async fn random_in_subtopic(&mut self, confirmer: &mut dyn Confirmer) {
        let (Some(topic), Some(subtopic)) = (self.ctx.topic.clone(), self.ctx.subtopic.clone()) else {
            return;
        };
        let Some(record) = self.ctx.records.choose(&mut rand::thread_rng()).cloned() else {
            return;
        };

        self.speaker.say(prompts::RANDOM_SUBTOPIC).await;
        let pick = Pick {
            record,
            topic,
            subtopic,
        };
        self.offer_answer(pick, confirmer).await;
    }

    /// Read a drawn question and offer its answer
    async fn offer_answer(&mut self, pick: Pick, confirmer: &mut dyn Confirmer) {
        tracing::info!(
            topic = %pick.topic,
            subtopic = %pick.subtopic,
            question = %pick.record.question,
            "offering random question"
        );

        self.speaker.say(prompts::RANDOM_QUESTION).await;
        self.speaker.say(&prompts::drawn_from(&pick.topic, &pick.subtopic)).await;
        self.speaker.say(&pick.record.question).await;
        self.speaker.say(prompts::OFFER_RANDOM_ANSWER).await;

        if confirmer.confirm(self.options.confirm_timeout).await.is_confirmed() {
            self.speak_answer(&pick.record.answer).await;
        } else {
            self.speaker.say(prompts::ANSWER_SKIPPED).await;
        }
        self.render_current();
    }

    async fn speak_answer(&mut self, answer: &str) {
        self.speaker.say(answer).await;
        self.ctx.last_answer = Some(answer.to_string());
    }

    /// Run the highlighted replay option; stays in the submenu
    pub(super) async fn replay(&mut self) {
        let option = ReplayOption::ALL
            .get(self.ctx.replay_cursor)
            .copied()
            .unwrap_or(ReplayOption::CapturedAudio);
        tracing::debug!(?option, "replay");

        match option {
            ReplayOption::CapturedAudio => match self.ctx.last_audio.clone() {
                Some(audio) => {
                    self.speaker.say(prompts::REPLAYING_AUDIO).await;
                    match self.capture.recognize(&audio).await {
                        Ok(text) => self.speaker.say(&prompts::heard(&text)).await,
                        Err(e) => {
                            tracing::warn!(error = %e, "replaying captured audio failed");
                            self.speaker.say(prompts::REPLAY_AUDIO_FAILED).await;
                        }
                    }
                }
                None => self.speaker.say(prompts::NO_AUDIO).await,
            },
            ReplayOption::LastAnswer => match self.ctx.last_answer.clone() {
                Some(answer) => {
                    self.speaker.say(prompts::REPLAYING_ANSWER).await;
                    self.speaker.say(&answer).await;
                }
                None => self.speaker.say(prompts::NO_ANSWER_YET).await,
            },
        }

        self.render_current();
    }
}
