//! Audio-backed speech collaborators
//!
//! Microphone capture with local end-pointing, Whisper transcription and
//! `OpenAI` TTS with speaker playback. Device work runs on blocking threads
//! so the collaborators stay `Send`.

mod capture;
mod endpoint;
mod playback;
mod stt;
mod tts;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav};
pub use endpoint::{Endpoint, Endpointer};
pub use playback::AudioPlayback;
pub use stt::SpeechToText;
pub use tts::{SynthesisError, TextToSpeech, is_recoverable};

use crate::config::Config;
use crate::speech::{CaptureError, CapturedAudio, SpeechCapture, SpeechOutcome, SpeechOutput, Utterance};
use crate::{Error, Result};

/// Build microphone capture and spoken output from configuration
///
/// # Errors
///
/// Returns error if the `OpenAI` API key is missing
pub fn open(config: &Config) -> Result<(MicrophoneCapture, SpokenOutput)> {
    let api_key = config
        .api_keys
        .openai
        .clone()
        .ok_or_else(|| Error::Config("OPENAI_API_KEY required for voice mode".to_string()))?;

    let stt = SpeechToText::new_whisper(
        api_key.clone(),
        config.voice.stt_model.clone(),
        &config.language,
    )?;
    let tts = TextToSpeech::new_openai(
        api_key,
        config.voice.tts_voice.clone(),
        config.voice.tts_speed,
        config.voice.tts_model.clone(),
    )?;

    tracing::info!(
        stt_model = %config.voice.stt_model,
        tts_model = %config.voice.tts_model,
        tts_voice = %config.voice.tts_voice,
        "voice collaborators ready"
    );

    Ok((
        MicrophoneCapture { stt: Arc::new(stt) },
        SpokenOutput { tts: Arc::new(tts) },
    ))
}

/// [`SpeechCapture`] recording from the default microphone
#[derive(Debug, Clone)]
pub struct MicrophoneCapture {
    stt: Arc<SpeechToText>,
}

#[async_trait]
impl SpeechCapture for MicrophoneCapture {
    async fn listen(
        &mut self,
        timeout: Duration,
        phrase_limit: Duration,
    ) -> std::result::Result<Utterance, CaptureError> {
        tracing::info!("listening");
        let recorded = tokio::task::spawn_blocking(move || {
            AudioCapture::new()?.record_utterance(timeout, phrase_limit)
        })
        .await
        .map_err(|e| CaptureError::Device(e.to_string()))?
        .map_err(|e| CaptureError::Device(e.to_string()))?;

        let Some(samples) = recorded else {
            return Err(CaptureError::Timeout);
        };

        let wav = samples_to_wav(&samples, SAMPLE_RATE).map_err(|e| CaptureError::Device(e.to_string()))?;
        let audio = CapturedAudio::from_bytes(wav);
        let text = self.recognize(&audio).await?;

        Ok(Utterance {
            text,
            audio: Some(audio),
        })
    }

    async fn recognize(&mut self, audio: &CapturedAudio) -> std::result::Result<String, CaptureError> {
        let text = self
            .stt
            .transcribe(audio.as_bytes())
            .await
            .map_err(|e| CaptureError::Device(e.to_string()))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(CaptureError::Unrecognized);
        }
        Ok(text.to_string())
    }
}

/// [`SpeechOutput`] synthesizing with TTS and playing on the default speakers
#[derive(Debug, Clone)]
pub struct SpokenOutput {
    tts: Arc<TextToSpeech>,
}

#[async_trait]
impl SpeechOutput for SpokenOutput {
    async fn speak(&mut self, text: &str) -> SpeechOutcome {
        let mp3 = match self.tts.synthesize(text).await {
            Ok(mp3) => mp3,
            Err(e) if e.is_recoverable() => return SpeechOutcome::Retryable(e.to_string()),
            Err(e) => return SpeechOutcome::Fatal(e.to_string()),
        };

        let played = tokio::task::spawn_blocking(move || AudioPlayback::new()?.play_mp3(&mp3)).await;
        match played {
            Ok(Ok(())) => SpeechOutcome::Done,
            Ok(Err(e)) => SpeechOutcome::Fatal(e.to_string()),
            Err(e) => SpeechOutcome::Fatal(format!("playback task failed: {e}")),
        }
    }
}
