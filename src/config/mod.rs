//! Configuration management for the Starlight kiosk
//!
//! Precedence: environment > TOML file > defaults. Command-line flags are
//! applied on top by the binary.

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use crate::input::{DEFAULT_COOLDOWN, DEFAULT_DEBOUNCE};
use crate::navigation::SessionOptions;
use crate::{Error, Result};

/// Default knowledge base directory, relative to the working directory
pub const DEFAULT_KNOWLEDGE_DIR: &str = "Jsons";

/// Default spoken language
pub const DEFAULT_LANGUAGE: &str = "pt-BR";

/// Kiosk configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Knowledge base root
    pub knowledge_dir: PathBuf,

    /// Spoken language tag
    pub language: String,

    /// Session startup options
    pub session: SessionOptions,

    /// Input gating windows
    pub input: InputConfig,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// API keys
    pub api_keys: ApiKeys,
}

/// Input gating windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    pub debounce: Duration,
    pub cooldown: Duration,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            cooldown: DEFAULT_COOLDOWN,
        }
    }
}

/// Voice processing configuration
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConfig {
    /// Use microphone and speakers
    pub enabled: bool,

    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
        }
    }
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (for Whisper and TTS)
    pub openai: Option<String>,
}

impl Config {
    /// Load configuration from the environment and the config file
    ///
    /// # Errors
    ///
    /// Returns error if a configured value is out of range
    pub fn load() -> Result<Self> {
        Self::from_sources(file::load_config_file(), |key| std::env::var(key).ok())
    }

    /// Build configuration from a parsed file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if a configured value is out of range
    pub fn from_sources(
        fc: file::KioskConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let knowledge_dir = env("STARLIGHT_KNOWLEDGE_DIR")
            .or(fc.knowledge_dir)
            .map_or_else(|| PathBuf::from(DEFAULT_KNOWLEDGE_DIR), PathBuf::from);

        let language = env("STARLIGHT_LANGUAGE")
            .or(fc.language)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let defaults = SessionOptions::default();
        let session = SessionOptions {
            show_intro: fc.session.show_intro.unwrap_or(defaults.show_intro),
            confirm_timeout: fc
                .session
                .confirm_timeout_secs
                .map_or(defaults.confirm_timeout, Duration::from_secs),
            listen_timeout: fc
                .session
                .listen_timeout_secs
                .map_or(defaults.listen_timeout, Duration::from_secs),
            phrase_limit: fc
                .session
                .phrase_limit_secs
                .map_or(defaults.phrase_limit, Duration::from_secs),
            narration_pause: fc
                .session
                .narration_pause_ms
                .map_or(defaults.narration_pause, Duration::from_millis),
            suggestion_count: fc.session.suggestion_count.unwrap_or(defaults.suggestion_count),
        };

        let input = InputConfig {
            debounce: fc.input.debounce_ms.map_or(DEFAULT_DEBOUNCE, Duration::from_millis),
            cooldown: fc.input.cooldown_ms.map_or(DEFAULT_COOLDOWN, Duration::from_millis),
        };

        let default_voice = VoiceConfig::default();
        let voice = VoiceConfig {
            enabled: fc.voice.enabled.unwrap_or(default_voice.enabled),
            stt_model: env("STARLIGHT_STT_MODEL")
                .or(fc.voice.stt_model)
                .unwrap_or(default_voice.stt_model),
            tts_model: env("STARLIGHT_TTS_MODEL")
                .or(fc.voice.tts_model)
                .unwrap_or(default_voice.tts_model),
            tts_voice: fc.voice.tts_voice.unwrap_or(default_voice.tts_voice),
            tts_speed: fc.voice.tts_speed.unwrap_or(default_voice.tts_speed),
        };

        if !(0.25..=4.0).contains(&voice.tts_speed) {
            return Err(Error::Config(format!(
                "voice.tts_speed must be between 0.25 and 4.0, got {}",
                voice.tts_speed
            )));
        }

        let api_keys = ApiKeys {
            openai: env("OPENAI_API_KEY").or(fc.api_keys.openai),
        };

        let config = Self {
            knowledge_dir,
            language,
            session,
            input,
            voice,
            api_keys,
        };

        tracing::debug!(
            knowledge_dir = %config.knowledge_dir.display(),
            language = %config.language,
            voice = config.voice.enabled,
            "configuration loaded"
        );

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::file::KioskConfigFile;
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(KioskConfigFile::default(), no_env).unwrap();

        assert_eq!(config.knowledge_dir, PathBuf::from("Jsons"));
        assert_eq!(config.language, "pt-BR");
        assert_eq!(config.session, SessionOptions::default());
        assert_eq!(config.input, InputConfig::default());
        assert_eq!(config.voice, VoiceConfig::default());
        assert!(config.api_keys.openai.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut fc = KioskConfigFile {
            knowledge_dir: Some("from-file".to_string()),
            ..KioskConfigFile::default()
        };
        fc.voice.stt_model = Some("file-model".to_string());
        fc.session.narration_pause_ms = Some(0);

        let config = Config::from_sources(fc, |key| match key {
            "STARLIGHT_KNOWLEDGE_DIR" => Some("from-env".to_string()),
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.knowledge_dir, PathBuf::from("from-env"));
        assert_eq!(config.voice.stt_model, "file-model");
        assert_eq!(config.session.narration_pause, Duration::ZERO);
        assert_eq!(config.api_keys.openai.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_rejects_out_of_range_speed() {
        let mut fc = KioskConfigFile::default();
        fc.voice.tts_speed = Some(9.0);
        assert!(matches!(Config::from_sources(fc, no_env), Err(Error::Config(_))));
    }
}
