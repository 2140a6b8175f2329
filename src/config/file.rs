//! TOML configuration file loading
//!
//! Supports `~/.config/starlight/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct KioskConfigFile {
    /// Knowledge base root directory
    pub knowledge_dir: Option<String>,

    /// Spoken language tag (e.g. "pt-BR")
    pub language: Option<String>,

    /// Session timings and narration
    #[serde(default)]
    pub session: SessionFileConfig,

    /// Input gating windows
    #[serde(default)]
    pub input: InputFileConfig,

    /// Voice/audio configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Session timings
#[derive(Debug, Default, Deserialize)]
pub struct SessionFileConfig {
    /// Narrate the key legend at start
    pub show_intro: Option<bool>,

    /// Confirmation wait in seconds
    pub confirm_timeout_secs: Option<u64>,

    /// Wait for speech to start, in seconds
    pub listen_timeout_secs: Option<u64>,

    /// Longest captured phrase, in seconds
    pub phrase_limit_secs: Option<u64>,

    /// Pause between narrated blocks, in milliseconds
    pub narration_pause_ms: Option<u64>,

    /// Suggestions offered after a failed search
    pub suggestion_count: Option<usize>,
}

/// Input gating windows
#[derive(Debug, Default, Deserialize)]
pub struct InputFileConfig {
    pub debounce_ms: Option<u64>,
    pub cooldown_ms: Option<u64>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Use microphone and speakers instead of the terminal
    pub enabled: Option<bool>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// TTS model (e.g. "tts-1")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,

    /// TTS speed multiplier
    pub tts_speed: Option<f64>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `KioskConfigFile::default()` if the file doesn't exist or can't be parsed.
#[must_use]
pub fn load_config_file() -> KioskConfigFile {
    config_file_path().map_or_else(KioskConfigFile::default, |path| load_config_from(&path))
}

/// Load a TOML config file from `path`, falling back to defaults
#[must_use]
pub fn load_config_from(path: &Path) -> KioskConfigFile {
    if !path.exists() {
        return KioskConfigFile::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                KioskConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            KioskConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/starlight/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("starlight").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
knowledge_dir = "/srv/kiosk/Jsons"

[session]
show_intro = false
confirm_timeout_secs = 5

[voice]
tts_voice = "nova"
"#,
        )
        .unwrap();

        let fc = load_config_from(&path);
        assert_eq!(fc.knowledge_dir.as_deref(), Some("/srv/kiosk/Jsons"));
        assert_eq!(fc.session.show_intro, Some(false));
        assert_eq!(fc.session.confirm_timeout_secs, Some(5));
        assert_eq!(fc.session.listen_timeout_secs, None);
        assert_eq!(fc.voice.tts_voice.as_deref(), Some("nova"));
        assert!(fc.api_keys.openai.is_none());
    }

    #[test]
    fn test_missing_and_malformed_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_config_from(&dir.path().join("absent.toml"));
        assert!(missing.knowledge_dir.is_none());

        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "knowledge_dir = [unterminated").unwrap();
        let broken = load_config_from(&path);
        assert!(broken.knowledge_dir.is_none());
    }
}
