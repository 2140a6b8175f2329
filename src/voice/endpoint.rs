//! Utterance end-pointing
//!
//! Local energy detection decides when speech starts and when it has ended,
//! so only the spoken phrase is sent for transcription.

use std::time::{Duration, Instant};

use super::SAMPLE_RATE;

/// Minimum audio energy threshold to consider speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum duration of speech to count as an utterance (0.3 s at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800;

/// Silence that ends an utterance (0.5 s at 16kHz)
const SILENCE_SAMPLES: usize = 8000;

/// Progress of an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Keep feeding audio
    Pending,
    /// Speech followed by silence, or the phrase limit was reached
    Complete,
    /// Nothing was said before the wait ran out
    NoSpeech,
}

/// Finds one utterance in a stream of audio chunks
#[derive(Debug)]
pub struct Endpointer {
    wait_limit: usize,
    phrase_limit: usize,
    waited: usize,
    speaking: bool,
    silence: usize,
    speech: Vec<f32>,
    /// Wall-clock bound, for devices that stop delivering samples
    deadline: Instant,
}

impl Endpointer {
    /// Wait up to `timeout` for speech, then keep at most `phrase_limit` of it
    #[must_use]
    pub fn new(timeout: Duration, phrase_limit: Duration) -> Self {
        Self {
            wait_limit: samples_in(timeout),
            phrase_limit: samples_in(phrase_limit).max(MIN_SPEECH_SAMPLES),
            waited: 0,
            speaking: false,
            silence: 0,
            speech: Vec::new(),
            deadline: Instant::now() + timeout + phrase_limit,
        }
    }

    /// Feed the next chunk of samples
    pub fn push(&mut self, chunk: &[f32]) -> Endpoint {
        self.push_at(chunk, Instant::now())
    }

    /// Feed a chunk received at `now`
    pub fn push_at(&mut self, chunk: &[f32], now: Instant) -> Endpoint {
        let outcome = self.feed(chunk);
        if outcome != Endpoint::Pending || now < self.deadline {
            return outcome;
        }

        if self.speaking && self.speech.len() - self.silence >= MIN_SPEECH_SAMPLES {
            tracing::debug!(samples = self.speech.len(), "listen deadline reached mid-utterance");
            Endpoint::Complete
        } else {
            tracing::debug!(waited = self.waited, "listen deadline reached");
            self.speech.clear();
            Endpoint::NoSpeech
        }
    }

    fn feed(&mut self, chunk: &[f32]) -> Endpoint {
        let is_speech = calculate_energy(chunk) > ENERGY_THRESHOLD;

        if !self.speaking {
            if is_speech {
                tracing::trace!("speech started");
                self.speaking = true;
                self.silence = 0;
                self.speech.extend_from_slice(chunk);
                return Endpoint::Pending;
            }
            self.waited += chunk.len();
            return if self.waited >= self.wait_limit {
                Endpoint::NoSpeech
            } else {
                Endpoint::Pending
            };
        }

        self.speech.extend_from_slice(chunk);
        if is_speech {
            self.silence = 0;
        } else {
            self.silence += chunk.len();
        }

        if self.speech.len() >= self.phrase_limit {
            tracing::debug!(samples = self.speech.len(), "phrase limit reached");
            return Endpoint::Complete;
        }

        if self.silence > SILENCE_SAMPLES {
            if self.speech.len() - self.silence >= MIN_SPEECH_SAMPLES {
                tracing::debug!(samples = self.speech.len(), "utterance complete");
                return Endpoint::Complete;
            }
            // Too short to be speech; keep waiting
            self.waited += self.speech.len();
            self.speaking = false;
            self.speech.clear();
            if self.waited >= self.wait_limit {
                return Endpoint::NoSpeech;
            }
        }

        Endpoint::Pending
    }

    /// Captured speech samples
    #[must_use]
    pub fn take_speech(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.speech)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn samples_in(duration: Duration) -> usize {
    (duration.as_millis() * u128::from(SAMPLE_RATE) / 1000) as usize
}

/// Calculate RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
fn calculate_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHUNK: usize = 1600;

    fn silence() -> Vec<f32> {
        vec![0.0; CHUNK]
    }

    fn speech() -> Vec<f32> {
        vec![0.5; CHUNK]
    }

    #[test]
    fn test_energy_calculation() {
        assert!(calculate_energy(&silence()) < 0.001);
        assert!(calculate_energy(&speech()) > 0.4);
        assert!(calculate_energy(&[]) < f32::EPSILON);
    }

    #[test]
    fn test_times_out_without_speech() {
        let mut ep = Endpointer::new(Duration::from_millis(500), Duration::from_secs(6));
        let outcomes: Vec<_> = (0..5).map(|_| ep.push(&silence())).collect();
        assert_eq!(outcomes[..4], [Endpoint::Pending; 4]);
        assert_eq!(outcomes[4], Endpoint::NoSpeech);
    }

    #[test]
    fn test_completes_after_trailing_silence() {
        let mut ep = Endpointer::new(Duration::from_secs(8), Duration::from_secs(6));
        for _ in 0..5 {
            assert_eq!(ep.push(&speech()), Endpoint::Pending);
        }
        for _ in 0..5 {
            assert_eq!(ep.push(&silence()), Endpoint::Pending);
        }
        assert_eq!(ep.push(&silence()), Endpoint::Complete);
        assert_eq!(ep.take_speech().len(), 11 * CHUNK);
    }

    #[test]
    fn test_phrase_limit_cuts_long_speech() {
        let mut ep = Endpointer::new(Duration::from_secs(8), Duration::from_millis(500));
        for _ in 0..4 {
            assert_eq!(ep.push(&speech()), Endpoint::Pending);
        }
        assert_eq!(ep.push(&speech()), Endpoint::Complete);
    }

    #[test]
    fn test_stalled_device_hits_deadline() {
        let mut ep = Endpointer::new(Duration::from_secs(1), Duration::from_secs(6));
        let start = Instant::now();

        for _ in 0..1000 {
            assert_eq!(ep.push_at(&[], start), Endpoint::Pending);
        }
        assert_eq!(ep.push_at(&[], start + Duration::from_secs(8)), Endpoint::NoSpeech);
    }

    #[test]
    fn test_deadline_keeps_speech_already_heard() {
        let mut ep = Endpointer::new(Duration::from_secs(1), Duration::from_secs(6));
        let start = Instant::now();

        for _ in 0..4 {
            assert_eq!(ep.push_at(&speech(), start), Endpoint::Pending);
        }
        assert_eq!(ep.push_at(&[], start + Duration::from_secs(8)), Endpoint::Complete);
        assert_eq!(ep.take_speech().len(), 4 * CHUNK);
    }

    #[test]
    fn test_short_blip_is_ignored() {
        let mut ep = Endpointer::new(Duration::from_secs(8), Duration::from_secs(6));
        assert_eq!(ep.push(&speech()), Endpoint::Pending);
        for _ in 0..6 {
            assert_eq!(ep.push(&silence()), Endpoint::Pending);
        }
        assert!(ep.take_speech().is_empty());
    }
}
