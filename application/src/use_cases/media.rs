//! Media use case
//!
//! Wraps the speech ports with the configured media timeout. An elapsed
//! timeout surfaces as `ProviderError::Timeout`.

use crate::ports::generation_client::ProviderError;
use crate::ports::media::{MediaError, SpeechToText, TextToSpeech};
use genflow_domain::{AudioClip, SpeechAudio, Transcript};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct MediaUseCase {
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
    timeout: Duration,
}

impl MediaUseCase {
    pub fn new(stt: Arc<dyn SpeechToText>, tts: Arc<dyn TextToSpeech>, timeout: Duration) -> Self {
        Self { stt, tts, timeout }
    }

    /// Speech to text
    pub async fn transcribe(&self, audio: &AudioClip) -> Result<Transcript, MediaError> {
        if audio.bytes.is_empty() {
            return Err(MediaError::Unsupported("empty audio clip".to_string()));
        }
        debug!(bytes = audio.bytes.len(), mime = %audio.mime_type, "Transcribing audio");
        self.timed("transcribe", self.stt.transcribe(audio)).await
    }

    /// Text to speech
    pub async fn speak(&self, text: &str) -> Result<SpeechAudio, MediaError> {
        if text.trim().is_empty() {
            return Err(MediaError::Unsupported("nothing to speak".to_string()));
        }
        debug!(chars = text.len(), "Synthesizing speech");
        self.timed("speak", self.tts.synthesize(text)).await
    }

    async fn timed<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, MediaError>>,
    ) -> Result<T, MediaError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, timeout_ms = self.timeout.as_millis() as u64, "Media call timed out");
                Err(MediaError::Provider(ProviderError::Timeout))
            }
        }
    }
}
