//! Media conversion ports
//!
//! Speech-to-text, text-to-speech and image synthesis are external
//! collaborators reached through these request/response contracts.

use super::generation_client::ProviderError;
use async_trait::async_trait;
use genflow_domain::{AudioClip, ImageAsset, SpeechAudio, Transcript};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Provider returned no media")]
    EmptyResult,

    #[error("Unsupported media: {0}")]
    Unsupported(String),
}

#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio: &AudioClip) -> Result<Transcript, MediaError>;
}

#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, MediaError>;
}

#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    /// `Ok(None)` when the provider answered without an image
    async fn synthesize(&self, prompt: &str) -> Result<Option<ImageAsset>, MediaError>;
}
