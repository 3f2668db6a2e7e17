//! Gemini REST client
//!
//! Implements the generation port (`generateContent` and
//! `streamGenerateContent`) and the three media ports on top of the same
//! endpoint family.

use super::mapping::{build_request, interpret_response};
use super::protocol::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GoogleErrorResponse, InlineData, Part, PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};
use super::sse::SseDecoder;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use futures::stream::{self, StreamExt};
use genflow_application::{
    GenerationClient, ImageSynthesizer, MediaError, ProviderError, ProviderStream, SpeechToText,
    TextToSpeech,
};
use genflow_domain::{
    AudioClip, GenerationRequest, GenerationResult, ImageAsset, ModelId, SpeechAudio, Transcript,
};
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Sample rate assumed when the TTS MIME type does not carry one
const DEFAULT_PCM_RATE: u32 = 24_000;

const TRANSCRIBE_PROMPT: &str =
    "Transcribe this audio verbatim. Reply with the transcript only, without commentary.";

#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    api_key: String,
    text_model: ModelId,
    image_model: ModelId,
    tts_model: ModelId,
    voice: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("tts_model", &self.tts_model)
            .field("voice", &self.voice)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: api_key.into(),
            text_model: ModelId::default_text(),
            image_model: ModelId::default_image(),
            tts_model: ModelId::default_tts(),
            voice: "Algenib".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_text_model(mut self, model: ModelId) -> Self {
        self.text_model = model;
        self
    }

    pub fn with_image_model(mut self, model: ModelId) -> Self {
        self.image_model = model;
        self
    }

    pub fn with_tts_model(mut self, model: ModelId) -> Self {
        self.tts_model = model;
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    fn url(&self, model: &ModelId, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            model.as_str(),
            method
        )
    }

    fn model_for<'a>(&'a self, request: &'a GenerationRequest) -> &'a ModelId {
        request.model.as_ref().unwrap_or(&self.text_model)
    }

    async fn send(
        &self,
        url: String,
        body: &GenerateContentRequest,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GoogleErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));
        Err(map_status(status, message))
    }

    async fn generate_content(
        &self,
        model: &ModelId,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        self.send(self.url(model, "generateContent"), body, &[])
            .await?
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("Invalid response body: {}", e)))
    }

    /// First inline media part of the first candidate
    async fn generate_media(
        &self,
        model: &ModelId,
        body: &GenerateContentRequest,
    ) -> Result<Option<InlineData>, ProviderError> {
        let response = self.generate_content(model, body).await?;
        Ok(response
            .into_first_candidate()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.inline_data)))
    }
}

fn map_transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Unavailable(err.to_string())
    }
}

/// Rate limiting and server errors are transient; other failures are not
fn map_status(status: StatusCode, message: String) -> ProviderError {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        ProviderError::Unavailable(message)
    } else {
        ProviderError::Rejected(message)
    }
}

fn decode_inline(data: &InlineData) -> Result<Vec<u8>, MediaError> {
    BASE64
        .decode(data.data.as_bytes())
        .map_err(|e| MediaError::Unsupported(format!("invalid base64 media: {}", e)))
}

/// Parse `rate=24000` out of e.g. `audio/L16;codec=pcm;rate=24000`
fn pcm_rate(mime_type: &str) -> u32 {
    mime_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.parse().ok())
        .unwrap_or(DEFAULT_PCM_RATE)
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn complete(&self, request: &GenerationRequest) -> Result<GenerationResult, ProviderError> {
        let model = self.model_for(request);
        debug!(
            model = %model,
            tools = request.tools.len(),
            rounds = request.transcript.len(),
            "Sending generateContent"
        );
        let response = self.generate_content(model, &build_request(request)).await?;
        interpret_response(response, request.is_structured())
    }

    async fn stream(&self, request: &GenerationRequest) -> Result<ProviderStream, ProviderError> {
        let model = self.model_for(request);
        debug!(model = %model, "Opening streamGenerateContent");
        let response = self
            .send(
                self.url(model, "streamGenerateContent"),
                &build_request(request),
                &[("alt", "sse")],
            )
            .await?;

        let mut decoder = SseDecoder::default();
        let items = response.bytes_stream().flat_map(move |chunk| {
            let items = match chunk {
                Ok(bytes) => decoder.push(&bytes),
                Err(e) if decoder.is_finished() => {
                    debug!(error = %e, "Ignoring transport error after completion");
                    Vec::new()
                }
                Err(e) => vec![Err(map_transport_error(e))],
            };
            stream::iter(items)
        });
        Ok(items.boxed())
    }
}

#[async_trait]
impl ImageSynthesizer for GeminiClient {
    async fn synthesize(&self, prompt: &str) -> Result<Option<ImageAsset>, MediaError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };

        match self.generate_media(&self.image_model, &body).await? {
            Some(data) => {
                let bytes = decode_inline(&data)?;
                info!(bytes = bytes.len(), mime = %data.mime_type, "Image synthesized");
                Ok(Some(ImageAsset::new(bytes, data.mime_type)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TextToSpeech for GeminiClient {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, MediaError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(text)])],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let data = self
            .generate_media(&self.tts_model, &body)
            .await?
            .ok_or(MediaError::EmptyResult)?;
        let pcm = decode_inline(&data)?;
        Ok(SpeechAudio::from_pcm(&pcm, pcm_rate(&data.mime_type), 1))
    }
}

#[async_trait]
impl SpeechToText for GeminiClient {
    async fn transcribe(&self, audio: &AudioClip) -> Result<Transcript, MediaError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::text(TRANSCRIBE_PROMPT),
                Part::inline_data(&audio.mime_type, BASE64.encode(&audio.bytes)),
            ])],
            ..Default::default()
        };

        let response = self.generate_content(&self.text_model, &body).await?;
        let text: String = response
            .into_first_candidate()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(MediaError::EmptyResult);
        }
        Ok(Transcript::new(text))
    }
}
