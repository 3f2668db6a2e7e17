//! Offline provider
//!
//! Answers every port without network access. Queued responses are served
//! first; afterwards the provider improvises: it calls the first offered
//! tool once, then answers with a sample value matching the requested
//! shape (or plain text).

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use futures::stream::{self, StreamExt};
use genflow_application::{
    GenerationClient, ImageSynthesizer, MediaError, ProviderError, ProviderStream,
    ProviderStreamItem, SpeechToText, TextToSpeech,
};
use genflow_domain::schema::{OutputShape, StringFormat};
use genflow_domain::{
    AudioClip, GenerationRequest, GenerationResult, ImageAsset, SpeechAudio, ToolCall, Transcript,
};
use serde_json::{Map, Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// 1x1 transparent PNG
const PLACEHOLDER_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

const SPEECH_RATE: u32 = 24_000;

/// Samples of silence per spoken word
const SAMPLES_PER_WORD: usize = 6_000;

/// Number of elements generated for sample arrays
const SAMPLE_ARRAY_LEN: usize = 3;

#[derive(Debug, Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<GenerationResult>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: impl IntoIterator<Item = GenerationResult>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
        }
    }

    /// Queue a response to be served before improvising
    pub fn push(&self, response: GenerationResult) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
    }

    fn next_scripted(&self) -> Option<GenerationResult> {
        self.responses.lock().ok().and_then(|mut queue| queue.pop_front())
    }

    fn improvise(request: &GenerationRequest) -> GenerationResult {
        if request.transcript.is_empty()
            && let Some(tool) = request.tools.first()
        {
            return GenerationResult::tool_call(ToolCall::new(&tool.name));
        }

        match &request.output_shape {
            Some(shape) => GenerationResult::final_value(sample_value(shape, "value")),
            None => GenerationResult::text(offline_text(request)),
        }
    }
}

fn offline_text(request: &GenerationRequest) -> String {
    let mut text = format!(
        "[offline] Received a prompt of {} words.",
        request.prompt.split_whitespace().count()
    );
    for entry in &request.transcript {
        text.push_str(&format!(" {} returned {}.", entry.tool_name, entry.output));
    }
    text
}

/// Build a value that satisfies `shape`
pub fn sample_value(shape: &OutputShape, label: &str) -> Value {
    match shape {
        OutputShape::String { allowed: Some(values), .. } if !values.is_empty() => {
            Value::String(values[0].clone())
        }
        OutputShape::String {
            format: Some(StringFormat::Uri),
            ..
        } => Value::String(format!("data:image/png;base64,{}", PLACEHOLDER_PNG)),
        OutputShape::String { .. } => Value::String(format!("Sample {}", label)),
        OutputShape::Number { min, max, integer } => {
            let n = min.or(*max).unwrap_or(1.0);
            if *integer {
                json!(n.ceil() as i64)
            } else {
                json!(n)
            }
        }
        OutputShape::Boolean => Value::Bool(true),
        OutputShape::Array { items } => Value::Array(
            (1..=SAMPLE_ARRAY_LEN)
                .map(|i| sample_value(items, &format!("{} {}", label, i)))
                .collect(),
        ),
        OutputShape::Object { fields } => Value::Object(
            fields
                .iter()
                .map(|field| (field.name.clone(), sample_value(&field.shape, &field.name)))
                .collect::<Map<_, _>>(),
        ),
        OutputShape::Any => Value::Null,
    }
}

#[async_trait]
impl GenerationClient for ScriptedProvider {
    async fn complete(&self, request: &GenerationRequest) -> Result<GenerationResult, ProviderError> {
        let result = self
            .next_scripted()
            .unwrap_or_else(|| Self::improvise(request));
        debug!(kind = result.kind(), "Offline provider answered");
        Ok(result)
    }

    async fn stream(&self, request: &GenerationRequest) -> Result<ProviderStream, ProviderError> {
        let items: Vec<Result<ProviderStreamItem, ProviderError>> =
            match self.complete(request).await? {
                GenerationResult::ToolCall { call } => vec![Ok(ProviderStreamItem::ToolCall(call))],
                GenerationResult::Error { reason } => vec![Err(ProviderError::Rejected(reason))],
                GenerationResult::Final { value } => {
                    let text = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    text.split_inclusive(' ')
                        .map(|word| Ok(ProviderStreamItem::Text(word.to_string())))
                        .chain(std::iter::once(Ok(ProviderStreamItem::Done)))
                        .collect()
                }
            };
        Ok(stream::iter(items).boxed())
    }
}

#[async_trait]
impl ImageSynthesizer for ScriptedProvider {
    async fn synthesize(&self, prompt: &str) -> Result<Option<ImageAsset>, MediaError> {
        debug!(prompt, "Offline image");
        let bytes = BASE64
            .decode(PLACEHOLDER_PNG)
            .map_err(|e| MediaError::Unsupported(e.to_string()))?;
        Ok(Some(ImageAsset::new(bytes, "image/png")))
    }
}

#[async_trait]
impl TextToSpeech for ScriptedProvider {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, MediaError> {
        let words = text.split_whitespace().count().max(1);
        let pcm = vec![0u8; words * SAMPLES_PER_WORD * 2];
        Ok(SpeechAudio::from_pcm(&pcm, SPEECH_RATE, 1))
    }
}

#[async_trait]
impl SpeechToText for ScriptedProvider {
    async fn transcribe(&self, audio: &AudioClip) -> Result<Transcript, MediaError> {
        Ok(Transcript::new(format!(
            "[offline] {} bytes of {}",
            audio.bytes.len(),
            audio.mime_type
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genflow_domain::schema::{FieldShape, validate};
    use genflow_domain::tool::ToolDescriptor;

    fn slide_shape() -> OutputShape {
        OutputShape::object([
            FieldShape::required("title", OutputShape::string()),
            FieldShape::required("slides", OutputShape::array(OutputShape::object([
                FieldShape::required("title", OutputShape::string()),
                FieldShape::required("points", OutputShape::array(OutputShape::string())),
                FieldShape::optional("rating", OutputShape::integer().bounded(1.0, 5.0)),
                FieldShape::required("level", OutputShape::one_of(["beginner", "advanced"])),
            ]))),
        ])
    }

    #[test]
    fn test_sample_value_satisfies_shape() {
        let shape = slide_shape();
        let value = sample_value(&shape, "value");
        assert!(validate(&value, &shape).is_ok());
        assert_eq!(value["slides"].as_array().unwrap().len(), SAMPLE_ARRAY_LEN);
        assert_eq!(value["slides"][0]["level"], "beginner");
        assert_eq!(value["slides"][0]["rating"], 1);
    }

    #[tokio::test]
    async fn test_scripted_responses_come_first() {
        let provider = ScriptedProvider::with_responses([GenerationResult::text("scripted")]);
        let request = GenerationRequest::new("hi");

        assert_eq!(
            provider.complete(&request).await.unwrap(),
            GenerationResult::text("scripted")
        );
        assert!(matches!(
            provider.complete(&request).await.unwrap(),
            GenerationResult::Final { value: Value::String(ref s) } if s.starts_with("[offline]")
        ));
    }

    #[tokio::test]
    async fn test_calls_first_tool_once() {
        let provider = ScriptedProvider::new();
        let request = GenerationRequest::new("What events are on?").with_tools(vec![ToolDescriptor {
            name: "getCampusEvents".to_string(),
            description: "events".to_string(),
            input_shape: OutputShape::empty_object(),
        }]);

        let first = provider.complete(&request).await.unwrap();
        assert_eq!(first, GenerationResult::tool_call(ToolCall::new("getCampusEvents")));

        let followup = request.augmented(&ToolCall::new("getCampusEvents"), json!([]));
        let second = provider.complete(&followup).await.unwrap();
        assert!(second.is_final());
    }

    #[tokio::test]
    async fn test_stream_splits_words() {
        let provider = ScriptedProvider::with_responses([GenerationResult::text("Library opens at 8")]);
        let items: Vec<_> = provider
            .stream(&GenerationRequest::new("hi"))
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(items.len(), 5);
        assert_eq!(items[0], Ok(ProviderStreamItem::Text("Library ".into())));
        assert_eq!(items[3], Ok(ProviderStreamItem::Text("8".into())));
        assert_eq!(items[4], Ok(ProviderStreamItem::Done));
    }

    #[tokio::test]
    async fn test_media_placeholders() {
        let provider = ScriptedProvider::new();

        let image = ImageSynthesizer::synthesize(&provider, "a campus").await.unwrap().unwrap();
        assert_eq!(&image.bytes[1..4], b"PNG");

        let audio = TextToSpeech::synthesize(&provider, "two words").await.unwrap();
        assert_eq!(audio.bytes.len(), 44 + 2 * SAMPLES_PER_WORD * 2);

        let transcript = provider
            .transcribe(&AudioClip::new(vec![0; 10], "audio/webm"))
            .await
            .unwrap();
        assert_eq!(transcript.text, "[offline] 10 bytes of audio/webm");
    }
}
