//! Run Presentation use case
//!
//! Stage 1 generates a [`PresentationOutline`]; stage 2 synthesizes one
//! image per slide. A slide whose image fails keeps its text and gets no
//! image.

use crate::error::PipelineError;
use crate::ports::media::ImageSynthesizer;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::generate::GenerateUseCase;
use crate::use_cases::pipeline::PipelineCoordinator;
use genflow_domain::flows::presentation::{
    Presentation, PresentationInput, PresentationOutline, PresentationOutlineFlow, SlideOutline,
};
use genflow_domain::{CompositeResult, ImageAsset};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub type PresentationResult = CompositeResult<PresentationOutline, SlideOutline, ImageAsset>;

pub struct RunPresentationUseCase {
    generate: Arc<GenerateUseCase>,
    images: Arc<dyn ImageSynthesizer>,
    coordinator: PipelineCoordinator,
}

impl RunPresentationUseCase {
    pub fn new(generate: Arc<GenerateUseCase>, images: Arc<dyn ImageSynthesizer>) -> Self {
        let coordinator = PipelineCoordinator::new(generate.config().clone());
        Self {
            generate,
            images,
            coordinator,
        }
    }

    pub async fn execute(&self, input: &PresentationInput) -> Result<PresentationResult, PipelineError> {
        self.execute_with_progress(input, &NoProgress, &CancellationToken::new())
            .await
    }

    pub async fn execute_with_progress(
        &self,
        input: &PresentationInput,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<PresentationResult, PipelineError> {
        info!(topic = %input.topic, "Generating presentation");

        let outline = self.generate.run_flow::<PresentationOutlineFlow>(input);
        let topic = input.topic.clone();
        let images = Arc::clone(&self.images);

        self.coordinator
            .run(
                outline,
                |plan: &PresentationOutline| plan.slides.clone(),
                move |_, slide: SlideOutline| {
                    let images = Arc::clone(&images);
                    let prompt = PresentationOutlineFlow::image_prompt(&topic, &slide);
                    async move {
                        match images.synthesize(&prompt).await {
                            Ok(Some(image)) => Ok(image),
                            Ok(None) => Err("no image returned".to_string()),
                            Err(e) => Err(e.to_string()),
                        }
                    }
                },
                progress,
                cancel,
            )
            .await
    }

    /// Run the pipeline and project it to the final slide deck
    pub async fn generate_presentation(
        &self,
        input: &PresentationInput,
        progress: &dyn ProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<Presentation, PipelineError> {
        let result = self.execute_with_progress(input, progress, cancel).await?;
        Ok(Presentation::from_composite(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrchestrationConfig;
    use crate::error::OrchestrationError;
    use crate::ports::generation_client::{GenerationClient, ProviderError};
    use crate::ports::media::MediaError;
    use crate::tools::ToolRegistry;
    use async_trait::async_trait;
    use genflow_domain::{GenerationRequest, GenerationResult};
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedClient {
        responses: Mutex<VecDeque<Result<GenerationResult, ProviderError>>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<GenerationResult, ProviderError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedClient {
        async fn complete(&self, _request: &GenerationRequest) -> Result<GenerationResult, ProviderError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ProviderError::Unavailable("no response".into())))
        }
    }

    /// Hangs on prompts mentioning "Storage", refuses prompts mentioning "Policy"
    struct FakeImages;

    #[async_trait]
    impl ImageSynthesizer for FakeImages {
        async fn synthesize(&self, prompt: &str) -> Result<Option<ImageAsset>, MediaError> {
            if prompt.contains("Storage") {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if prompt.contains("Policy") {
                return Ok(None);
            }
            Ok(Some(ImageAsset::new(vec![0x89, b'P', b'N', b'G'], "image/png")))
        }
    }

    fn outline(titles: &[&str]) -> Value {
        json!({
            "title": "Renewable Energy",
            "slides": titles.iter().map(|t| json!({
                "title": t,
                "points": ["one", "two", "three"],
                "imagePrompt": format!("An illustration of {t}"),
            })).collect::<Vec<_>>(),
        })
    }

    fn use_case(client: ScriptedClient) -> RunPresentationUseCase {
        let config = OrchestrationConfig::default()
            .with_branch_timeout(Duration::from_millis(100))
            .with_retry(crate::config::RetryPolicy::none());
        let generate = GenerateUseCase::new(Arc::new(client), Arc::new(ToolRegistry::new()))
            .with_config(config);
        RunPresentationUseCase::new(Arc::new(generate), Arc::new(FakeImages))
    }

    #[tokio::test]
    async fn test_renewable_energy_with_timed_out_slide() {
        let client = ScriptedClient::new(vec![Ok(GenerationResult::final_value(outline(&[
            "Solar",
            "Wind",
            "Hydro",
            "Storage",
        ])))]);

        let result = use_case(client)
            .execute(&PresentationInput::new("Renewable Energy"))
            .await
            .unwrap();

        assert_eq!(result.plan.title, "Renewable Energy");
        assert_eq!(result.items.len(), 4);
        assert_eq!(result.absent_indices(), vec![3]);
        for (i, title) in ["Solar", "Wind", "Hydro"].iter().enumerate() {
            assert_eq!(result.items[i].item.title, *title);
            assert!(!result.items[i].auxiliary.is_absent());
        }
    }

    #[tokio::test]
    async fn test_missing_image_becomes_slide_without_url() {
        let client = ScriptedClient::new(vec![Ok(GenerationResult::final_value(outline(&[
            "Intro", "Policy", "Outlook",
        ])))]);

        let presentation = use_case(client)
            .generate_presentation(
                &PresentationInput::new("Renewable Energy"),
                &NoProgress,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(presentation.slides.len(), 3);
        assert!(presentation.slides[0].image_url.as_deref().is_some_and(|u| u.starts_with("data:image/png;base64,")));
        assert_eq!(presentation.slides[1].image_url, None);
        assert!(presentation.slides[2].image_url.is_some());
    }

    #[tokio::test]
    async fn test_invalid_outline_fails_pipeline() {
        let client = ScriptedClient::new(vec![Ok(GenerationResult::final_value(
            json!({"title": "Renewable Energy"}),
        ))]);

        let err = use_case(client)
            .execute(&PresentationInput::new("Renewable Energy"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Plan(OrchestrationError::SchemaValidation(_))
        ));
    }
}
