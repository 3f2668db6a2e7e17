//! Application layer for genflow
//!
//! This crate contains use cases, port definitions, the tool registry and
//! orchestration configuration. It depends only on the domain layer.

pub mod config;
pub mod error;
pub mod ports;
pub mod tools;
pub mod use_cases;

// Re-export commonly used types
pub use config::{OrchestrationConfig, RetryPolicy};
pub use error::{OrchestrationError, PipelineError};
pub use ports::{
    generation_client::{GenerationClient, ProviderError, ProviderStream, ProviderStreamItem},
    generation_logger::{GenerationEvent, GenerationLogger, NoGenerationLogger},
    media::{ImageSynthesizer, MediaError, SpeechToText, TextToSpeech},
    progress::{NoProgress, PipelineStage, ProgressNotifier},
};
pub use tools::ToolRegistry;
pub use use_cases::generate::{GenerateUseCase, Resolution};
pub use use_cases::media::MediaUseCase;
pub use use_cases::pipeline::PipelineCoordinator;
pub use use_cases::presentation::{PresentationResult, RunPresentationUseCase};
pub use use_cases::stream::{StreamHandle, StreamUseCase};
