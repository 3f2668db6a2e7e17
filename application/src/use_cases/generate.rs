//! Generate use case (tool resolution loop)
//!
//! Drives a [`GenerationRequest`] through the provider until a validated
//! final value is produced, executing requested tools along the way.
//!
//! ```text
//! request ─▶ complete ─┬─ Final ──────▶ validate(shape) ─▶ value
//!              ▲       ├─ ToolCall ───▶ offered? registered? input valid?
//!              │       │                rounds left? ─▶ run handler
//!              └───────┼──────────────── augmented request ◀─┘
//!                      └─ Error ──────▶ ProviderRejected
//! ```
//!
//! Rounds are strictly sequential; each depends on the transcript so far.

use crate::config::OrchestrationConfig;
use crate::error::OrchestrationError;
use crate::ports::generation_client::GenerationClient;
use crate::ports::generation_logger::{GenerationEvent, GenerationLogger, NoGenerationLogger};
use crate::tools::ToolRegistry;
use crate::use_cases::shared::{complete_with_retry, run_tool_round};
use genflow_domain::{
    Flow, GenerationRequest, GenerationResult, OutputShape, ResolutionState, TranscriptEntry,
    validate, validate_as,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Final value of a resolution loop plus how it got there
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Validated against the request's output shape
    pub value: Value,
    /// Number of tool rounds executed
    pub round_count: usize,
    pub transcript: Vec<TranscriptEntry>,
}

/// Use case for schema-validated, tool-augmented generation
pub struct GenerateUseCase {
    client: Arc<dyn GenerationClient>,
    registry: Arc<ToolRegistry>,
    config: OrchestrationConfig,
    logger: Arc<dyn GenerationLogger>,
}

impl GenerateUseCase {
    pub fn new(client: Arc<dyn GenerationClient>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            client,
            registry,
            config: OrchestrationConfig::default(),
            logger: Arc::new(NoGenerationLogger),
        }
    }

    pub fn with_config(mut self, config: OrchestrationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn GenerationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &OrchestrationConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Build a request offering the named registered tools
    pub fn build_request(
        &self,
        prompt: impl Into<String>,
        shape: Option<OutputShape>,
        tools: Option<&[&str]>,
    ) -> Result<GenerationRequest, OrchestrationError> {
        let mut request = GenerationRequest::new(prompt);
        if let Some(shape) = shape {
            request = request.with_output_shape(shape);
        }
        if let Some(names) = tools {
            request = request.with_tools(self.registry.subset(names)?);
        }
        Ok(request)
    }

    /// Generate a value conforming to `shape` (a JSON string when `None`)
    pub async fn generate(
        &self,
        prompt: impl Into<String>,
        shape: Option<OutputShape>,
        tools: Option<&[&str]>,
    ) -> Result<Value, OrchestrationError> {
        let request = self.build_request(prompt, shape, tools)?;
        Ok(self.resolve(request).await?.value)
    }

    /// Generate and deserialize into `T` after shape validation
    pub async fn generate_typed<T: DeserializeOwned>(
        &self,
        prompt: impl Into<String>,
        shape: OutputShape,
        tools: Option<&[&str]>,
    ) -> Result<T, OrchestrationError> {
        let value = self.generate(prompt, Some(shape.clone()), tools).await?;
        Ok(validate_as(&value, &shape)?)
    }

    /// Run a catalogued flow
    pub async fn run_flow<F: Flow>(&self, input: &F::Input) -> Result<F::Output, OrchestrationError> {
        info!(flow = F::NAME, "Running flow");
        let shape = F::output_shape();
        let tools = F::tool_names();
        let mut request = self.build_request(
            F::render_prompt(input),
            Some(shape.clone()),
            (!tools.is_empty()).then_some(tools),
        )?;
        if let Some(model) = F::model() {
            request = request.with_model(model);
        }
        let resolution = self.resolve(request).await?;
        Ok(validate_as(&resolution.value, &shape)?)
    }

    /// Drive the resolution loop for a prepared request
    pub async fn resolve(&self, request: GenerationRequest) -> Result<Resolution, OrchestrationError> {
        let mut state = ResolutionState::new(self.config.max_tool_rounds);
        let mut current = request;

        self.logger.log(GenerationEvent::new(
            "generation_request",
            json!({
                "prompt": current.prompt,
                "structured": current.is_structured(),
                "tools": current.tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
                "model": current.model,
            }),
        ));

        loop {
            debug!(round = state.round_count(), "Awaiting provider");
            let result = complete_with_retry(
                self.client.as_ref(),
                &current,
                self.config.provider_timeout,
                &self.config.retry,
            )
            .await
            .map_err(|e| {
                state.fail();
                self.log_failure(&state, &e.to_string());
                OrchestrationError::from(e)
            })?;

            match result {
                GenerationResult::Final { value } => {
                    let value = match &current.output_shape {
                        Some(shape) => validate(&value, shape).map_err(|e| {
                            warn!(error = %e, "Final value failed schema validation");
                            state.fail();
                            self.log_failure(&state, &e.to_string());
                            OrchestrationError::SchemaValidation(e)
                        })?,
                        None => value,
                    };
                    state.complete();
                    info!(rounds = state.round_count(), "Generation complete");
                    self.logger.log(GenerationEvent::new(
                        "generation_final",
                        json!({ "rounds": state.round_count(), "value": value }),
                    ));
                    return Ok(Resolution {
                        value,
                        round_count: state.round_count(),
                        transcript: state.into_transcript(),
                    });
                }
                GenerationResult::ToolCall { call } => {
                    current = run_tool_round(
                        &self.registry,
                        &mut state,
                        &current,
                        &call,
                        self.config.tool_timeout,
                        self.logger.as_ref(),
                    )
                    .await
                    .inspect_err(|e| self.log_failure(&state, &e.to_string()))?;
                }
                GenerationResult::Error { reason } => {
                    state.fail();
                    self.log_failure(&state, &reason);
                    return Err(OrchestrationError::ProviderRejected(reason));
                }
            }
        }
    }

    fn log_failure(&self, state: &ResolutionState, error: &str) {
        self.logger.log(GenerationEvent::new(
            "generation_error",
            json!({ "rounds": state.round_count(), "error": error }),
        ));
    }
}
