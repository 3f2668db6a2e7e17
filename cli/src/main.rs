//! CLI entrypoint for genflow
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use genflow_application::{
    GenerateUseCase, GenerationClient, GenerationLogger, ImageSynthesizer, MediaUseCase,
    NoProgress, OrchestrationConfig, ProgressNotifier, RunPresentationUseCase, SpeechToText,
    StreamUseCase, TextToSpeech,
};
use genflow_domain::flows::{
    CampusInfoFlow, CampusInfoInput, DashboardInsightsFlow, DashboardInsightsInput,
    PresentationInput, ResumeAnalysisFlow, ResumeAnalysisInput, StudyRecommendationsFlow,
    StudyRecommendationsInput,
};
use genflow_domain::AudioClip;
use genflow_infrastructure::config::FALLBACK_API_KEY_ENV;
use genflow_infrastructure::{
    ConfigLoader, FileConfig, GeminiClient, JsonlGenerationLogger, ScriptedProvider,
    campus_registry,
};
use genflow_presentation::{
    ChatRepl, Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter,
};
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Provider adapters behind every port the commands use
struct Providers {
    generation: Arc<dyn GenerationClient>,
    images: Arc<dyn ImageSynthesizer>,
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn TextToSpeech>,
}

impl Providers {
    fn from_adapter<P>(adapter: P) -> Self
    where
        P: GenerationClient + ImageSynthesizer + SpeechToText + TextToSpeech + 'static,
    {
        let adapter = Arc::new(adapter);
        Self {
            generation: adapter.clone(),
            images: adapter.clone(),
            stt: adapter.clone(),
            tts: adapter,
        }
    }

    fn build(offline: bool, config: &FileConfig) -> Result<Self> {
        if offline {
            info!("Using offline scripted provider");
            return Ok(Self::from_adapter(ScriptedProvider::new()));
        }

        let provider = &config.provider;
        let api_key = provider.api_key().ok_or_else(|| {
            anyhow!(
                "No API key found. Set {} (or {}), or run with --offline.",
                provider.api_key_env,
                FALLBACK_API_KEY_ENV
            )
        })?;

        let client = GeminiClient::new(api_key)
            .with_base_url(&provider.base_url)
            .with_text_model(provider.text_model())
            .with_image_model(provider.image_model())
            .with_tts_model(provider.tts_model())
            .with_voice(&provider.voice);
        info!(text_model = %provider.text_model(), "Using Gemini provider");
        Ok(Self::from_adapter(client))
    }
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Initialize logging based on verbosity level
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow!("--log-file must name a file: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate()?;
    Ok(config)
}

/// Run `future` unless Ctrl-C arrives first
async fn interruptible<T>(
    cancel: &CancellationToken,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        _ = cancel.cancelled() => bail!("Interrupted"),
        result = future => result,
    }
}

fn print_output<T: serde::Serialize>(format: OutputFormat, value: &T, text: impl FnOnce(&T) -> String) {
    match format {
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(value)),
        OutputFormat::Text => print!("{}", text(value)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    info!("Starting genflow");

    let file_config = load_config(&cli)?;
    let config: OrchestrationConfig = file_config.to_orchestration_config();

    // === Dependency Injection ===
    let providers = Providers::build(cli.offline, &file_config)?;
    let registry = Arc::new(campus_registry());
    let logger: Option<Arc<dyn GenerationLogger>> = file_config
        .logging
        .generation_log
        .as_ref()
        .and_then(|path| JsonlGenerationLogger::new(path))
        .map(|logger| Arc::new(logger) as Arc<dyn GenerationLogger>);

    let mut generate = GenerateUseCase::new(providers.generation.clone(), registry.clone())
        .with_config(config.clone());
    let mut stream = StreamUseCase::new(providers.generation.clone(), registry)
        .with_config(config.clone());
    if let Some(logger) = logger {
        generate = generate.with_logger(logger.clone());
        stream = stream.with_logger(logger);
    }
    let generate = Arc::new(generate);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    match cli.command.clone() {
        Command::Ask { question } => {
            let output = interruptible(&cancel, async {
                Ok(generate
                    .run_flow::<CampusInfoFlow>(&CampusInfoInput::new(question))
                    .await?)
            })
            .await?;
            print_output(cli.output, &output, ConsoleFormatter::format_answer);
        }

        Command::Chat { question } => {
            let repl = ChatRepl::new(Arc::new(stream));
            match question {
                Some(question) => {
                    let text = repl.ask(&question, &mut std::io::stdout(), &cancel).await?;
                    if cli.output == OutputFormat::Json {
                        println!("{}", ConsoleFormatter::format_json(&Value::String(text)));
                    }
                }
                None => repl.run(&cancel).await?,
            }
        }

        Command::Resume { resume, job } => {
            let input = ResumeAnalysisInput {
                resume_text: tokio::fs::read_to_string(&resume)
                    .await
                    .with_context(|| format!("Failed to read {}", resume.display()))?,
                job_description: tokio::fs::read_to_string(&job)
                    .await
                    .with_context(|| format!("Failed to read {}", job.display()))?,
            };
            let output = interruptible(&cancel, async {
                Ok(generate.run_flow::<ResumeAnalysisFlow>(&input).await?)
            })
            .await?;
            print_output(cli.output, &output, ConsoleFormatter::format_resume);
        }

        Command::Insights { history, goals } => {
            let input = DashboardInsightsInput {
                academic_history: history,
                student_goals: goals,
            };
            let output = interruptible(&cancel, async {
                Ok(generate.run_flow::<DashboardInsightsFlow>(&input).await?)
            })
            .await?;
            print_output(cli.output, &output, ConsoleFormatter::format_insights);
        }

        Command::Study {
            schedule,
            learning_style,
            courses,
            goals,
        } => {
            let input = StudyRecommendationsInput {
                schedule,
                learning_style,
                courses,
                academic_goals: goals,
            };
            let output = interruptible(&cancel, async {
                Ok(generate.run_flow::<StudyRecommendationsFlow>(&input).await?)
            })
            .await?;
            print_output(cli.output, &output, ConsoleFormatter::format_study);
        }

        Command::Present { topic } => {
            let use_case = RunPresentationUseCase::new(generate.clone(), providers.images.clone());
            let reporter = ProgressReporter::new();
            let progress: &dyn ProgressNotifier = if cli.quiet { &NoProgress } else { &reporter };

            let presentation = use_case
                .generate_presentation(&PresentationInput::new(topic), progress, &cancel)
                .await?;
            let missing = reporter.failures();
            if !missing.is_empty() {
                warn!(slides = ?missing, "Some slides have no image");
            }
            print_output(cli.output, &presentation, ConsoleFormatter::format_presentation);
        }

        Command::Speak { text, out } => {
            let media = MediaUseCase::new(providers.stt, providers.tts, config.media_timeout);
            let audio = interruptible(&cancel, async { Ok(media.speak(&text).await?) }).await?;
            tokio::fs::write(&out, &audio.bytes)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Wrote {} bytes of {} to {}", audio.bytes.len(), audio.mime_type, out.display());
        }

        Command::Transcribe { file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let ext = file.extension().and_then(|e| e.to_str()).unwrap_or_default();
            let clip = AudioClip::new(bytes, AudioClip::mime_for_extension(ext));

            let media = MediaUseCase::new(providers.stt, providers.tts, config.media_timeout);
            let transcript =
                interruptible(&cancel, async { Ok(media.transcribe(&clip).await?) }).await?;
            print_output(cli.output, &transcript, ConsoleFormatter::format_transcript);
        }
    }

    Ok(())
}
