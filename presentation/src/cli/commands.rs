//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for flow results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored output
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// CLI arguments for genflow
#[derive(Parser, Debug)]
#[command(name = "genflow")]
#[command(author, version, about = "Schema-validated LLM flows with tool calling")]
#[command(long_about = r#"
genflow runs structured generation flows against Google Gemini.

Every structured answer is checked against its declared shape before it is
shown. Campus questions may call the getCampusEvents and getCampusLocations
tools; presentations generate an outline and then one image per slide.

Configuration files are loaded from (in priority order):
1. GENFLOW_* environment variables
2. --config <path>     Explicit config file
3. ./genflow.toml      Project-level config
4. ~/.config/genflow/config.toml   Global config

Example:
  genflow ask "What events are happening today?"
  genflow chat "Where is the library?"
  genflow present "Renewable Energy" --output json
  genflow --offline study --courses "Calculus II" --goals "Pass finals"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Use the offline scripted provider instead of Gemini
    #[arg(long, global = true)]
    pub offline: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask the campus assistant a question (may call campus tools)
    Ask {
        /// The question
        question: String,
    },

    /// Stream an answer from the campus assistant; interactive when no question is given
    Chat {
        /// The question (omit for an interactive session)
        question: Option<String>,
    },

    /// Analyze a resume against a job description
    Resume {
        /// File containing the resume text
        #[arg(long, value_name = "PATH")]
        resume: PathBuf,

        /// File containing the job description
        #[arg(long, value_name = "PATH")]
        job: PathBuf,
    },

    /// Personalized insights and course recommendations
    Insights {
        /// Academic history (courses taken, grades)
        #[arg(long)]
        history: String,

        /// The student's goals
        #[arg(long)]
        goals: String,
    },

    /// Study time and resource recommendations
    Study {
        /// Weekly schedule
        #[arg(long, default_value = "")]
        schedule: String,

        /// Preferred learning style
        #[arg(long, default_value = "")]
        learning_style: String,

        /// Courses being taken
        #[arg(long)]
        courses: String,

        /// Academic goals
        #[arg(long)]
        goals: String,
    },

    /// Generate a slide deck with one image per slide
    Present {
        /// Presentation topic
        topic: String,
    },

    /// Synthesize speech into a WAV file
    Speak {
        /// Text to speak
        text: String,

        /// Destination file
        #[arg(long, value_name = "PATH", default_value = "speech.wav")]
        out: PathBuf,
    },

    /// Transcribe an audio file
    Transcribe {
        /// Audio file (wav, mp3, ogg, webm, ...)
        file: PathBuf,
    },
}
