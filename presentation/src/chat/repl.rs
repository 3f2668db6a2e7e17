//! REPL (Read-Eval-Print Loop) for streaming chat

use super::stream_printer::print_stream;
use colored::Colorize;
use genflow_application::{OrchestrationError, StreamUseCase};
use genflow_domain::Flow;
use genflow_domain::flows::campus::{CampusInfoFlow, CampusInfoInput};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Chat history file under the user's data directory
fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("genflow").join("history.txt"))
}

/// Interactive chat REPL over the streaming campus assistant
pub struct ChatRepl {
    stream: Arc<StreamUseCase>,
}

impl ChatRepl {
    pub fn new(stream: Arc<StreamUseCase>) -> Self {
        Self { stream }
    }

    /// Stream one answer to `out`
    pub async fn ask<W: Write>(
        &self,
        question: &str,
        out: &mut W,
        cancel: &CancellationToken,
    ) -> Result<String, OrchestrationError> {
        let prompt = CampusInfoFlow::stream_prompt(&CampusInfoInput::new(question));
        let mut handle = self
            .stream
            .generate_stream(prompt, Some(CampusInfoFlow::tool_names()))?;
        print_stream(&mut handle, out, cancel).await
    }

    /// Run the interactive REPL until EOF, `/quit` or cancellation
    pub async fn run(&self, cancel: &CancellationToken) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            // readline blocks the thread, so the editor moves into a blocking task and back
            let read = tokio::task::spawn_blocking(move || {
                let line = rl.readline(">>> ");
                (rl, line)
            });
            let (editor, readline) = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                joined = read => match joined {
                    Ok(pair) => pair,
                    Err(e) => {
                        eprintln!("{} {}", "Error:".red().bold(), e);
                        return Ok(());
                    }
                },
            };
            rl = editor;

            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    let mut stdout = std::io::stdout();
                    if let Err(e) = self.ask(line, &mut stdout, cancel).await {
                        eprintln!("{} {}", "Error:".red().bold(), e);
                    }
                    println!();
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "genflow - Campus Assistant".cyan().bold());
        println!("Ask about events and locations. Type /help for commands.");
        println!();
    }

    /// Returns true when the REPL should exit
    fn handle_command(&self, cmd: &str) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" => {
                println!("Commands:");
                println!("  /help   Show this help");
                println!("  /quit   Exit chat");
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                false
            }
        }
    }
}
