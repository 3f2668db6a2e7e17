//! Tool resolution state machine

use crate::tool::{ToolCall, TranscriptEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Default bound on tool rounds per request
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

/// Phase of a single resolution loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPhase {
    /// Waiting for the provider's next result
    AwaitingProvider,
    /// Running a tool handler
    ExecutingTool,
    /// Finished with a validated final value
    Completed,
    /// Finished with an error
    Failed,
}

impl ResolutionPhase {
    pub fn as_str(&self) -> &str {
        match self {
            ResolutionPhase::AwaitingProvider => "awaiting_provider",
            ResolutionPhase::ExecutingTool => "executing_tool",
            ResolutionPhase::Completed => "completed",
            ResolutionPhase::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ResolutionPhase::Completed | ResolutionPhase::Failed)
    }
}

impl std::fmt::Display for ResolutionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when another tool round would exceed the configured bound
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("tool round limit of {max_rounds} reached")]
pub struct RoundLimitReached {
    pub max_rounds: usize,
}

/// Per-request resolution state.
///
/// Owned by exactly one resolution loop and discarded when it finishes.
/// `round_count` only grows and never exceeds `max_rounds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionState {
    round_count: usize,
    max_rounds: usize,
    transcript: Vec<TranscriptEntry>,
    phase: ResolutionPhase,
}

impl ResolutionState {
    pub fn new(max_rounds: usize) -> Self {
        Self {
            round_count: 0,
            max_rounds,
            transcript: Vec::new(),
            phase: ResolutionPhase::AwaitingProvider,
        }
    }

    pub fn round_count(&self) -> usize {
        self.round_count
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn phase(&self) -> ResolutionPhase {
        self.phase
    }

    pub fn rounds_remaining(&self) -> usize {
        self.max_rounds.saturating_sub(self.round_count)
    }

    /// Enter `ExecutingTool` if another round is allowed.
    ///
    /// On refusal the state moves to `Failed`; the handler must not run.
    pub fn begin_tool(&mut self) -> Result<(), RoundLimitReached> {
        if self.round_count >= self.max_rounds {
            self.phase = ResolutionPhase::Failed;
            return Err(RoundLimitReached {
                max_rounds: self.max_rounds,
            });
        }
        self.phase = ResolutionPhase::ExecutingTool;
        Ok(())
    }

    /// Record a completed tool round and go back to awaiting the provider
    pub fn record_round(&mut self, call: &ToolCall, output: Value) {
        self.transcript.push(TranscriptEntry::new(call, output));
        self.round_count += 1;
        self.phase = ResolutionPhase::AwaitingProvider;
    }

    pub fn complete(&mut self) {
        self.phase = ResolutionPhase::Completed;
    }

    pub fn fail(&mut self) {
        self.phase = ResolutionPhase::Failed;
    }

    /// Take ownership of the transcript once the loop is finished
    pub fn into_transcript(self) -> Vec<TranscriptEntry> {
        self.transcript
    }
}

impl Default for ResolutionState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOOL_ROUNDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initial_state() {
        let state = ResolutionState::default();
        assert_eq!(state.round_count(), 0);
        assert_eq!(state.max_rounds(), DEFAULT_MAX_TOOL_ROUNDS);
        assert_eq!(state.phase(), ResolutionPhase::AwaitingProvider);
        assert!(state.transcript().is_empty());
    }

    #[test]
    fn test_round_progression() {
        let mut state = ResolutionState::new(2);
        let call = ToolCall::new("getCampusEvents");

        state.begin_tool().unwrap();
        assert_eq!(state.phase(), ResolutionPhase::ExecutingTool);
        state.record_round(&call, json!([]));
        assert_eq!(state.round_count(), 1);
        assert_eq!(state.phase(), ResolutionPhase::AwaitingProvider);
        assert_eq!(state.rounds_remaining(), 1);

        state.begin_tool().unwrap();
        state.record_round(&call, json!([]));
        assert_eq!(state.round_count(), 2);

        let err = state.begin_tool().unwrap_err();
        assert_eq!(err.max_rounds, 2);
        assert_eq!(state.phase(), ResolutionPhase::Failed);
        assert_eq!(state.round_count(), 2);
        assert_eq!(state.transcript().len(), 2);
    }

    #[test]
    fn test_zero_rounds_refuses_immediately() {
        let mut state = ResolutionState::new(0);
        assert!(state.begin_tool().is_err());
    }

    #[test]
    fn test_terminal_phases() {
        let mut state = ResolutionState::new(1);
        state.complete();
        assert!(state.phase().is_terminal());
        assert_eq!(state.phase().to_string(), "completed");
        assert!(!ResolutionPhase::ExecutingTool.is_terminal());
    }
}
