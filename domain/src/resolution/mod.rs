//! Tool resolution state
//!
//! ```text
//!              ToolCall (valid, rounds left)
//!   ┌──────────────────┐ ─────────────────▶ ┌───────────────┐
//!   │ AwaitingProvider │                    │ ExecutingTool │
//!   └──────────────────┘ ◀───────────────── └───────────────┘
//!        │       │          record_round()          │
//!  Final │       │ unknown tool / invalid input     │ handler error
//!        ▼       ▼  / round limit                   ▼
//!   Completed   Failed ◀─────────────────────────────┘
//! ```

pub mod state;

pub use state::{DEFAULT_MAX_TOOL_ROUNDS, ResolutionPhase, ResolutionState, RoundLimitReached};
