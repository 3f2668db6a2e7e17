//! Provider adapters
//!
//! - [`gemini`]: Google Gemini over REST
//! - [`scripted`]: offline provider for demos and tests

pub mod gemini;
pub mod scripted;

pub use gemini::GeminiClient;
pub use scripted::ScriptedProvider;
