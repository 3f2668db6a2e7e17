//! Google Gemini provider
//!
//! Speaks the `generativelanguage.googleapis.com` v1beta REST API. Tool
//! calls use native function calling; structured output uses JSON mode
//! when no tools are offered.

mod client;
mod mapping;
mod protocol;
mod sse;

pub use client::{GEMINI_BASE_URL, GeminiClient};
