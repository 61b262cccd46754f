//! Google Gemini integration (vision-capable text generation)
//!
//! One `generateContent` call per run: a text prompt plus the photo inline.
//!
//! API docs: https://ai.google.dev/api/generate-content

pub mod dto;
mod adapter;
mod client;

pub use adapter::response_text;
pub use client::GeminiClient;
