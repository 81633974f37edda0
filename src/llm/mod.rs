//! Model collaborator: an Ollama-compatible chat endpoint.
//!
//! The same vision-capable model answers both image prompts and the
//! OCR-derived text prompt; only the request body differs.

mod client;
mod config;
pub mod prompts;

pub use client::{ChatModel, ChatRequest, LlmError, OllamaClient};
pub use config::LlmConfig;
