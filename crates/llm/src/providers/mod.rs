//! Concrete LLM providers.

pub mod gemini;

pub use gemini::GeminiClient;
