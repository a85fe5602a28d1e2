//! Prompt system for localaid.
//!
//! This crate turns a question and its retrieved directory entries into the
//! text sent to the generative model:
//! - YAML-based prompt definitions (built-in default or operator file)
//! - Guardrail instructions carried with the definition
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, render_directory, NO_MATCHES};
pub use loader::{default_prompt, load_prompt_file, resolve_prompt};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptBehavior, PromptDefinition};
