//! LLM integration crate for localaid.
//!
//! This crate provides a provider-agnostic abstraction for text completion
//! and the answer generator built on top of it.
//!
//! # Providers
//! - **Gemini**: Google generative-language API (default)
//!
//! # Example
//! ```no_run
//! use localaid_llm::{client_factory, ClientSettings, Generator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ClientSettings {
//!     api_key: Some("...".to_string()),
//!     ..Default::default()
//! };
//! if let Some(generator) = Generator::init(client_factory(settings), "gemini-2.0-flash") {
//!     println!("{}", generator.generate("Hello").await?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod generator;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::{client_factory, create_client, ClientFactory};
pub use generator::{Generator, ModelBinding};
pub use providers::GeminiClient;
pub use types::{ClientSettings, ProviderType};
