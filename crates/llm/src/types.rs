//! LLM configuration types.

use localaid_core::config::DEFAULT_LLM_ENDPOINT;
use localaid_core::AppConfig;
use std::time::Duration;

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Gemini,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            _ => None,
        }
    }

    /// Get the canonical provider name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
        }
    }
}

/// Everything needed to build a client except the model name.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Provider identifier
    pub provider: String,

    /// API base URL
    pub endpoint: String,

    /// API credential
    pub api_key: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientSettings {
    /// Derive client settings from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            endpoint: config.llm_endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.llm_timeout_secs),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            provider: ProviderType::Gemini.as_str().to_string(),
            endpoint: DEFAULT_LLM_ENDPOINT.to_string(),
            api_key: None,
            timeout: Duration::from_secs(20),
        }
    }
}
