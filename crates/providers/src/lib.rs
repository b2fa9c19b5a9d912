//! LLM provider implementations for Drafter.
//!
//! All providers implement the `drafter_core::Provider` trait. The
//! session calls the boundary without knowing which backend is behind it.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use drafter_config::AppConfig;
use drafter_core::error::ProviderError;
use drafter_core::Provider;
use std::sync::Arc;

/// Build the provider described by the configuration.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| ProviderError::NotConfigured("no API key configured".into()))?;

    let provider = OpenAiCompatProvider::new("gemini", &config.base_url, api_key)?;
    Ok(Arc::new(provider))
}
