//! Provider clients: one capability, several incompatible wire protocols.
//!
//! Every adapter implements [`LlmClient`]; callers depend only on that.
//! Which adapter backs a run is decided once at startup from the
//! `provider:model` string.

pub mod anthropic;
pub mod ollama;
pub mod openai;
pub mod retry;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::{ConfigError, ProviderError, RetryPolicy};
use crate::model::{MessageParams, MessageResponse};

pub use anthropic::AnthropicClient;
pub use ollama::OllamaClient;
pub use openai::{FireworksClient, OpenAiClient};

/// Capability implemented by every wire-protocol adapter.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends one conversation state and returns the model's turn.
    /// Rate-limit retries happen below this call; any error coming out of it
    /// is terminal for the call.
    async fn send_message(
        &self,
        params: &MessageParams<'_>,
        cancel: &CancellationToken,
    ) -> Result<MessageResponse, ProviderError>;

    fn provider_name(&self) -> &'static str;
}

/// Splits a `provider:model` string. The provider prefix is required.
pub fn parse_model(s: &str) -> Result<(&str, &str), ConfigError> {
    s.split_once(':')
        .ok_or_else(|| ConfigError::MissingProviderPrefix { input: s.to_string() })
}

/// A known provider family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Anthropic,
    OpenAi,
    Fireworks,
    Ollama,
}

impl Provider {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            "fireworks" => Ok(Self::Fireworks),
            "ollama" => Ok(Self::Ollama),
            _ => Err(ConfigError::UnknownProvider { name: name.to_string() }),
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Anthropic => "http://169.254.169.254/gateway/llm/anthropic",
            Self::OpenAi => "http://169.254.169.254/gateway/llm/openai",
            Self::Fireworks => "https://api.fireworks.ai/inference",
            Self::Ollama => "http://localhost:11434",
        }
    }

    /// Environment variable holding this provider's API key, if it uses one.
    pub fn api_key_env(self) -> Option<&'static str> {
        match self {
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Fireworks => Some("FIREWORKS_API_KEY"),
            Self::Ollama => None,
        }
    }

    /// Builds the adapter for this provider. A missing API key is tolerated
    /// (gateway endpoints need no auth); a placeholder is sent instead.
    pub fn build_client(
        self,
        model: &str,
        base_url_override: Option<&str>,
        opts: ClientOpts,
    ) -> Result<Arc<dyn LlmClient>, ProviderError> {
        let base_url = base_url_override
            .unwrap_or_else(|| self.default_base_url())
            .to_string();
        let api_key = self
            .api_key_env()
            .map(api_key_from_env)
            .unwrap_or_default();

        Ok(match self {
            Self::Anthropic => Arc::new(AnthropicClient::new(api_key, model, base_url, opts)?),
            Self::OpenAi => Arc::new(OpenAiClient::new(api_key, model, base_url, opts)?),
            Self::Fireworks => Arc::new(FireworksClient::new(api_key, model, base_url, opts)?),
            Self::Ollama => Arc::new(OllamaClient::new(model, base_url, opts)?),
        })
    }
}

/// Optional knobs shared by all adapters.
#[derive(Debug, Clone, Copy)]
pub struct ClientOpts {
    /// Timeout for each individual HTTP request.
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientOpts {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            retry: RetryPolicy::default(),
        }
    }
}

fn api_key_from_env(var: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| "unspecified".to_string())
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Network {
            message: format!("failed to create HTTP client: {e}"),
        })
}
