//! Error taxonomy for the harness.
//!
//! Configuration errors fail fast at startup; provider errors surface out of
//! the transport after any rate-limit retries; tool errors are fed back into
//! the conversation as failed attempts rather than ending the trial.

use std::time::Duration;

/// Startup configuration errors. All of these terminate the process before
/// any trial runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("bad filter pattern {pattern:?}: {message}")]
    BadPattern { pattern: String, message: String },

    #[error("bad tier {spec:?}: tiers must be >= 1")]
    TierOutOfRange { spec: String },

    #[error("bad tier range {spec:?}: min > max")]
    TierInverted { spec: String },

    #[error("bad tier {spec:?}: expected N or N-M where N,M >= 1")]
    TierUnparsable { spec: String },

    #[error("model {input:?} must have a provider prefix (providers: anthropic, openai, fireworks, ollama)")]
    MissingProviderPrefix { input: String },

    #[error("unknown provider {name:?} (supported: anthropic, openai, fireworks, ollama)")]
    UnknownProvider { name: String },

    #[error("no eval cases matched the given filter/tier")]
    EmptySelection,
}

/// Errors from one provider call: transport, rate limiting, or parsing.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Rate limited and retries exhausted; carries the final 429.
    #[error("rate limited (status {status}) after {attempts} attempts: {body}")]
    RateLimited { status: u16, attempts: u32, body: String },

    /// Non-2xx, non-429 response. Never retried.
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Connection-level failure. Never retried.
    #[error("network error: {message}")]
    Network { message: String },

    /// The provider replied 2xx but the body had no usable content.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// The enclosing run was cancelled while this call was pending.
    #[error("cancelled")]
    Cancelled,
}

impl ProviderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network { message: err.to_string() }
    }
}

/// Errors from the tool-invocation transport collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("tool server error (status {status}): {body}")]
    Server { status: u16, body: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network { message: err.to_string() }
    }
}

/// Hard failure of a single trial. Tool errors never appear here; they are
/// consumed as attempts inside the trial loop.
#[derive(Debug, thiserror::Error)]
pub enum TrialError {
    #[error("model call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("trial cancelled")]
    Cancelled,
}

impl TrialError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Provider(ProviderError::Cancelled))
    }
}

/// Retry policy knobs for the resilient transport.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// First backoff delay when no Retry-After header is present; doubles
    /// after every backoff-based retry.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { initial_backoff: Duration::from_secs(2) }
    }
}
