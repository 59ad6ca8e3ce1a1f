//! Local Ollama models. Ollama speaks the OpenAI-compatible protocol, so
//! this wraps the role-message adapter and patches up Ollama quirks.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{ClientOpts, LlmClient, OpenAiClient};
use crate::errors::ProviderError;
use crate::model::{MessageParams, MessageResponse, ToolCall};

pub struct OllamaClient {
    inner: OpenAiClient,
}

impl OllamaClient {
    /// Ollama requires no API key, but the auth header must be non-empty.
    /// Local models can be slow, especially on first load, so the request
    /// timeout is raised unless the caller already overrode it.
    pub fn new(
        model: impl Into<String>,
        base_url: impl Into<String>,
        mut opts: ClientOpts,
    ) -> Result<Self, ProviderError> {
        if opts.request_timeout == ClientOpts::default().request_timeout {
            opts.request_timeout = Duration::from_secs(300);
        }
        Ok(Self { inner: OpenAiClient::new("ollama", model, base_url, opts)? })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn send_message(
        &self,
        params: &MessageParams<'_>,
        cancel: &CancellationToken,
    ) -> Result<MessageResponse, ProviderError> {
        let mut resp = self.inner.send(params, cancel).await?;
        patch_tool_call_ids(&mut resp.tool_calls);
        Ok(resp)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}

/// Ollama may return empty tool call ids; synthesize deterministic ordinal
/// placeholders so tool-result correlation still works. Ids that are already
/// present are left untouched.
pub(crate) fn patch_tool_call_ids(calls: &mut [ToolCall]) {
    for (i, tc) in calls.iter_mut().enumerate() {
        if tc.id.is_empty() {
            tc.id = format!("ollama_call_{i}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(id: &str) -> ToolCall {
        ToolCall { id: id.into(), name: "execute-program".into(), input: json!({}) }
    }

    #[test]
    fn missing_ids_are_synthesized_by_ordinal() {
        let mut calls = vec![call(""), call("keep"), call("")];
        patch_tool_call_ids(&mut calls);
        assert_eq!(calls[0].id, "ollama_call_0");
        assert_eq!(calls[1].id, "keep");
        assert_eq!(calls[2].id, "ollama_call_2");
    }

    #[test]
    fn present_ids_are_never_disturbed() {
        let mut calls = vec![call("a"), call("b")];
        patch_tool_call_ids(&mut calls);
        assert_eq!(calls[0].id, "a");
        assert_eq!(calls[1].id, "b");
    }
}
