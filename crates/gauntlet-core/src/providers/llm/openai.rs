//! Role-message wire adapter (OpenAI Chat Completions shape), used by the
//! OpenAI endpoint and every compatible service.
//!
//! A tool result becomes its own wire message with role `tool`; nudge text
//! attached to the same internal message becomes a separate, subsequent
//! `user` message. A composite internal message therefore fans out to two
//! wire messages, `[tool, user]`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{build_http_client, retry, ClientOpts, LlmClient};
use crate::errors::{ProviderError, RetryPolicy};
use crate::model::{Message, MessageParams, MessageResponse, ToolCall, Usage};

pub struct OpenAiClient {
    model: String,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        opts: ClientOpts,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            retry: opts.retry,
            client: build_http_client(opts.request_timeout)?,
        })
    }

    pub(crate) async fn send(
        &self,
        params: &MessageParams<'_>,
        cancel: &CancellationToken,
    ) -> Result<MessageResponse, ProviderError> {
        let body = build_request(&self.model, params);
        let req = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body);

        let resp = retry::execute(req, &self.retry, cancel).await?;
        let wire: WireResponse = resp.json().await.map_err(|e| ProviderError::InvalidResponse {
            message: format!("failed to decode response: {e}"),
        })?;
        parse_response(wire)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn send_message(
        &self,
        params: &MessageParams<'_>,
        cancel: &CancellationToken,
    ) -> Result<MessageResponse, ProviderError> {
        self.send(params, cancel).await
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

/// Fireworks exposes an OpenAI-compatible API; this is the role-message
/// adapter with Fireworks defaults. A separate type so Fireworks-specific
/// behavior (auth, model aliases) has somewhere to live later.
pub struct FireworksClient {
    inner: OpenAiClient,
}

impl FireworksClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        opts: ClientOpts,
    ) -> Result<Self, ProviderError> {
        Ok(Self { inner: OpenAiClient::new(api_key, model, base_url, opts)? })
    }
}

#[async_trait]
impl LlmClient for FireworksClient {
    async fn send_message(
        &self,
        params: &MessageParams<'_>,
        cancel: &CancellationToken,
    ) -> Result<MessageResponse, ProviderError> {
        self.inner.send(params, cancel).await
    }

    fn provider_name(&self) -> &'static str {
        "fireworks"
    }
}

// --- wire types ---

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireToolDef>,
    max_completion_tokens: u32,
    parallel_tool_calls: bool,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub(crate) struct WireMessage {
    pub(crate) role: String,
    #[serde(default)]
    pub(crate) content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) tool_calls: Vec<WireToolCall>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub(crate) tool_call_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct WireToolCall {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct WireFunctionCall {
    pub(crate) name: String,
    /// JSON-encoded argument object, per the protocol.
    pub(crate) arguments: String,
}

/// Nested tool declaration: `{type: "function", function: {...}}`.
#[derive(Debug, Serialize)]
struct WireToolDef {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionDef,
}

#[derive(Debug, Serialize)]
struct WireFunctionDef {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: WireUsage,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Default, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

// --- conversion ---

fn build_request(model: &str, params: &MessageParams<'_>) -> WireRequest {
    let mut messages = Vec::new();

    if !params.system.is_empty() {
        messages.push(WireMessage {
            role: "system".to_string(),
            content: params.system.to_string(),
            ..Default::default()
        });
    }

    for m in params.messages {
        messages.extend(to_wire_messages(m));
    }

    WireRequest {
        model: model.to_string(),
        messages,
        tools: params
            .tools
            .iter()
            .map(|t| WireToolDef {
                kind: "function",
                function: WireFunctionDef {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.input_schema.clone(),
                },
            })
            .collect(),
        max_completion_tokens: params.max_tokens,
        // One call per turn; the trial loop only honors the first anyway.
        parallel_tool_calls: false,
    }
}

/// Fans one internal message out to one or more wire messages.
pub(crate) fn to_wire_messages(m: &Message) -> Vec<WireMessage> {
    let mut out = Vec::new();

    if let Some(tr) = &m.tool_result {
        out.push(WireMessage {
            role: "tool".to_string(),
            content: tr.content.clone(),
            tool_call_id: tr.tool_call_id.clone(),
            ..Default::default()
        });
    }

    if !m.tool_calls.is_empty() {
        out.push(WireMessage {
            role: "assistant".to_string(),
            content: m.text.clone(),
            tool_calls: m
                .tool_calls
                .iter()
                .map(|tc| WireToolCall {
                    id: tc.id.clone(),
                    kind: "function".to_string(),
                    function: WireFunctionCall {
                        name: tc.name.clone(),
                        arguments: tc.input.to_string(),
                    },
                })
                .collect(),
            ..Default::default()
        });
    } else if !m.text.is_empty() && m.tool_result.is_none() {
        out.push(WireMessage {
            role: m.role.as_str().to_string(),
            content: m.text.clone(),
            ..Default::default()
        });
    }

    // Nudge text attached to a tool result becomes its own user message.
    if !m.text.is_empty() && m.tool_result.is_some() {
        out.push(WireMessage {
            role: "user".to_string(),
            content: m.text.clone(),
            ..Default::default()
        });
    }

    out
}

fn parse_response(wire: WireResponse) -> Result<MessageResponse, ProviderError> {
    let Some(choice) = wire.choices.into_iter().next() else {
        return Err(ProviderError::InvalidResponse {
            message: "no choices in response".to_string(),
        });
    };

    let msg = choice.message;
    Ok(MessageResponse {
        text: msg.content,
        tool_calls: msg
            .tool_calls
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                // Malformed argument JSON becomes null input; the tool call
                // then fails visibly instead of poisoning the request.
                input: serde_json::from_str(&tc.function.arguments).unwrap_or(Value::Null),
            })
            .collect(),
        usage: Usage {
            input_tokens: wire.usage.prompt_tokens,
            output_tokens: wire.usage.completion_tokens,
        },
    })
}
