//! Block-style wire adapter (Anthropic Messages API shape).
//!
//! One wire message per internal message; its content is an ordered list of
//! typed blocks. A composite internal message (tool result + nudge text)
//! stays a single wire message with two blocks, `[tool_result, text]`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{build_http_client, retry, ClientOpts, LlmClient};
use crate::errors::{ProviderError, RetryPolicy};
use crate::model::{Message, MessageParams, MessageResponse, ToolCall, ToolDef, Usage};

pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl AnthropicClient {
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
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn send_message(
        &self,
        params: &MessageParams<'_>,
        cancel: &CancellationToken,
    ) -> Result<MessageResponse, ProviderError> {
        let body = build_request(&self.model, params);
        let req = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body);

        let resp = retry::execute(req, &self.retry, cancel).await?;
        let wire: WireResponse = resp.json().await.map_err(|e| ProviderError::InvalidResponse {
            message: format!("failed to decode response: {e}"),
        })?;
        parse_response(wire)
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

// --- wire types ---

/// Content union, encoded at the protocol boundary only.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(skip_serializing_if = "is_false")]
        is_error: bool,
    },
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Serialize)]
pub(crate) struct WireRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    system: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireToolDef>,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct WireMessage {
    role: &'static str,
    content: Vec<ContentBlock>,
}

/// Flat tool declaration: `{name, description, input_schema}`.
#[derive(Debug, Serialize)]
struct WireToolDef {
    name: String,
    description: String,
    input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    content: Vec<WireResponseBlock>,
    #[serde(default)]
    usage: WireUsage,
}

/// Loose response block: providers may return block types we do not model
/// (ignored rather than rejected).
#[derive(Debug, Deserialize)]
struct WireResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    input: Value,
}

#[derive(Debug, Default, Deserialize)]
struct WireUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

// --- conversion ---

fn build_request(model: &str, params: &MessageParams<'_>) -> WireRequest {
    WireRequest {
        model: model.to_string(),
        max_tokens: params.max_tokens,
        system: params.system.to_string(),
        messages: params.messages.iter().map(to_wire_message).collect(),
        tools: params
            .tools
            .iter()
            .map(|t: &ToolDef| WireToolDef {
                name: t.name.clone(),
                description: t.description.clone(),
                input_schema: t.input_schema.clone(),
            })
            .collect(),
    }
}

pub(crate) fn to_wire_message(m: &Message) -> WireMessage {
    let mut blocks = Vec::new();

    if let Some(tr) = &m.tool_result {
        blocks.push(ContentBlock::ToolResult {
            tool_use_id: tr.tool_call_id.clone(),
            content: tr.content.clone(),
            is_error: tr.is_error,
        });
    }

    if !m.text.is_empty() {
        blocks.push(ContentBlock::Text { text: m.text.clone() });
    }

    for tc in &m.tool_calls {
        blocks.push(ContentBlock::ToolUse {
            id: tc.id.clone(),
            name: tc.name.clone(),
            input: tc.input.clone(),
        });
    }

    WireMessage { role: m.role.as_str(), content: blocks }
}

fn parse_response(wire: WireResponse) -> Result<MessageResponse, ProviderError> {
    if wire.content.is_empty() {
        return Err(ProviderError::InvalidResponse {
            message: "response contained no content blocks".to_string(),
        });
    }

    let mut out = MessageResponse {
        usage: Usage {
            input_tokens: wire.usage.input_tokens,
            output_tokens: wire.usage.output_tokens,
        },
        ..Default::default()
    };

    for block in wire.content {
        match block.kind.as_str() {
            "text" => out.text.push_str(&block.text),
            "tool_use" => out.tool_calls.push(ToolCall {
                id: block.id,
                name: block.name,
                input: block.input,
            }),
            _ => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn composite_message_is_one_wire_message_with_two_blocks() {
        let m = Message::tool_result_with_nudge("t1", "42", "Try again.");
        let wire = to_wire_message(&m);
        assert_eq!(wire.role, "user");
        assert_eq!(wire.content.len(), 2);
        assert_eq!(
            wire.content[0],
            ContentBlock::ToolResult {
                tool_use_id: "t1".into(),
                content: "42".into(),
                is_error: false,
            }
        );
        assert_eq!(wire.content[1], ContentBlock::Text { text: "Try again.".into() });
    }

    #[test]
    fn error_results_set_is_error_and_omit_it_otherwise() {
        let err = to_wire_message(&Message::tool_result("t1", "boom", true));
        let encoded = serde_json::to_value(&err.content[0]).unwrap();
        assert_eq!(encoded["is_error"], json!(true));

        let ok = to_wire_message(&Message::tool_result("t1", "fine", false));
        let encoded = serde_json::to_value(&ok.content[0]).unwrap();
        assert!(encoded.get("is_error").is_none());
    }

    #[test]
    fn response_text_blocks_are_concatenated_in_order() {
        let wire = WireResponse {
            content: vec![
                WireResponseBlock {
                    kind: "text".into(),
                    text: "Hello ".into(),
                    id: String::new(),
                    name: String::new(),
                    input: Value::Null,
                },
                WireResponseBlock {
                    kind: "text".into(),
                    text: "world".into(),
                    id: String::new(),
                    name: String::new(),
                    input: Value::Null,
                },
                WireResponseBlock {
                    kind: "tool_use".into(),
                    text: String::new(),
                    id: "toolu_1".into(),
                    name: "execute-program".into(),
                    input: json!({"program": "print(1)"}),
                },
            ],
            usage: WireUsage { input_tokens: 7, output_tokens: 3 },
        };
        let resp = parse_response(wire).unwrap();
        assert_eq!(resp.text, "Hello world");
        assert_eq!(resp.tool_calls.len(), 1);
        assert_eq!(resp.tool_calls[0].id, "toolu_1");
        assert_eq!(resp.usage.input_tokens, 7);
    }

    #[test]
    fn empty_content_is_a_parse_error() {
        let wire = WireResponse { content: Vec::new(), usage: WireUsage::default() };
        assert!(matches!(
            parse_response(wire),
            Err(ProviderError::InvalidResponse { .. })
        ));
    }
}
