//! Provider-agnostic conversation model.
//!
//! Pure data shared by every wire-protocol adapter. Nothing here performs
//! I/O; each adapter translates these types to and from its own wire shapes
//! at the protocol boundary.

use serde_json::Value;

/// Sender of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single turn in the conversation.
///
/// A user message may carry a tool result and nudge text at the same time
/// (report a result and redirect the model in one turn). That composite form
/// is the only case the adapters fan out differently: block-style protocols
/// keep it as one wire message, role-message protocols split it in two.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    /// Tool invocations requested by the model (assistant messages only).
    pub tool_calls: Vec<ToolCall>,
    /// Outcome of an earlier tool call (user messages only).
    pub tool_result: Option<ToolResult>,
}

impl Message {
    /// Plain user text (the case prompt or a nudge).
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            tool_calls: Vec::new(),
            tool_result: None,
        }
    }

    /// The model's turn, appended to history verbatim.
    pub fn assistant_turn(resp: &MessageResponse) -> Self {
        Self {
            role: Role::Assistant,
            text: resp.text.clone(),
            tool_calls: resp.tool_calls.clone(),
            tool_result: None,
        }
    }

    /// A user message carrying one tool result.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>, is_error: bool) -> Self {
        Self {
            role: Role::User,
            text: String::new(),
            tool_calls: Vec::new(),
            tool_result: Some(ToolResult {
                tool_call_id: tool_call_id.into(),
                content: content.into(),
                is_error,
            }),
        }
    }

    /// Composite user message: a non-error tool result plus corrective text.
    pub fn tool_result_with_nudge(
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
        nudge: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::User,
            text: nudge.into(),
            tool_calls: Vec::new(),
            tool_result: Some(ToolResult {
                tool_call_id: tool_call_id.into(),
                content: content.into(),
                is_error: false,
            }),
        }
    }
}

/// The model requesting one tool invocation.
///
/// The id is assigned by the remote model (or synthesized by an adapter when
/// the provider omits it) and is immutable for the life of a trial; a later
/// [`ToolResult`] correlates back through it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Opaque structured payload, passed through to the tool untouched.
    pub input: Value,
}

/// Outcome of executing a tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub content: String,
    pub is_error: bool,
}

/// A tool exposed to the model. Not mutated during a trial.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// One request to a provider.
#[derive(Debug, Clone, Copy)]
pub struct MessageParams<'a> {
    pub system: &'a str,
    pub messages: &'a [Message],
    pub tools: &'a [ToolDef],
    pub max_tokens: u32,
}

/// The provider's reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageResponse {
    /// Text content; may be empty when the model only calls tools.
    pub text: String,
    /// Tool calls in the order the provider returned them.
    pub tool_calls: Vec<ToolCall>,
    pub usage: Usage,
}

/// Token consumption counters. Reporting only, never control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
