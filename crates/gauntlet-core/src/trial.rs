//! Single-trial runner: one bounded multi-turn tool-use conversation.
//!
//! The loop is a small state machine. Each model round-trip consumes an
//! iteration; each tool invocation consumes an attempt. A turn with no tool
//! call costs an iteration but not an attempt (the model gets nudged). Only
//! the first tool call of a turn is honored.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::catalog::EvalCase;
use crate::errors::{ToolError, TrialError};
use crate::model::{Message, MessageParams, ToolDef};
use crate::providers::llm::LlmClient;
use crate::tool::ToolTransport;

/// Fixed system instruction for every trial.
pub const SYSTEM_PROMPT: &str = "You have access to tools. Use them to solve the task. \
     Do not explain your work - just call the appropriate tool.";

const NUDGE_USE_TOOL: &str = "Please use the provided tool to execute your solution \
     rather than responding with text. Call the tool now.";

const NUDGE_WRONG_OUTPUT: &str = "The output did not match the expected result. \
     Please try again with a corrected program.";

/// Per-trial bounds.
#[derive(Debug, Clone, Copy)]
pub struct TrialConfig {
    /// Tool invocations allowed per trial.
    pub max_attempts: u32,
    /// Model round-trips allowed per trial, nudge turns included.
    pub max_iters: u32,
    pub max_tokens: u32,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self { max_attempts: 3, max_iters: 6, max_tokens: 4096 }
    }
}

/// Outcome of one trial. Owned by the trial's execution unit until it is
/// folded into the shared results exactly once at completion.
#[derive(Debug, Clone, Default)]
pub struct EvalResult {
    pub passed: bool,
    pub attempts: u32,
    pub score: f64,
    /// Raw tool output from every attempt, chronological, errors included.
    pub outputs: Vec<String>,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub duration: Duration,
    pub llm_time: Duration,
    pub tool_time: Duration,
}

/// First-attempt success scores 1.0, halving per extra attempt.
pub(crate) fn score_for(attempts: u32) -> f64 {
    0.5f64.powi(attempts as i32 - 1)
}

/// Drives one trial to a terminal state. Transport/parse failures from the
/// provider propagate out (retry already happened in the transport layer);
/// tool failures are consumed as attempts and fed back to the model.
pub async fn run_trial(
    client: &dyn LlmClient,
    tools: &[ToolDef],
    transport: &dyn ToolTransport,
    case: &EvalCase,
    cfg: TrialConfig,
    cancel: &CancellationToken,
) -> Result<EvalResult, TrialError> {
    let started = Instant::now();
    let mut messages = vec![Message::user(&case.prompt)];
    let mut result = EvalResult::default();

    for iter in 0..cfg.max_iters {
        if result.attempts >= cfg.max_attempts {
            break;
        }

        let params = MessageParams {
            system: SYSTEM_PROMPT,
            messages: &messages,
            tools,
            max_tokens: cfg.max_tokens,
        };

        let llm_started = Instant::now();
        let resp = client.send_message(&params, cancel).await?;
        result.llm_time += llm_started.elapsed();
        result.tokens_in += resp.usage.input_tokens;
        result.tokens_out += resp.usage.output_tokens;

        messages.push(Message::assistant_turn(&resp));

        // No tool call: nudge and spend the iteration.
        if resp.tool_calls.is_empty() {
            debug!(case = %case.name, iter, "model answered without a tool call");
            messages.push(Message::user(NUDGE_USE_TOOL));
            continue;
        }
        let call = &resp.tool_calls[0];

        let tool_started = Instant::now();
        let reply = transport.call_tool(&call.name, &call.input, cancel).await;
        result.tool_time += tool_started.elapsed();
        result.attempts += 1;

        let reply = match reply {
            Err(ToolError::Cancelled) => return Err(TrialError::Cancelled),
            Err(err) => {
                let text = err.to_string();
                result.outputs.push(format!("ERROR: {text}"));
                messages.push(Message::tool_result(&call.id, text, true));
                continue;
            }
            Ok(reply) => reply,
        };

        if reply.is_error {
            result.outputs.push(format!("ERROR: {}", reply.output));
            messages.push(Message::tool_result(&call.id, reply.output, true));
            continue;
        }

        result.outputs.push(reply.output.clone());

        if case.judge.passes(&reply.output) {
            result.passed = true;
            result.score = score_for(result.attempts);
            result.duration = started.elapsed();
            return Ok(result);
        }

        // Judge failed: report the result and redirect in one composite turn.
        if result.attempts < cfg.max_attempts {
            messages.push(Message::tool_result_with_nudge(
                &call.id,
                reply.output,
                NUDGE_WRONG_OUTPUT,
            ));
        }
    }

    result.passed = false;
    result.score = 0.0;
    result.duration = started.elapsed();
    Ok(result)
}
