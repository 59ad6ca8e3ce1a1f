//! Tool-invocation transport: bridges the model's requested tool call to the
//! external execution service.
//!
//! The sandboxed executor itself is someone else's problem; the harness only
//! consumes it. The HTTP implementation speaks a small JSON protocol:
//! `GET {base}/tools` lists the tool declarations, `POST {base}/tools/call`
//! runs one invocation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::ToolError;
use crate::model::ToolDef;

/// Reply from the tool service for one invocation. `is_error` reports a
/// failure of the executed program (bad input, timeout, oversized output),
/// not of the transport.
#[derive(Debug, Clone)]
pub struct ToolReply {
    pub output: String,
    pub is_error: bool,
}

/// Capability consumed by the trial runner.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    async fn list_tools(&self, cancel: &CancellationToken) -> Result<Vec<ToolDef>, ToolError>;

    /// Invokes `name` with the model's opaque input, passed through untouched.
    async fn call_tool(
        &self,
        name: &str,
        input: &Value,
        cancel: &CancellationToken,
    ) -> Result<ToolReply, ToolError>;
}

/// HTTP client for a remote tool server.
#[derive(Debug, Clone)]
pub struct HttpToolServer {
    base_url: String,
    client: reqwest::Client,
}

impl HttpToolServer {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ToolError::Network {
                message: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn send(
        &self,
        req: reqwest::RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, ToolError> {
        let resp = tokio::select! {
            _ = cancel.cancelled() => return Err(ToolError::Cancelled),
            r = req.send() => r.map_err(ToolError::from)?,
        };
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ToolError::Server { status: status.as_u16(), body });
        }
        Ok(resp)
    }
}

#[derive(Debug, Serialize)]
struct WireCallRequest<'a> {
    name: &'a str,
    input: &'a Value,
}

#[derive(Debug, Deserialize)]
struct WireCallReply {
    #[serde(default)]
    output: String,
    #[serde(default)]
    is_error: bool,
}

#[derive(Debug, Deserialize)]
struct WireToolDef {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    input_schema: Value,
}

#[async_trait]
impl ToolTransport for HttpToolServer {
    async fn list_tools(&self, cancel: &CancellationToken) -> Result<Vec<ToolDef>, ToolError> {
        let url = format!("{}/tools", self.base_url);
        debug!(url = %url, "listing tools");
        let resp = self.send(self.client.get(&url), cancel).await?;
        let defs: Vec<WireToolDef> =
            resp.json().await.map_err(|e| ToolError::InvalidResponse {
                message: format!("failed to decode tool list: {e}"),
            })?;
        Ok(defs
            .into_iter()
            .map(|d| ToolDef {
                name: d.name,
                description: d.description,
                input_schema: d.input_schema,
            })
            .collect())
    }

    async fn call_tool(
        &self,
        name: &str,
        input: &Value,
        cancel: &CancellationToken,
    ) -> Result<ToolReply, ToolError> {
        let url = format!("{}/tools/call", self.base_url);
        debug!(url = %url, tool = name, "invoking tool");
        let req = self
            .client
            .post(&url)
            .json(&WireCallRequest { name, input });
        let resp = self.send(req, cancel).await?;
        let reply: WireCallReply =
            resp.json().await.map_err(|e| ToolError::InvalidResponse {
                message: format!("failed to decode tool reply: {e}"),
            })?;
        Ok(ToolReply { output: reply.output, is_error: reply.is_error })
    }
}
