use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use serde_json::{json, Value};
use slide_common::{ChatMessage, SlideConfig, StructuredChunk, ToolDefinition};
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::{ClientError, Result};
use crate::sse::SseDecoder;

pub type StructuredStream = Pin<Box<dyn Stream<Item = Result<StructuredChunk>> + Send>>;

/// A chat model that can stream output constrained by a JSON schema.
#[async_trait]
pub trait StructuredClient: Send + Sync {
    /// Whether `tools` may carry [`ToolDefinition::SearchWeb`].
    fn supports_web_grounding(&self) -> bool;

    /// Stream output for `messages` that must conform to `json_schema`.
    ///
    /// Errors raised after the first chunk travel through the stream.
    async fn stream_structured(
        &self,
        model: &str,
        messages: &[ChatMessage],
        json_schema: &Value,
        strict: bool,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<StructuredStream>;
}

/// Chat Completions client speaking the OpenAI structured output protocol.
#[derive(Debug, Clone)]
pub struct OpenAiStructuredClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    organization: Option<String>,
    project: Option<String>,
    web_grounding: bool,
}

impl OpenAiStructuredClient {
    pub fn new(config: &SlideConfig) -> Result<Self> {
        // Per read, not per request: a long outline may stream past any fixed deadline.
        let idle = Duration::from_secs(config.request_timeout_secs);
        let http = reqwest::Client::builder()
            .connect_timeout(idle)
            .read_timeout(idle)
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            organization: config.organization.clone(),
            project: config.project.clone(),
            web_grounding: config.web_grounding,
        })
    }
}

/// Name sent alongside the schema; providers require `^[a-zA-Z0-9_-]+$`.
const SCHEMA_NAME: &str = "structured_output";

pub(crate) fn build_request_body(
    model: &str,
    messages: &[ChatMessage],
    json_schema: &Value,
    strict: bool,
    tools: Option<&[ToolDefinition]>,
) -> Value {
    let mut body = json!({
        "model": model,
        "messages": messages,
        "stream": true,
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": json_schema
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or(SCHEMA_NAME),
                "schema": json_schema,
                "strict": strict,
            },
        },
    });

    let tools = tools.unwrap_or_default();
    let functions: Vec<Value> = tools
        .iter()
        .filter_map(|tool| match tool {
            ToolDefinition::SearchWeb => None,
            ToolDefinition::Function { name, description, parameters } => Some(json!({
                "type": "function",
                "function": {
                    "name": name,
                    "description": description,
                    "parameters": parameters,
                },
            })),
        })
        .collect();
    if !functions.is_empty() {
        body["tools"] = Value::Array(functions);
    }
    if tools.iter().any(|t| matches!(t, ToolDefinition::SearchWeb)) {
        body["web_search_options"] = json!({});
    }
    body
}

/// What the reader does after one SSE payload.
#[derive(Debug, PartialEq)]
pub(crate) enum Step {
    Emit(String),
    Continue,
    End,
}

/// Completion tracking for one response stream.
///
/// A stream is complete only once the provider sends `[DONE]` or a `stop`
/// finish reason; refusal text arrives in fragments and is reported whole.
#[derive(Debug, Default)]
pub(crate) struct StreamState {
    finished: bool,
    refusal: String,
}

impl StreamState {
    pub(crate) fn on_data(&mut self, data: &str) -> Result<Step> {
        if data == "[DONE]" {
            self.check_refusal()?;
            self.finished = true;
            return Ok(Step::End);
        }
        let v: Value = serde_json::from_str(data)?;

        if let Some(err) = v.get("error") {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown provider error")
                .to_string();
            return Err(ClientError::Api { status: 502, message });
        }

        let choice = &v["choices"][0];
        if let Some(fragment) = choice["delta"]["refusal"].as_str() {
            self.refusal.push_str(fragment);
        }
        match choice["finish_reason"].as_str() {
            Some("length") => {
                return Err(ClientError::Stream(
                    "response truncated at the output token limit".to_string(),
                ))
            }
            Some("content_filter") => {
                return Err(ClientError::Stream(
                    "response stopped by the provider's content filter".to_string(),
                ))
            }
            Some("stop") => {
                self.check_refusal()?;
                self.finished = true;
            }
            _ => {}
        }
        match choice["delta"]["content"].as_str() {
            Some(text) if !text.is_empty() => Ok(Step::Emit(text.to_string())),
            _ => Ok(Step::Continue),
        }
    }

    /// Called when the byte stream runs out.
    pub(crate) fn on_eof(&mut self) -> Result<()> {
        self.check_refusal()?;
        if !self.finished {
            return Err(ClientError::Stream("stream ended before completion".to_string()));
        }
        Ok(())
    }

    fn check_refusal(&mut self) -> Result<()> {
        if self.refusal.is_empty() {
            return Ok(());
        }
        Err(ClientError::Refused(std::mem::take(&mut self.refusal)))
    }
}

#[async_trait]
impl StructuredClient for OpenAiStructuredClient {
    fn supports_web_grounding(&self) -> bool {
        self.web_grounding
    }

    async fn stream_structured(
        &self,
        model: &str,
        messages: &[ChatMessage],
        json_schema: &Value,
        strict: bool,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<StructuredStream> {
        let api_key = self.api_key.as_deref().ok_or(ClientError::MissingApiKey)?;
        let body = build_request_body(model, messages, json_schema, strict, tools);
        tracing::debug!(%model, body = %body, "chat completions request");

        let mut req = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("content-type", "application/json");
        if let Some(project) = &self.project {
            req = req.header("OpenAI-Project", project);
        }
        if let Some(org) = &self.organization {
            req = req.header("OpenAI-Organization", org);
        }

        let resp = req.json(&body).send().await?;
        let status = resp.status();
        tracing::debug!(%status, "chat completions response");

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(text);
            return Err(ClientError::Api { status: status.as_u16(), message });
        }

        let mut bytes = Box::pin(resp.bytes_stream());
        let (tx, rx) = mpsc::channel::<Result<StructuredChunk>>(16);
        tokio::spawn(async move {
            let mut decoder = SseDecoder::new();
            let mut state = StreamState::default();
            while let Some(chunk) = bytes.next().await {
                let payloads = match chunk {
                    Ok(b) => decoder.push(&b),
                    Err(e) => {
                        tracing::warn!(error = %e, "stream read failed");
                        let _ = tx.send(Err(ClientError::Http(e))).await;
                        return;
                    }
                };
                for data in payloads {
                    if !forward(&tx, &mut state, &data).await {
                        return;
                    }
                }
            }
            if let Some(data) = decoder.finish() {
                if !forward(&tx, &mut state, &data).await {
                    return;
                }
            }
            match state.on_eof() {
                Ok(()) => tracing::debug!("stream finished"),
                Err(e) => {
                    tracing::warn!(error = %e, "stream closed early");
                    let _ = tx.send(Err(e)).await;
                }
            }
        });

        let stream = futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });
        Ok(Box::pin(stream))
    }
}

/// Send one decoded payload downstream; `false` once the stream is over.
async fn forward(
    tx: &mpsc::Sender<Result<StructuredChunk>>,
    state: &mut StreamState,
    data: &str,
) -> bool {
    match state.on_data(data) {
        Ok(Step::Emit(text)) => tx.send(Ok(StructuredChunk::new(text))).await.is_ok(),
        Ok(Step::Continue) => true,
        Ok(Step::End) => false,
        Err(e) => {
            tracing::warn!(error = %e, "bad stream frame");
            let _ = tx.send(Err(e)).await;
            false
        }
    }
}
