//! Streaming generation of presentation outlines.

use futures::{Stream, StreamExt};
use slide_chatgpt::{StructuredClient, StructuredStream};
use slide_common::{OutlineRequest, StructuredChunk, ToolDefinition};
use std::pin::Pin;
use std::sync::Arc;

use crate::config::OutlineConfig;
use crate::error::{normalize_error, GenerationError, OutlineError};
use crate::messages::build_messages;
use crate::prompts::{Clock, SystemClock};
use crate::schema::OutlineSchema;

/// Chunks of an outline in arrival order. A failed generation ends with a
/// single `Err` item.
pub type OutlineStream = Pin<Box<dyn Stream<Item = Result<StructuredChunk, GenerationError>> + Send>>;

#[derive(Clone)]
pub struct OutlineGenerator {
    client: Arc<dyn StructuredClient>,
    config: OutlineConfig,
    clock: Arc<dyn Clock>,
}

impl OutlineGenerator {
    pub fn new(client: Arc<dyn StructuredClient>, config: OutlineConfig) -> Self {
        Self {
            client,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Tools attached to a request: web search only when asked for and the
    /// client can ground answers.
    pub fn tools_for(&self, web_search: bool) -> Option<Vec<ToolDefinition>> {
        (web_search && self.client.supports_web_grounding()).then(|| vec![ToolDefinition::search_web()])
    }

    pub fn generate(&self, request: OutlineRequest) -> OutlineStream {
        let this = self.clone();
        Box::pin(async_stream::stream! {
            match this.open(&request).await {
                Err(e) => yield Err(this.fail(e)),
                Ok(mut chunks) => {
                    while let Some(item) = chunks.next().await {
                        match item {
                            Ok(chunk) => yield Ok(chunk),
                            Err(e) => {
                                yield Err(this.fail(e.into()));
                                break;
                            }
                        }
                    }
                }
            }
        })
    }

    async fn open(&self, request: &OutlineRequest) -> Result<StructuredStream, OutlineError> {
        let model = self.config.model()?;
        let schema = OutlineSchema::with_n_slides(request.n_slides)?;
        let messages = build_messages(request, self.clock.as_ref());
        let tools = self.tools_for(request.web_search);

        tracing::debug!(
            %model,
            n_slides = request.n_slides,
            web_search = tools.is_some(),
            "requesting outline"
        );

        let stream = self
            .client
            .stream_structured(
                model,
                &messages,
                &schema.to_json_schema(),
                true,
                tools.as_deref(),
            )
            .await?;
        Ok(stream)
    }

    fn fail(&self, err: OutlineError) -> GenerationError {
        let err = normalize_error(err);
        tracing::warn!(status = err.status, detail = %err.detail, "outline generation failed");
        err
    }
}
