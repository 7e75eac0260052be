//! Streaming structured-output client for OpenAI-compatible chat APIs.

pub mod client;
pub mod error;
pub mod sse;

pub use client::{OpenAiStructuredClient, StructuredClient, StructuredStream};
pub use error::ClientError;
pub use slide_common::{ChatMessage, Role, StructuredChunk, ToolDefinition};
