//! Outline generation for slide presentations: prompt building, schema
//! sizing and a streaming relay over a structured-output model client.

pub mod config;
pub mod error;
pub mod messages;
pub mod outline;
pub mod prompts;
pub mod schema;

pub use config::OutlineConfig;
pub use error::{normalize_error, GenerationError, OutlineError};
pub use messages::build_messages;
pub use outline::{OutlineGenerator, OutlineStream};
pub use prompts::{system_prompt, user_prompt, Clock, FixedClock, SystemClock};
pub use schema::{OutlineSchema, PresentationOutline, SchemaError, SlideOutline};
