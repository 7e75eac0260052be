//! Output schema for a presentation outline with a fixed number of slides.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("slide count must be at least 1")]
    ZeroSlides,
}

/// Describes an outline whose `slides` array holds exactly `n_slides` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineSchema {
    n_slides: usize,
}

impl OutlineSchema {
    pub const NAME: &'static str = "PresentationOutline";

    pub fn with_n_slides(n_slides: usize) -> Result<Self, SchemaError> {
        if n_slides == 0 {
            return Err(SchemaError::ZeroSlides);
        }
        Ok(Self { n_slides })
    }

    /// JSON Schema form accepted by strict structured output.
    pub fn to_json_schema(&self) -> Value {
        json!({
            "title": Self::NAME,
            "type": "object",
            "properties": {
                "slides": {
                    "title": "Slides",
                    "description": "List of slide outlines",
                    "type": "array",
                    "minItems": self.n_slides,
                    "maxItems": self.n_slides,
                    "items": {
                        "title": "SlideOutline",
                        "type": "object",
                        "properties": {
                            "content": {
                                "title": "Content",
                                "description": "Markdown content for each slide",
                                "type": "string",
                            },
                        },
                        "required": ["content"],
                        "additionalProperties": false,
                    },
                },
            },
            "required": ["slides"],
            "additionalProperties": false,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideOutline {
    pub content: String,
}

/// A completed outline as produced under [`OutlineSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationOutline {
    pub slides: Vec<SlideOutline>,
}

impl PresentationOutline {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Slides joined with horizontal rules.
    pub fn to_markdown(&self) -> String {
        self.slides
            .iter()
            .map(|s| s.content.trim())
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slides_array_is_sized_exactly() {
        let schema = OutlineSchema::with_n_slides(5).unwrap().to_json_schema();
        let slides = &schema["properties"]["slides"];
        assert_eq!(slides["minItems"], 5);
        assert_eq!(slides["maxItems"], 5);
        assert_eq!(schema["required"][0], "slides");
        assert_eq!(slides["items"]["additionalProperties"], false);
    }

    #[test]
    fn zero_slides_rejected() {
        assert_eq!(OutlineSchema::with_n_slides(0), Err(SchemaError::ZeroSlides));
    }

    #[test]
    fn parses_and_renders_outline() {
        let outline = PresentationOutline::parse(
            r###"{"slides":[{"content":"# Title\n"},{"content":"## Numbers\n- 42%"}]}"###,
        )
        .unwrap();
        assert_eq!(outline.slides.len(), 2);
        assert_eq!(outline.to_markdown(), "# Title\n\n---\n\n## Numbers\n- 42%");
    }
}
