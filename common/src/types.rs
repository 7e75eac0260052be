use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Speaker of a chat message, serialized with the wire names chat APIs use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A capability handed to the model alongside the request.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolDefinition {
    /// Live web search, mapped by the client onto whatever search facility
    /// the provider exposes.
    SearchWeb,
    Function {
        name: String,
        description: String,
        parameters: Value,
    },
}

impl ToolDefinition {
    pub fn search_web() -> Self {
        ToolDefinition::SearchWeb
    }
}

/// One fragment of structured output as it arrives from the model.
///
/// Fragments are partial JSON text; concatenating every fragment of a
/// completed stream yields the full document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredChunk {
    pub text: String,
}

impl StructuredChunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Parameters of a single outline generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineRequest {
    pub content: String,
    pub n_slides: usize,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub additional_context: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub verbosity: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default = "default_include_title_slide")]
    pub include_title_slide: bool,
    #[serde(default)]
    pub web_search: bool,
}

fn default_include_title_slide() -> bool {
    true
}

impl OutlineRequest {
    pub fn new(content: impl Into<String>, n_slides: usize) -> Self {
        Self {
            content: content.into(),
            n_slides,
            language: None,
            additional_context: None,
            tone: None,
            verbosity: None,
            instructions: None,
            include_title_slide: true,
            web_search: false,
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn additional_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }

    pub fn tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    pub fn verbosity(mut self, verbosity: impl Into<String>) -> Self {
        self.verbosity = Some(verbosity.into());
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn include_title_slide(mut self, include: bool) -> Self {
        self.include_title_slide = include;
        self
    }

    pub fn web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        let msg = ChatMessage::system("hi");
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["role"], "system");
        assert_eq!(v["content"], "hi");
    }

    #[test]
    fn request_defaults_from_json() {
        let req: OutlineRequest =
            serde_json::from_str(r#"{ "content": "Rust", "n_slides": 4 }"#).unwrap();
        assert_eq!(req, OutlineRequest::new("Rust", 4));
        assert!(req.include_title_slide);
        assert!(!req.web_search);
    }
}
