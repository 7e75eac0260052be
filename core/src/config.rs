use slide_common::SlideConfig;

use crate::error::OutlineError;

/// Settings the outline generator is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineConfig {
    pub model: String,
}

impl OutlineConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into() }
    }

    /// Model identifier used for outline generation.
    pub fn model(&self) -> Result<&str, OutlineError> {
        let model = self.model.trim();
        if model.is_empty() {
            return Err(OutlineError::Model("no outline model configured".to_string()));
        }
        Ok(model)
    }
}

impl From<&SlideConfig> for OutlineConfig {
    fn from(config: &SlideConfig) -> Self {
        Self::new(config.model.clone())
    }
}
