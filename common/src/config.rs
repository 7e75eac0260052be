use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {source}")]
    Json { source: serde_json::Error },
    #[error("Failed to parse TOML config: {source}")]
    Toml { source: toml::de::Error },
}

/// Settings shared by the client and the outline generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model used for outline generation
    pub model: String,
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Whether the provider may ground answers with live web search
    pub web_grounding: bool,
    pub request_timeout_secs: u64,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            organization: None,
            project: None,
            web_grounding: false,
            request_timeout_secs: 300,
        }
    }
}

const LOCAL_CONFIG_PATHS: [&str; 4] = [
    ".slide/config.toml",
    ".slide/config.json",
    "slide.config.toml",
    "slide.config.json",
];

impl SlideConfig {
    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents).map_err(|source| ConfigError::Toml { source })
        } else {
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json { source })
        }
    }

    /// User-level config file, e.g. `~/.config/slide/config.toml`.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("slide").join("config.toml"))
    }

    /// Load configuration with default fallback
    pub fn load_with_fallback() -> Self {
        Self::load_with_fallback_in(Path::new("."), Self::user_config_path())
    }

    /// First readable config among the local candidates under `base`, then
    /// `user_config`; defaults when none loads.
    pub fn load_with_fallback_in(base: &Path, user_config: Option<PathBuf>) -> Self {
        let candidates = LOCAL_CONFIG_PATHS
            .iter()
            .map(|rel| base.join(rel))
            .chain(user_config);

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(key) = get("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(model) = get("SLIDE_MODEL") {
            self.model = model;
        }
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(org) = get("OPENAI_ORG") {
            self.organization = Some(org);
        }
        if let Some(project) = get("OPENAI_PROJECT") {
            self.project = Some(project);
        }
        if let Some(flag) = get("SLIDE_WEB_GROUNDING") {
            self.web_grounding = parse_flag(&flag);
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
