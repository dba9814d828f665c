//! Editor configuration.
//!
//! Every field has a default, so hosts only pass what they want to change.
//! The WASM bridge accepts the same shape as a JSON object.

use crate::direction::Direction;
use crate::document::{DEFAULT_SOURCE, DEFAULT_TITLE};
use crate::theme::Theme;
use serde::Deserialize;

pub const DEFAULT_DEBOUNCE_MS: f64 = 100.0;
pub const DEFAULT_GENERATE_ENDPOINT: &str = "/api/generate-diagram";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("debounce_ms must be a finite, non-negative number (got {0})")]
    Debounce(f64),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Initial document source.
    pub seed: String,
    pub title: String,
    pub theme: Theme,
    pub direction: Direction,
    /// Quiet period before a text change is rendered.
    pub debounce_ms: f64,
    /// Path (or absolute URL) of the AI generation endpoint.
    pub generate_endpoint: String,
    /// Element id of the inline preview container.
    pub inline_container: String,
    /// Element id of the full-screen preview container.
    pub full_screen_container: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SOURCE.to_string(),
            title: DEFAULT_TITLE.to_string(),
            theme: Theme::default(),
            direction: Direction::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            generate_endpoint: DEFAULT_GENERATE_ENDPOINT.to_string(),
            inline_container: "mermaid-preview".to_string(),
            full_screen_container: "full-screen-preview".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config object. An empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.debounce_ms.is_finite() || self.debounce_ms < 0.0 {
            return Err(ConfigError::Debounce(self.debounce_ms));
        }
        Ok(())
    }
}
