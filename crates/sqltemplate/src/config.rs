/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Renderer configuration.

use crate::error::{TemplateError, TemplateResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for a [`Renderer`](crate::Renderer).
///
/// Can be built in code or deserialized; missing fields take their defaults.
///
/// ```json
/// { "base_path": "sql/templates", "normalize_whitespace": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Directory that template names are resolved against.
    pub base_path: PathBuf,

    /// Collapse incidental whitespace in the rendered output.
    pub normalize_whitespace: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            normalize_whitespace: true,
        }
    }
}

impl RendererConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_normalization(mut self, enabled: bool) -> Self {
        self.normalize_whitespace = enabled;
        self
    }

    /// Read a configuration from JSON text.
    pub fn from_json_str(json: &str) -> TemplateResult<Self> {
        serde_json::from_str(json).map_err(|e| TemplateError::Config {
            message: e.to_string(),
        })
    }
}
