/*
 * loader.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template loading.
//!
//! This module provides the [`TemplateLoader`] trait and implementations for
//! fetching template text by name from various sources (filesystem, memory).

use crate::error::{TemplateError, TemplateResult};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Trait for loading template source text by name.
///
/// A missing template is reported as [`TemplateError::TemplateNotFound`].
pub trait TemplateLoader {
    /// Load a template by name (e.g., "report.sql", "queries/by_status.sql").
    fn load(&self, name: &str) -> TemplateResult<String>;
}

/// Loader that reads UTF-8 templates relative to a base directory.
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
    base_path: PathBuf,
}

impl FileSystemLoader {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// The file a template name refers to.
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

impl Default for FileSystemLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl TemplateLoader for FileSystemLoader {
    fn load(&self, name: &str) -> TemplateResult<String> {
        let path = self.resolve_path(name);
        if !path.is_file() {
            return Err(TemplateError::TemplateNotFound { path });
        }
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TemplateError::TemplateNotFound { path },
            _ => TemplateError::Io(e),
        })
    }
}

/// Loader that serves templates from an in-memory map.
///
/// Useful for testing and for templates bundled into the application.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    templates: HashMap<String, String>,
}

impl MemoryLoader {
    /// Create a new empty memory loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template under the name it will be loaded by.
    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.templates.insert(name.into(), content.into());
        self
    }

    /// Create a loader with the given templates.
    pub fn with_templates(
        templates: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        let mut loader = Self::new();
        for (name, content) in templates {
            loader.add(name, content);
        }
        loader
    }
}

impl TemplateLoader for MemoryLoader {
    fn load(&self, name: &str) -> TemplateResult<String> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::TemplateNotFound {
                path: PathBuf::from(name),
            })
    }
}

/// Loader that never finds anything.
///
/// Use this when templates are only ever rendered from strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLoader;

impl TemplateLoader for NullLoader {
    fn load(&self, name: &str) -> TemplateResult<String> {
        Err(TemplateError::TemplateNotFound {
            path: PathBuf::from(name),
        })
    }
}
