/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template rendering.
//!
//! Rendering is a straight pipeline over the template text:
//!
//! 1. Extract the record's [`ValueMap`] once.
//! 2. Resolve `{{#if}}` blocks.
//! 3. Resolve `{{#between}}` blocks on the if-pass output.
//! 4. Normalize whitespace.
//!
//! A render keeps no state between calls, so one [`Renderer`] can be shared
//! by concurrent callers.

use crate::config::RendererConfig;
use crate::directive::{resolve_between_blocks, resolve_if_blocks};
use crate::error::TemplateResult;
use crate::loader::{FileSystemLoader, TemplateLoader};
use crate::normalize::normalize;
use crate::observer::{INLINE_LABEL, NoopObserver, RenderObserver};
use crate::value::{ToValueMap, ValueMap};

/// Renders templates against records.
///
/// The loader supplies template text for [`render_from_file`](Self::render_from_file);
/// the observer receives diagnostics for every render.
#[derive(Debug, Clone)]
pub struct Renderer<L = FileSystemLoader, O = NoopObserver> {
    config: RendererConfig,
    loader: L,
    observer: O,
}

impl Renderer {
    /// Create a renderer that loads templates from `config.base_path`.
    pub fn new(config: RendererConfig) -> Self {
        let loader = FileSystemLoader::new(config.base_path.clone());
        Self {
            config,
            loader,
            observer: NoopObserver,
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

impl<L: TemplateLoader, O: RenderObserver> Renderer<L, O> {
    /// Replace the template loader.
    pub fn with_loader<L2: TemplateLoader>(self, loader: L2) -> Renderer<L2, O> {
        Renderer {
            config: self.config,
            loader,
            observer: self.observer,
        }
    }

    /// Replace the observer.
    pub fn with_observer<O2: RenderObserver>(self, observer: O2) -> Renderer<L, O2> {
        Renderer {
            config: self.config,
            loader: self.loader,
            observer,
        }
    }

    /// Render template text against a record.
    pub fn render(&self, template: &str, record: &impl ToValueMap) -> TemplateResult<String> {
        self.render_named(template, record, None)
    }

    /// Render template text, labelling diagnostics with `name`.
    pub fn render_named(
        &self,
        template: &str,
        record: &impl ToValueMap,
        name: Option<&str>,
    ) -> TemplateResult<String> {
        let values = record.to_value_map()?;
        tracing::trace!(fields = values.len(), "Extracted record values");
        let output = self.render_values(template, &values)?;
        self.observer.on_rendered(name.unwrap_or(INLINE_LABEL), &output);
        Ok(output)
    }

    /// Load a template through the loader and render it.
    ///
    /// Fails with [`TemplateError::TemplateNotFound`](crate::TemplateError::TemplateNotFound)
    /// before any rendering when the template does not exist.
    pub fn render_from_file(&self, name: &str, record: &impl ToValueMap) -> TemplateResult<String> {
        tracing::debug!(template = name, "Loading template");
        let template = self.loader.load(name)?;
        self.render_named(&template, record, Some(name))
    }

    fn render_values(&self, template: &str, values: &ValueMap) -> TemplateResult<String> {
        let text = resolve_if_blocks(template, values, &self.observer)?;
        let text = resolve_between_blocks(&text, values, &self.observer);
        if self.config.normalize_whitespace {
            Ok(normalize(&text))
        } else {
            Ok(text)
        }
    }
}

/// Render template text against a record with the default configuration.
pub fn render(template: &str, record: &impl ToValueMap) -> TemplateResult<String> {
    Renderer::default().render(template, record)
}
