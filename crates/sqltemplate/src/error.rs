/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template loading, expression evaluation and rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during template operations.
///
/// Only structural problems are errors. A missing key or a pair of values
/// that cannot be compared evaluates to `false` instead.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The named template does not exist under the source's base path.
    #[error("Template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    /// An `{{#if}}` expression with no tokens or more than three.
    #[error("Invalid expression: {expr}")]
    MalformedExpression { expr: String },

    /// An operator outside the recognized unary or comparison sets.
    #[error("Invalid operator: {op}")]
    InvalidOperator { op: String },

    /// The record could not be turned into a value map.
    #[error("Invalid record: {message}")]
    Record { message: String },

    /// The renderer configuration could not be read.
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// I/O error (e.g., reading a template file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
