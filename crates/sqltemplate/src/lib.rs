/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Conditional text template engine.
//!
//! Renders text templates (typically SQL) whose fragments are switched on
//! and off by the fields of a record. Two directives are supported:
//!
//! - Conditionals: `{{#if EXPR}}...{{#else}}...{{/if}}` (else optional)
//! - Presence ranges: `{{#between START END}}...{{/between}}`, kept only
//!   when both fields are non-null
//!
//! `EXPR` is a one- to three-token expression:
//!
//! - `key` / `!key`: truthiness
//! - `key notnull|isnull|notempty|empty|any`: unary predicates
//! - `key ==|!=|>|<|>=|<= literal`: comparison, with the literal coerced to
//!   the field's type
//!
//! Directives do not nest. After resolution, incidental whitespace is
//! collapsed so the output carries no ragged indentation or blank lines.
//!
//! # Architecture
//!
//! Records are flattened into a [`ValueMap`] through [`ToValueMap`]; any
//! `Serialize` type works via [`SerdeRecord`]. The [`Renderer`] runs the
//! if-pass, then the between-pass, then normalization. Templates can be
//! loaded by name through a [`TemplateLoader`], and a [`RenderObserver`]
//! receives diagnostics (see [`TracingObserver`]).
//!
//! # Example
//!
//! ```
//! use sqltemplate::{ValueMap, render};
//!
//! let values = ValueMap::new().with("status", "active");
//! let sql = render(
//!     "SELECT * FROM t {{#if status notempty}}WHERE status = @status{{/if}}",
//!     &values,
//! )?;
//! assert_eq!(sql, "SELECT * FROM t WHERE status = @status");
//! # Ok::<(), sqltemplate::TemplateError>(())
//! ```

pub mod ast;
pub mod config;
pub mod directive;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod loader;
pub mod normalize;
pub mod observer;
pub mod render;
pub mod value;

// Re-export main types at crate root
pub use ast::{BetweenBlock, DirectiveKind, IfBlock, Segment, Span};
pub use config::RendererConfig;
pub use error::{TemplateError, TemplateResult};
pub use expr::{CompareOp, Expression, Predicate, evaluate};
pub use loader::{FileSystemLoader, MemoryLoader, NullLoader, TemplateLoader};
pub use normalize::normalize;
pub use observer::{NoopObserver, RenderObserver, TracingObserver};
pub use render::{Renderer, render};
pub use value::{SerdeRecord, ToValueMap, Value, ValueMap};
