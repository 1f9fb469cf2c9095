/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Directive span types.
//!
//! Templates are never parsed into a tree. The lexer cuts the text into a
//! flat sequence of [`Segment`]s: literal ranges and directive blocks, each
//! holding byte ranges into the scanned text.

use std::fmt;

/// A byte range into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// The text this span covers.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Conditional block: `{{#if EXPR}}BODY{{#else}}ELSE{{/if}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfBlock {
    /// The whole directive, tags included.
    pub span: Span,
    /// The condition expression, already trimmed.
    pub expr: Span,
    /// Text between the opening tag and `{{#else}}` (or `{{/if}}`).
    pub then_body: Span,
    /// Text between `{{#else}}` and `{{/if}}`, if an else clause exists.
    pub else_body: Option<Span>,
}

/// Presence block: `{{#between START END}}BODY{{/between}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetweenBlock {
    /// The whole directive, tags included.
    pub span: Span,
    pub start_key: Span,
    pub end_key: Span,
    pub body: Span,
}

/// A directive block the lexer can produce.
pub trait Directive {
    const KIND: DirectiveKind;

    /// The whole directive, tags included.
    fn span(&self) -> Span;
}

impl Directive for IfBlock {
    const KIND: DirectiveKind = DirectiveKind::If;

    fn span(&self) -> Span {
        self.span
    }
}

impl Directive for BetweenBlock {
    const KIND: DirectiveKind = DirectiveKind::Between;

    fn span(&self) -> Span {
        self.span
    }
}

/// One piece of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<D> {
    /// Text copied to the output unchanged.
    Literal(Span),

    Directive(D),
}

impl<D: Directive> Segment<D> {
    pub fn span(&self) -> Span {
        match self {
            Segment::Literal(span) => *span,
            Segment::Directive(directive) => directive.span(),
        }
    }
}

/// The directive kinds a template can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    If,
    Between,
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveKind::If => f.write_str("if"),
            DirectiveKind::Between => f.write_str("between"),
        }
    }
}
