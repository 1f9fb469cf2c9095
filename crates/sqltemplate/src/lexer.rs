/*
 * lexer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Single-pass directive scanner.
//!
//! Each directive kind gets its own scan over the text, producing a flat list
//! of [`Segment`]s that covers the input end to end. Directives never nest: a
//! block runs from its opening tag to the first matching closing tag, and any
//! markers inside the body are plain text to this scan.
//!
//! An opening tag that is malformed or never closed stays in the output as
//! literal text.
//!
//! Keywords are matched ASCII-case-insensitively. All delimiters are ASCII,
//! so every offset produced here lies on a char boundary.

use crate::ast::{BetweenBlock, Directive, IfBlock, Segment, Span};

const IF_OPEN: &str = "{{#if";
const ELSE_TAG: &str = "{{#else}}";
const IF_CLOSE: &str = "{{/if}}";
const BETWEEN_OPEN: &str = "{{#between";
const BETWEEN_CLOSE: &str = "{{/between}}";
const TAG_END: &str = "}}";

/// Cut `source` into literal text and `{{#if}}` blocks.
pub fn scan_if_blocks(source: &str) -> Vec<Segment<IfBlock>> {
    scan(source, IF_OPEN, |at| match_if_block(source, at))
}

/// Cut `source` into literal text and `{{#between}}` blocks.
pub fn scan_between_blocks(source: &str) -> Vec<Segment<BetweenBlock>> {
    scan(source, BETWEEN_OPEN, |at| match_between_block(source, at))
}

fn scan<D: Directive>(
    source: &str,
    opener: &str,
    mut try_match: impl FnMut(usize) -> Option<D>,
) -> Vec<Segment<D>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut search_from = 0;

    while let Some(at) = find_ignore_case(source, opener, search_from) {
        match try_match(at) {
            Some(directive) => {
                if at > literal_start {
                    segments.push(Segment::Literal(Span::new(literal_start, at)));
                }
                let end = directive.span().end;
                segments.push(Segment::Directive(directive));
                literal_start = end;
                search_from = end;
            }
            // Not a directive here; keep looking one byte further on.
            None => search_from = at + 1,
        }
    }

    if literal_start < source.len() {
        segments.push(Segment::Literal(Span::new(literal_start, source.len())));
    }
    segments
}

/// Match `{{#if EXPR}}BODY({{#else}}ELSE)?{{/if}}` starting at `at`.
fn match_if_block(source: &str, at: usize) -> Option<IfBlock> {
    let after_keyword = at + IF_OPEN.len();
    let expr_start = skip_required_whitespace(source, after_keyword)?;

    // The expression is confined to one line and ends at the first `}}`.
    let expr_end = source[expr_start..].find(TAG_END)? + expr_start;
    let raw_expr = &source[expr_start..expr_end];
    if raw_expr.contains('\n') {
        return None;
    }
    let expr = trimmed(source, Span::new(expr_start, expr_end));

    let body_start = expr_end + TAG_END.len();
    let close = find_ignore_case(source, IF_CLOSE, body_start)?;

    let (then_body, else_body) = match find_ignore_case(&source[..close], ELSE_TAG, body_start) {
        Some(else_at) => (
            Span::new(body_start, else_at),
            Some(Span::new(else_at + ELSE_TAG.len(), close)),
        ),
        None => (Span::new(body_start, close), None),
    };

    Some(IfBlock {
        span: Span::new(at, close + IF_CLOSE.len()),
        expr,
        then_body,
        else_body,
    })
}

/// Match `{{#between START END}}BODY{{/between}}` starting at `at`.
fn match_between_block(source: &str, at: usize) -> Option<BetweenBlock> {
    let after_keyword = at + BETWEEN_OPEN.len();

    let start_begin = skip_required_whitespace(source, after_keyword)?;
    let start_key = word(source, start_begin)?;

    let end_begin = skip_required_whitespace(source, start_key.end)?;
    let end_key = word(source, end_begin)?;

    if !source[end_key.end..].starts_with(TAG_END) {
        return None;
    }
    let body_start = end_key.end + TAG_END.len();
    let close = find_ignore_case(source, BETWEEN_CLOSE, body_start)?;

    Some(BetweenBlock {
        span: Span::new(at, close + BETWEEN_CLOSE.len()),
        start_key,
        end_key,
        body: Span::new(body_start, close),
    })
}

/// Skip at least one whitespace character, returning the next offset.
fn skip_required_whitespace(source: &str, from: usize) -> Option<usize> {
    let rest = &source[from..];
    let skipped = rest.len() - rest.trim_start().len();
    (skipped > 0).then_some(from + skipped)
}

/// A non-empty run of word characters (alphanumerics and `_`).
fn word(source: &str, from: usize) -> Option<Span> {
    let len: usize = source[from..]
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .map(char::len_utf8)
        .sum();
    (len > 0).then(|| Span::new(from, from + len))
}

fn trimmed(source: &str, span: Span) -> Span {
    let text = span.slice(source);
    let start = span.start + (text.len() - text.trim_start().len());
    let end = span.end - (text.len() - text.trim_end().len());
    Span::new(start, end.max(start))
}

/// Find an ASCII `needle` in `haystack[from..]`, ignoring ASCII case.
fn find_ignore_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if from > hay.len() || needle.len() > hay.len() - from {
        return None;
    }
    (from..=hay.len() - needle.len())
        .find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}
