/*
 * directive.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Directive resolution.
//!
//! Two independent passes rewrite the template text. The if-pass replaces
//! each `{{#if}}` block with one of its bodies; the between-pass then runs on
//! the if-pass output and keeps or drops each `{{#between}}` body.

use crate::ast::{BetweenBlock, Directive, IfBlock, Segment};
use crate::error::TemplateResult;
use crate::expr::Expression;
use crate::lexer::{scan_between_blocks, scan_if_blocks};
use crate::observer::RenderObserver;
use crate::value::ValueMap;

/// Replace every `{{#if EXPR}}...{{/if}}` block in `source`.
///
/// The block becomes its then-body when `EXPR` holds and its else-body
/// otherwise (empty without an else clause). A malformed expression aborts
/// the whole pass.
pub fn resolve_if_blocks(
    source: &str,
    values: &ValueMap,
    observer: &dyn RenderObserver,
) -> TemplateResult<String> {
    let mut output = String::with_capacity(source.len());

    for segment in scan_if_blocks(source) {
        match segment {
            Segment::Literal(span) => output.push_str(span.slice(source)),
            Segment::Directive(block) => {
                let taken = evaluate_if(source, &block, values)?;
                observer.on_directive(IfBlock::KIND, taken);
                let body = if taken {
                    Some(block.then_body)
                } else {
                    block.else_body
                };
                if let Some(body) = body {
                    output.push_str(body.slice(source));
                }
            }
        }
    }

    Ok(output)
}

fn evaluate_if(source: &str, block: &IfBlock, values: &ValueMap) -> TemplateResult<bool> {
    Ok(Expression::parse(block.expr.slice(source))?.evaluate(values))
}

/// Replace every `{{#between START END}}...{{/between}}` block in `source`.
///
/// The body is kept only when both keys resolve to non-null values.
pub fn resolve_between_blocks(
    source: &str,
    values: &ValueMap,
    observer: &dyn RenderObserver,
) -> String {
    let mut output = String::with_capacity(source.len());

    for segment in scan_between_blocks(source) {
        match segment {
            Segment::Literal(span) => output.push_str(span.slice(source)),
            Segment::Directive(block) => {
                let taken = has_both_bounds(source, &block, values);
                observer.on_directive(BetweenBlock::KIND, taken);
                if taken {
                    output.push_str(block.body.slice(source));
                }
            }
        }
    }

    output
}

fn has_both_bounds(source: &str, block: &BetweenBlock, values: &ValueMap) -> bool {
    !values.get(block.start_key.slice(source)).is_null()
        && !values.get(block.end_key.slice(source)).is_null()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemplateError;
    use crate::observer::NoopObserver;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn resolve_if(source: &str, values: &ValueMap) -> String {
        resolve_if_blocks(source, values, &NoopObserver).expect("if-pass should succeed")
    }

    #[test]
    fn test_if_takes_then_branch() {
        let values = ValueMap::new().with("status", "active");
        assert_eq!(
            resolve_if(
                "WHERE {{#if status == 'active'}}status = 1{{#else}}1=1{{/if}};",
                &values
            ),
            "WHERE status = 1;"
        );
    }

    #[test]
    fn test_if_takes_else_branch() {
        let values = ValueMap::new().with("status", "closed");
        assert_eq!(
            resolve_if(
                "WHERE {{#if status == 'active'}}status = 1{{#else}}1=1{{/if}};",
                &values
            ),
            "WHERE 1=1;"
        );
    }

    #[test]
    fn test_if_without_else_is_removed() {
        assert_eq!(
            resolve_if("a{{#if missing}}b{{/if}}c", &ValueMap::new()),
            "ac"
        );
    }

    #[test]
    fn test_if_pass_leaves_between_blocks() {
        let source = "{{#between a b}}X{{/between}}";
        assert_eq!(resolve_if(source, &ValueMap::new()), source);
    }

    #[test]
    fn test_malformed_expression_aborts() {
        let result = resolve_if_blocks(
            "ok {{#if a}}1{{/if}} {{#if a b c d}}2{{/if}}",
            &ValueMap::new(),
            &NoopObserver,
        );
        assert!(matches!(
            result,
            Err(TemplateError::MalformedExpression { expr }) if expr == "a b c d"
        ));
    }

    #[test]
    fn test_between_requires_both_keys() {
        let both = ValueMap::new().with("a", 1).with("b", 2);
        let one = ValueMap::new().with("a", 1);
        let null_end = ValueMap::new().with("a", 1).with("b", Value::Null);
        let source = "{{#between a b}}X{{/between}}";

        assert_eq!(resolve_between_blocks(source, &both, &NoopObserver), "X");
        assert_eq!(resolve_between_blocks(source, &one, &NoopObserver), "");
        assert_eq!(resolve_between_blocks(source, &null_end, &NoopObserver), "");
    }

    #[test]
    fn test_between_keeps_falsy_but_present_values() {
        let values = ValueMap::new().with("a", 0).with("b", false);
        assert_eq!(
            resolve_between_blocks("{{#between a b}}X{{/between}}", &values, &NoopObserver),
            "X"
        );
    }
}
