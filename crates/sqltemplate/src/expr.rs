/*
 * expr.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Condition expressions used by `{{#if EXPR}}`.
//!
//! An expression has one of three shapes:
//!
//! - `KEY` or `!KEY`: truthiness check
//! - `KEY OP`: unary predicate (`notnull`, `isnull`, `notempty`, `empty`, `any`)
//! - `KEY OP LITERAL`: comparison (`==`, `!=`, `>`, `<`, `>=`, `<=`)
//!
//! Expressions are parsed fresh from each directive and evaluated against a
//! [`ValueMap`]. Missing keys and incomparable values evaluate to `false`;
//! only grammar problems are errors.

use crate::error::{TemplateError, TemplateResult};
use crate::value::{Value, ValueMap, parse_bool};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// A parsed condition expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `KEY` or `!KEY`.
    Truthy { key: String, negated: bool },

    /// `KEY OP`.
    Predicate { key: String, op: Predicate },

    /// `KEY OP LITERAL`.
    Compare {
        key: String,
        op: CompareOp,
        literal: Value,
    },
}

/// Unary predicates of the two-token form. Matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    NotNull,
    IsNull,
    NotEmpty,
    Empty,
    Any,
}

impl Predicate {
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "notnull" => Some(Predicate::NotNull),
            "isnull" => Some(Predicate::IsNull),
            "notempty" => Some(Predicate::NotEmpty),
            "empty" => Some(Predicate::Empty),
            "any" => Some(Predicate::Any),
            _ => None,
        }
    }

    pub fn apply(self, value: &Value) -> bool {
        match self {
            Predicate::NotNull => !value.is_null(),
            Predicate::IsNull => value.is_null(),
            Predicate::NotEmpty => value.is_non_blank_text(),
            Predicate::Empty => value.is_empty_text(),
            Predicate::Any => value.has_any(),
        }
    }
}

/// Comparison operators of the three-token form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            ">" => Some(CompareOp::Gt),
            "<" => Some(CompareOp::Lt),
            ">=" => Some(CompareOp::Ge),
            "<=" => Some(CompareOp::Le),
            _ => None,
        }
    }

    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering.is_eq(),
            CompareOp::Ne => ordering.is_ne(),
            CompareOp::Gt => ordering.is_gt(),
            CompareOp::Lt => ordering.is_lt(),
            CompareOp::Ge => ordering.is_ge(),
            CompareOp::Le => ordering.is_le(),
        }
    }
}

impl Expression {
    /// Parse an expression from its source text.
    ///
    /// Tokens are separated by whitespace. Zero or more than three tokens is
    /// a [`TemplateError::MalformedExpression`]; an unrecognized operator is a
    /// [`TemplateError::InvalidOperator`].
    pub fn parse(expr: &str) -> TemplateResult<Self> {
        let tokens: Vec<&str> = expr.split_whitespace().collect();

        match tokens.as_slice() {
            [key] => Ok(match key.strip_prefix('!') {
                Some(name) => Expression::Truthy {
                    key: name.to_string(),
                    negated: true,
                },
                None => Expression::Truthy {
                    key: key.to_string(),
                    negated: false,
                },
            }),
            [key, op] => {
                let op = Predicate::parse(op).ok_or_else(|| invalid_operator(op))?;
                Ok(Expression::Predicate {
                    key: key.to_string(),
                    op,
                })
            }
            [key, op, literal] => {
                let op = CompareOp::parse(op).ok_or_else(|| invalid_operator(op))?;
                Ok(Expression::Compare {
                    key: key.to_string(),
                    op,
                    literal: parse_literal(literal),
                })
            }
            _ => Err(TemplateError::MalformedExpression {
                expr: expr.to_string(),
            }),
        }
    }

    /// Evaluate this expression against a value map.
    pub fn evaluate(&self, values: &ValueMap) -> bool {
        match self {
            // Negation only inverts an explicit `true`; any other value
            // under `!` counts as "not true".
            Expression::Truthy { key, negated: true } => {
                !matches!(values.get(key), Value::Bool(true))
            }
            Expression::Truthy {
                key,
                negated: false,
            } => values.get(key).is_truthy(),
            Expression::Predicate { key, op } => op.apply(values.get(key)),
            Expression::Compare { key, op, literal } => compare(values.get(key), literal, *op),
        }
    }
}

fn invalid_operator(op: &str) -> TemplateError {
    TemplateError::InvalidOperator { op: op.to_string() }
}

/// Parse and evaluate `expr` in one step.
pub fn evaluate(expr: &str, values: &ValueMap) -> TemplateResult<bool> {
    Ok(Expression::parse(expr)?.evaluate(values))
}

/// Parse a comparison literal.
///
/// Tried in order: `null`, boolean, 32-bit integer, decimal. Anything else is
/// text with surrounding single quotes removed.
pub fn parse_literal(token: &str) -> Value {
    if token == "null" {
        return Value::Null;
    }
    if let Some(b) = parse_bool(token) {
        return Value::Bool(b);
    }
    if let Ok(i) = token.parse::<i32>() {
        return Value::Int(i64::from(i));
    }
    // Digit separators are not part of the literal grammar
    let decimal = if token.contains('_') {
        None
    } else {
        Decimal::from_str(token).ok()
    };
    if let Some(d) = decimal {
        return Value::Decimal(d);
    }
    Value::Text(token.trim_matches('\'').to_string())
}

/// Compare `left` against `right` after coercing `right` to `left`'s type.
///
/// Null on either side, a failed coercion, or an unordered type all yield
/// `false`.
pub fn compare(left: &Value, right: &Value, op: CompareOp) -> bool {
    let Some(right) = right.coerce_like(left) else {
        return false;
    };
    match ordering(left, &right) {
        Some(ord) => op.holds(ord),
        None => false,
    }
}

fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
