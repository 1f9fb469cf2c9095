/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template value and value map types.
//!
//! A [`ValueMap`] is the flat snapshot of a record that directive expressions
//! are evaluated against. It is built once per render and never mutated
//! afterward.
//!
//! Records describe themselves through [`ToValueMap`]. Any `Serialize` type
//! can go through the serde bridge ([`ValueMap::from_serialize`] or
//! [`SerdeRecord`]) instead of implementing the trait by hand.

use crate::error::{TemplateError, TemplateResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;

/// A dynamically-typed scalar or collection held by a [`ValueMap`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// A null/missing value.
    #[default]
    Null,

    /// A boolean value.
    Bool(bool),

    /// An integer value.
    Int(i64),

    /// A decimal value.
    Decimal(Decimal),

    /// A string value.
    Text(String),

    /// A collection of values.
    Sequence(Vec<Value>),
}

impl Value {
    /// Check if this value is "truthy" when used as a bare condition.
    ///
    /// - Null is falsy
    /// - Booleans are themselves
    /// - Strings are truthy unless blank (empty or whitespace only)
    /// - Integers are truthy unless zero
    /// - Everything else (decimals, sequences) is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Text(s) => !is_blank(s),
            Value::Int(i) => *i != 0,
            Value::Decimal(_) | Value::Sequence(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for a string containing at least one non-whitespace character.
    pub fn is_non_blank_text(&self) -> bool {
        matches!(self, Value::Text(s) if !is_blank(s))
    }

    /// True for null or a blank string. Other types are never "empty".
    pub fn is_empty_text(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => is_blank(s),
            _ => false,
        }
    }

    /// True for a sequence with at least one element.
    pub fn has_any(&self) -> bool {
        matches!(self, Value::Sequence(items) if !items.is_empty())
    }

    /// Convert this value to the concrete type of `target`.
    ///
    /// Returns `None` when no conversion exists (sequences, unparsable text,
    /// out-of-range numbers) or when either side is null.
    pub fn coerce_like(&self, target: &Value) -> Option<Value> {
        match (target, self) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Sequence(_), _) | (_, Value::Sequence(_)) => None,

            (Value::Bool(_), Value::Bool(b)) => Some(Value::Bool(*b)),
            (Value::Bool(_), Value::Int(i)) => Some(Value::Bool(*i != 0)),
            (Value::Bool(_), Value::Decimal(d)) => Some(Value::Bool(!d.is_zero())),
            (Value::Bool(_), Value::Text(s)) => parse_bool(s.trim()).map(Value::Bool),

            (Value::Int(_), Value::Int(i)) => Some(Value::Int(*i)),
            (Value::Int(_), Value::Bool(b)) => Some(Value::Int(i64::from(*b))),
            (Value::Int(_), Value::Decimal(d)) => d.round().to_i64().map(Value::Int),
            (Value::Int(_), Value::Text(s)) => s.trim().parse::<i64>().ok().map(Value::Int),

            (Value::Decimal(_), Value::Decimal(d)) => Some(Value::Decimal(*d)),
            (Value::Decimal(_), Value::Int(i)) => Some(Value::Decimal(Decimal::from(*i))),
            (Value::Decimal(_), Value::Bool(b)) => Some(Value::Decimal(Decimal::from(u8::from(*b)))),
            (Value::Decimal(_), Value::Text(s)) => {
                Decimal::from_str(s.trim()).ok().map(Value::Decimal)
            }

            (Value::Text(_), other) => Some(Value::Text(other.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Text(s) => f.write_str(s),
            Value::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Case-insensitive `true`/`false`.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => number_to_value(&n),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            // Nested records have no scalar form; keep them as a present,
            // non-null collection of their field values.
            serde_json::Value::Object(map) => {
                Value::Sequence(map.into_iter().map(|(_, v)| Value::from(v)).collect())
            }
        }
    }
}

fn number_to_value(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::Int(i);
    }
    if let Some(u) = n.as_u64() {
        return Value::Decimal(Decimal::from(u));
    }
    let text = n.to_string();
    let decimal = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .or_else(|| n.as_f64().map(float_to_decimal))
        .unwrap_or_default();
    Value::Decimal(decimal)
}

/// Floats outside the decimal range saturate; those below its precision
/// become zero.
fn float_to_decimal(f: f64) -> Decimal {
    if let Some(d) = Decimal::from_f64(f) {
        return d;
    }
    if f.abs() < 1.0 {
        Decimal::ZERO
    } else if f.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// The per-render snapshot of a record's fields.
///
/// Lookups for unknown keys yield [`Value::Null`], never an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    values: HashMap<String, Value>,
}

impl ValueMap {
    /// Create a new empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a field. Unknown keys resolve to [`Value::Null`].
    pub fn get(&self, key: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.values.get(key).unwrap_or(&NULL)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a value map from any serializable record.
    ///
    /// Each top-level field of the serialized object becomes one entry,
    /// with `None` fields preserved as [`Value::Null`].
    pub fn from_serialize<T: Serialize + ?Sized>(record: &T) -> TemplateResult<Self> {
        let json = serde_json::to_value(record).map_err(|e| TemplateError::Record {
            message: e.to_string(),
        })?;
        match json {
            serde_json::Value::Object(map) => Ok(Self::from_json_object(map)),
            other => Err(TemplateError::Record {
                message: format!("expected a record with named fields, found {}", json_kind(&other)),
            }),
        }
    }

    fn from_json_object(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// A record that can describe its fields as a [`ValueMap`].
///
/// Implement this for record types that should be rendered without going
/// through serde, or wrap a `Serialize` type in [`SerdeRecord`].
pub trait ToValueMap {
    fn to_value_map(&self) -> TemplateResult<ValueMap>;
}

impl ToValueMap for ValueMap {
    fn to_value_map(&self) -> TemplateResult<ValueMap> {
        Ok(self.clone())
    }
}

impl<S: BuildHasher> ToValueMap for HashMap<String, Value, S> {
    fn to_value_map(&self) -> TemplateResult<ValueMap> {
        Ok(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl ToValueMap for serde_json::Map<String, serde_json::Value> {
    fn to_value_map(&self) -> TemplateResult<ValueMap> {
        Ok(ValueMap::from_json_object(self.clone()))
    }
}

impl ToValueMap for serde_json::Value {
    fn to_value_map(&self) -> TemplateResult<ValueMap> {
        ValueMap::from_serialize(self)
    }
}

/// Adapter rendering any `Serialize` record through the serde bridge.
#[derive(Debug, Clone, Copy)]
pub struct SerdeRecord<'a, T: ?Sized>(pub &'a T);

impl<T: Serialize + ?Sized> ToValueMap for SerdeRecord<'_, T> {
    fn to_value_map(&self) -> TemplateResult<ValueMap> {
        ValueMap::from_serialize(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());

        assert!(Value::from("hello").is_truthy());
        assert!(Value::from("false").is_truthy()); // only blank strings are falsy
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from("  \t").is_truthy());

        assert!(Value::Int(5).is_truthy());
        assert!(!Value::Int(0).is_truthy());

        // Decimals and sequences are truthy whenever present
        assert!(Value::Decimal(Decimal::ZERO).is_truthy());
        assert!(Value::Sequence(vec![]).is_truthy());
    }

    #[test]
    fn test_presence_predicates() {
        assert!(Value::from("x").is_non_blank_text());
        assert!(!Value::from(" ").is_non_blank_text());
        assert!(!Value::Int(1).is_non_blank_text());

        assert!(Value::Null.is_empty_text());
        assert!(Value::from("").is_empty_text());
        assert!(!Value::Int(0).is_empty_text());

        assert!(Value::from(vec![1, 2]).has_any());
        assert!(!Value::Sequence(vec![]).has_any());
        assert!(!Value::from("abc").has_any());
    }

    #[test]
    fn test_unknown_key_is_null() {
        let map = ValueMap::new().with("a", 1);
        assert_eq!(map.get("a"), &Value::Int(1));
        assert_eq!(map.get("missing"), &Value::Null);
        assert!(!map.contains_key("missing"));
        assert!(!map.is_empty());
        assert!(ValueMap::new().is_empty());
    }

    #[test]
    fn test_extreme_floats_stay_numeric() {
        let json = serde_json::json!({ "big": 1e300, "small": -1e300, "tiny": 1e-30 });
        let map = ValueMap::from_serialize(&json).unwrap();

        assert_eq!(map.get("big"), &Value::Decimal(Decimal::MAX));
        assert_eq!(map.get("small"), &Value::Decimal(Decimal::MIN));
        assert!(matches!(map.get("tiny"), Value::Decimal(_)));

        assert!(crate::expr::evaluate("big > 5", &map).unwrap());
        assert!(crate::expr::evaluate("small < 5", &map).unwrap());
        assert!(crate::expr::evaluate("tiny < 1", &map).unwrap());
        assert!(!crate::expr::evaluate("tiny notempty", &map).unwrap());
    }

    #[test]
    fn test_coerce_like() {
        let int = Value::Int(0);
        assert_eq!(Value::from("42").coerce_like(&int), Some(Value::Int(42)));
        assert_eq!(Value::from("abc").coerce_like(&int), None);
        assert_eq!(
            Value::Decimal(Decimal::new(25, 1)).coerce_like(&int),
            Some(Value::Int(2)) // half-to-even
        );

        let dec = Value::Decimal(Decimal::ZERO);
        assert_eq!(
            Value::Int(3).coerce_like(&dec),
            Some(Value::Decimal(Decimal::from(3)))
        );

        let text = Value::from("");
        assert_eq!(Value::Int(7).coerce_like(&text), Some(Value::from("7")));
        assert_eq!(Value::Bool(true).coerce_like(&text), Some(Value::from("true")));

        assert_eq!(Value::from("TRUE").coerce_like(&Value::Bool(false)), Some(Value::Bool(true)));
        assert_eq!(Value::Int(1).coerce_like(&Value::Sequence(vec![])), None);
        assert_eq!(Value::Null.coerce_like(&int), None);
    }

    #[derive(Serialize)]
    struct Filter {
        status: Option<String>,
        min_amount: i32,
        rate: f64,
        active: bool,
        tags: Vec<String>,
    }

    #[test]
    fn test_from_serialize() {
        let filter = Filter {
            status: None,
            min_amount: 10,
            rate: 1.5,
            active: true,
            tags: vec!["a".to_string()],
        };
        let map = ValueMap::from_serialize(&filter).unwrap();

        assert_eq!(map.len(), 5);
        assert!(map.contains_key("status"));
        assert_eq!(map.get("status"), &Value::Null);
        assert_eq!(map.get("min_amount"), &Value::Int(10));
        assert_eq!(map.get("rate"), &Value::Decimal(Decimal::new(15, 1)));
        assert_eq!(map.get("active"), &Value::Bool(true));
        assert_eq!(map.get("tags"), &Value::from(vec!["a"]));
    }

    #[test]
    fn test_from_serialize_rejects_scalars() {
        let err = ValueMap::from_serialize(&42).unwrap_err();
        assert!(matches!(err, TemplateError::Record { .. }));
    }

    #[test]
    fn test_serde_record_adapter() {
        let json = serde_json::json!({ "a": 1, "b": "two" });
        let map = SerdeRecord(&json).to_value_map().unwrap();
        assert_eq!(map.get("b"), &Value::from("two"));
    }
}
