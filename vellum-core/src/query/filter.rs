//! Filter expressions over document fields
//!
//! Filters use the familiar `where` JSON shape:
//!
//! ```json
//! { "status": { "equals": "published" },
//!   "or": [ { "author": { "equals": "u1" } }, { "featured": { "exists": true } } ] }
//! ```
//!
//! Several keys in one object are combined with AND, `{}` matches everything.

use crate::document::{document_values, values_at, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// Errors raised while parsing a filter expression
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Malformed filter: {0}")]
    Malformed(String),
    #[error("Unknown operator '{operator}' on field '{field}'")]
    UnknownOperator { field: String, operator: String },
    #[error("Operator '{operator}' on field '{field}' expects {expected}")]
    InvalidOperand { field: String, operator: String, expected: &'static str },
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Exists,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    Like,
    Contains,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::Exists => "exists",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterThanEqual => "greater_than_equal",
            Operator::LessThan => "less_than",
            Operator::LessThanEqual => "less_than_equal",
            Operator::Like => "like",
            Operator::Contains => "contains",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let op = match name {
            "equals" => Operator::Equals,
            "not_equals" => Operator::NotEquals,
            "in" => Operator::In,
            "not_in" => Operator::NotIn,
            "exists" => Operator::Exists,
            "greater_than" => Operator::GreaterThan,
            "greater_than_equal" => Operator::GreaterThanEqual,
            "less_than" => Operator::LessThan,
            "less_than_equal" => Operator::LessThanEqual,
            "like" => Operator::Like,
            "contains" => Operator::Contains,
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean filter expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Where {
    /// All sub-expressions must match (empty = match everything)
    And(Vec<Where>),
    /// At least one sub-expression must match (empty = match nothing)
    Or(Vec<Where>),
    /// Single field predicate
    Field { path: String, op: Operator, value: Value },
}

impl Default for Where {
    fn default() -> Self {
        Where::all()
    }
}

impl Where {
    /// Matches every document
    pub fn all() -> Self {
        Where::And(Vec::new())
    }

    pub fn field(path: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Where::Field { path: path.into(), op, value: value.into() }
    }

    pub fn equals(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(path, Operator::Equals, value)
    }

    pub fn and(clauses: Vec<Where>) -> Self {
        Where::And(clauses)
    }

    pub fn or(clauses: Vec<Where>) -> Self {
        Where::Or(clauses)
    }

    /// Parse the `where` JSON form
    pub fn from_json(value: &Value) -> Result<Self, FilterError> {
        let Value::Object(map) = value else {
            return Err(FilterError::Malformed(format!("expected an object, got {}", value)));
        };

        let mut clauses = Vec::with_capacity(map.len());
        for (key, entry) in map {
            match key.to_ascii_lowercase().as_str() {
                "and" | "or" => {
                    let Value::Array(items) = entry else {
                        return Err(FilterError::Malformed(format!("'{}' expects an array", key)));
                    };
                    let nested =
                        items.iter().map(Where::from_json).collect::<Result<Vec<_>, _>>()?;
                    if key.eq_ignore_ascii_case("and") {
                        clauses.push(Where::And(nested));
                    } else {
                        clauses.push(Where::Or(nested));
                    }
                }
                _ => clauses.extend(Self::parse_field(key, entry)?),
            }
        }

        if clauses.len() == 1 {
            Ok(clauses.remove(0))
        } else {
            Ok(Where::And(clauses))
        }
    }

    fn parse_field(path: &str, entry: &Value) -> Result<Vec<Where>, FilterError> {
        let Value::Object(ops) = entry else {
            return Err(FilterError::Malformed(format!(
                "field '{}' expects an operator object",
                path
            )));
        };

        let mut predicates = Vec::with_capacity(ops.len());
        for (name, operand) in ops {
            let op = Operator::parse(name).ok_or_else(|| FilterError::UnknownOperator {
                field: path.to_string(),
                operator: name.clone(),
            })?;
            match op {
                Operator::In | Operator::NotIn if !operand.is_array() => {
                    return Err(FilterError::InvalidOperand {
                        field: path.to_string(),
                        operator: name.clone(),
                        expected: "an array",
                    });
                }
                Operator::Exists if !operand.is_boolean() => {
                    return Err(FilterError::InvalidOperand {
                        field: path.to_string(),
                        operator: name.clone(),
                        expected: "a boolean",
                    });
                }
                _ => {}
            }
            predicates.push(Where::Field { path: path.to_string(), op, value: operand.clone() });
        }
        Ok(predicates)
    }

    /// Serialize back to the `where` JSON form
    pub fn to_json(&self) -> Value {
        match self {
            Where::And(clauses) if clauses.is_empty() => Value::Object(Map::new()),
            Where::And(clauses) => {
                Value::Object(Map::from_iter([("and".to_string(), list_json(clauses))]))
            }
            Where::Or(clauses) => {
                Value::Object(Map::from_iter([("or".to_string(), list_json(clauses))]))
            }
            Where::Field { path, op, value } => {
                let inner = Map::from_iter([(op.as_str().to_string(), value.clone())]);
                Value::Object(Map::from_iter([(path.clone(), Value::Object(inner))]))
            }
        }
    }

    /// Evaluate against any JSON value
    pub fn matches(&self, doc: &Value) -> bool {
        self.evaluate_with(&|path| values_at(doc, path))
    }

    /// Evaluate against a document map
    pub fn matches_document(&self, doc: &Document) -> bool {
        self.evaluate_with(&|path| document_values(doc, path))
    }

    fn evaluate_with<'a>(&self, lookup: &dyn Fn(&str) -> Vec<&'a Value>) -> bool {
        match self {
            Where::And(clauses) => clauses.iter().all(|c| c.evaluate_with(lookup)),
            Where::Or(clauses) => clauses.iter().any(|c| c.evaluate_with(lookup)),
            Where::Field { path, op, value } => evaluate(*op, &lookup(path), value),
        }
    }
}

fn list_json(clauses: &[Where]) -> Value {
    Value::Array(clauses.iter().map(Where::to_json).collect())
}

impl TryFrom<Value> for Where {
    type Error = FilterError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Where::from_json(&value)
    }
}

impl From<Where> for Value {
    fn from(filter: Where) -> Self {
        filter.to_json()
    }
}

impl fmt::Display for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

fn evaluate(op: Operator, candidates: &[&Value], operand: &Value) -> bool {
    // Arrays of scalars (hasMany values) behave like several candidates
    let flat: Vec<&Value> = candidates
        .iter()
        .flat_map(|c| match c {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![*other],
        })
        .collect();

    match op {
        Operator::Exists => {
            let present = flat.iter().any(|v| !v.is_null());
            present == operand.as_bool().unwrap_or(true)
        }
        Operator::Equals => flat.iter().any(|v| loosely_equal(v, operand)),
        Operator::NotEquals => !flat.iter().any(|v| loosely_equal(v, operand)),
        Operator::In => match operand {
            Value::Array(options) => {
                flat.iter().any(|v| options.iter().any(|o| loosely_equal(v, o)))
            }
            _ => false,
        },
        Operator::NotIn => match operand {
            Value::Array(options) => {
                !flat.iter().any(|v| options.iter().any(|o| loosely_equal(v, o)))
            }
            _ => true,
        },
        Operator::GreaterThan => any_ordered(&flat, operand, |o| o == Ordering::Greater),
        Operator::GreaterThanEqual => any_ordered(&flat, operand, |o| o != Ordering::Less),
        Operator::LessThan => any_ordered(&flat, operand, |o| o == Ordering::Less),
        Operator::LessThanEqual => any_ordered(&flat, operand, |o| o != Ordering::Greater),
        Operator::Like => {
            let Some(needle) = operand.as_str() else { return false };
            let words: Vec<String> =
                needle.split_whitespace().map(|w| w.to_lowercase()).collect();
            flat.iter().filter_map(|v| v.as_str()).any(|s| {
                let haystack = s.to_lowercase();
                words.iter().all(|w| haystack.contains(w.as_str()))
            })
        }
        Operator::Contains => {
            let Some(needle) = operand.as_str().map(str::to_lowercase) else {
                return flat.iter().any(|v| loosely_equal(v, operand));
            };
            flat.iter().filter_map(|v| v.as_str()).any(|s| s.to_lowercase().contains(&needle))
        }
    }
}

fn any_ordered(flat: &[&Value], operand: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    flat.iter().filter_map(|v| compare_values(v, operand)).any(accept)
}

/// Equality that tolerates `"5"` vs `5` and populated references (`{ "id": .. }`)
fn loosely_equal(candidate: &Value, operand: &Value) -> bool {
    if candidate == operand {
        return true;
    }
    match (candidate, operand) {
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            n.to_string() == *s
        }
        (Value::Object(map), _) => {
            map.get("id").map(|id| loosely_equal(id, operand)).unwrap_or(false)
                || map.get("value").map(|id| loosely_equal(id, operand)).unwrap_or(false)
        }
        _ => false,
    }
}

/// Order two JSON values of comparable kinds (numbers, strings, booleans)
pub(crate) fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::String(y)) => x.as_f64()?.partial_cmp(&y.parse::<f64>().ok()?),
        (Value::String(x), Value::Number(y)) => x.parse::<f64>().ok()?.partial_cmp(&y.as_f64()?),
        _ => None,
    }
}
