use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use super::parser::{Builtin, CompareOp, Expr};
use crate::error::FilterError;

/// jq truthiness: only `false` and `null` are false.
pub fn truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Structural equality where `1 == 1.0`.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        _ => a == b,
    }
}

fn order(op: CompareOp, a: &Value, b: &Value) -> Result<Ordering, FilterError> {
    let ordering = match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .zip(y.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y)),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    };
    ordering.ok_or_else(|| {
        FilterError::TypeMismatch(format!(
            "cannot compare {} and {} with {:?}",
            type_name(a),
            type_name(b),
            op
        ))
    })
}

fn lookup(root: &Value, segments: &[String]) -> Result<Value, FilterError> {
    let mut current = root;
    for (depth, segment) in segments.iter().enumerate() {
        current = match current {
            Value::Object(map) => map.get(segment).ok_or_else(|| FilterError::UnknownField {
                field: format!(".{}", segments[..=depth].join(".")),
            })?,
            Value::Null => return Ok(Value::Null),
            other => {
                return Err(FilterError::TypeMismatch(format!(
                    "cannot index {} with {:?}",
                    type_name(other),
                    segment
                )))
            }
        };
    }
    Ok(current.clone())
}

fn expect_str<'a>(builtin: &str, value: &'a Value) -> Result<&'a str, FilterError> {
    value.as_str().ok_or_else(|| {
        FilterError::TypeMismatch(format!("{builtin} expects a string, got {}", type_name(value)))
    })
}

/// jq `contains`: substring for strings, element-wise for arrays.
fn contains(haystack: &Value, needle: &Value) -> Result<bool, FilterError> {
    match (haystack, needle) {
        (Value::String(h), Value::String(n)) => Ok(h.contains(n.as_str())),
        (Value::Array(items), Value::Array(wanted)) => Ok(wanted
            .iter()
            .all(|w| items.iter().any(|i| contains(i, w).unwrap_or(false)))),
        (Value::Array(items), other) => Ok(items.iter().any(|i| values_equal(i, other))),
        (a, b) if std::mem::discriminant(a) == std::mem::discriminant(b) => Ok(values_equal(a, b)),
        (a, b) => Err(FilterError::TypeMismatch(format!(
            "{} cannot contain {}",
            type_name(a),
            type_name(b)
        ))),
    }
}

fn apply_builtin(builtin: &Builtin, input: Value, root: &Value) -> Result<Value, FilterError> {
    match builtin {
        Builtin::Length => match &input {
            Value::Null => Ok(Value::from(0)),
            Value::String(s) => Ok(Value::from(s.chars().count())),
            Value::Array(items) => Ok(Value::from(items.len())),
            Value::Object(map) => Ok(Value::from(map.len())),
            Value::Number(n) => Ok(Value::from(n.as_f64().map(f64::abs).unwrap_or_default())),
            Value::Bool(_) => Err(FilterError::TypeMismatch("boolean has no length".into())),
        },
        Builtin::Not => Ok(Value::Bool(!truthy(&input))),
        Builtin::Contains(arg) => {
            let needle = evaluate(arg, root)?;
            Ok(Value::Bool(contains(&input, &needle)?))
        }
        Builtin::StartsWith(arg) => {
            let prefix = evaluate(arg, root)?;
            Ok(Value::Bool(
                expect_str("startswith", &input)?.starts_with(expect_str("startswith", &prefix)?),
            ))
        }
        Builtin::EndsWith(arg) => {
            let suffix = evaluate(arg, root)?;
            Ok(Value::Bool(
                expect_str("endswith", &input)?.ends_with(expect_str("endswith", &suffix)?),
            ))
        }
        Builtin::Test(arg) => {
            let pattern = evaluate(arg, root)?;
            let pattern = expect_str("test", &pattern)?;
            let re = Regex::new(pattern).map_err(|e| FilterError::Regex {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
            Ok(Value::Bool(re.is_match(expect_str("test", &input)?)))
        }
    }
}

/// Evaluate `expr` against `root`. Builtin arguments are evaluated against
/// `root` as well, not against the piped value.
pub fn evaluate(expr: &Expr, root: &Value) -> Result<Value, FilterError> {
    match expr {
        Expr::Path(segments) => lookup(root, segments),
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Halt => Err(FilterError::Halt),
        Expr::Not(inner) => Ok(Value::Bool(!truthy(&evaluate(inner, root)?))),
        Expr::And(lhs, rhs) => {
            if !truthy(&evaluate(lhs, root)?) {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(truthy(&evaluate(rhs, root)?)))
        }
        Expr::Or(lhs, rhs) => {
            if truthy(&evaluate(lhs, root)?) {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(truthy(&evaluate(rhs, root)?)))
        }
        Expr::Compare(op, lhs, rhs) => {
            let a = evaluate(lhs, root)?;
            let b = evaluate(rhs, root)?;
            let result = match op {
                CompareOp::Eq => values_equal(&a, &b),
                CompareOp::Ne => !values_equal(&a, &b),
                CompareOp::Lt => order(*op, &a, &b)? == Ordering::Less,
                CompareOp::Le => order(*op, &a, &b)? != Ordering::Greater,
                CompareOp::Gt => order(*op, &a, &b)? == Ordering::Greater,
                CompareOp::Ge => order(*op, &a, &b)? != Ordering::Less,
            };
            Ok(Value::Bool(result))
        }
        Expr::Pipe(inner, builtin) => {
            let input = evaluate(inner, root)?;
            apply_builtin(builtin, input, root)
        }
    }
}
