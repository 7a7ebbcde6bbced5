//! Boolean query language over a notification's JSON representation.
//!
//! A deliberately small jq dialect: dotted paths, literals, comparisons,
//! `and`/`or`/`not`, parentheses, a few pipe builtins and `halt`.
//! Evaluating `halt` ends the current pass early and keeps whatever matched
//! so far; every other evaluation error is returned to the caller.

mod eval;
mod lexer;
mod parser;

pub use eval::truthy;
pub use parser::{Builtin, CompareOp, Expr};

use serde_json::Value;

use crate::error::FilterError;
use crate::models::{Notification, Notifications};

/// A parsed filter expression. The empty expression selects everything.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    source: String,
    expr: Option<Expr>,
}

impl Query {
    pub fn parse(src: &str) -> Result<Self, FilterError> {
        let expr = if src.trim().is_empty() {
            None
        } else {
            Some(parser::parse(src)?)
        };
        Ok(Self {
            source: src.to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_identity(&self) -> bool {
        self.expr.is_none()
    }

    /// Evaluate against one JSON document. `Err(FilterError::Halt)` is
    /// passed through for the caller to interpret.
    pub fn matches_value(&self, value: &Value) -> Result<bool, FilterError> {
        match &self.expr {
            None => Ok(true),
            Some(expr) => Ok(truthy(&eval::evaluate(expr, value)?)),
        }
    }

    pub fn matches(&self, notification: &Notification) -> Result<bool, FilterError> {
        if self.expr.is_none() {
            return Ok(true);
        }
        let value = serde_json::to_value(notification)
            .map_err(|e| FilterError::TypeMismatch(format!("cannot encode notification: {e}")))?;
        self.matches_value(&value)
    }

    /// Narrow `candidates` (indices into `items`) to those matching,
    /// preserving their order. A halt stops the pass and keeps the matches
    /// found before it.
    pub fn select(
        &self,
        items: &[Notification],
        candidates: &[usize],
    ) -> Result<Vec<usize>, FilterError> {
        if self.expr.is_none() {
            return Ok(candidates.to_vec());
        }

        let mut selected = Vec::with_capacity(candidates.len());
        for &index in candidates {
            match self.matches(&items[index]) {
                Ok(true) => selected.push(index),
                Ok(false) => {}
                Err(FilterError::Halt) => {
                    tracing::debug!("filter {:?}: halted after {} matches", self.source, selected.len());
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(selected)
    }
}

/// Select the notifications matching `expr`, preserving order.
pub fn filter(expr: &str, set: &Notifications) -> Result<Notifications, FilterError> {
    let query = Query::parse(expr)?;
    let all: Vec<usize> = (0..set.len()).collect();
    let selected = query.select(set.as_slice(), &all)?;
    Ok(selected
        .into_iter()
        .map(|i| set.as_slice()[i].clone())
        .collect())
}

/// Apply several expressions in sequence, each narrowing the previous result.
pub fn filter_chain(exprs: &[String], set: &Notifications) -> Result<Notifications, FilterError> {
    let queries = exprs
        .iter()
        .map(|e| Query::parse(e))
        .collect::<Result<Vec<_>, _>>()?;
    let mut selected: Vec<usize> = (0..set.len()).collect();
    for query in &queries {
        selected = query.select(set.as_slice(), &selected)?;
    }
    Ok(selected
        .into_iter()
        .map(|i| set.as_slice()[i].clone())
        .collect())
}
