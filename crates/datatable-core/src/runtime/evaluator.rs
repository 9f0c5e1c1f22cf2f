// crates/datatable-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Data Table Condition Evaluator
// Description: Condition evaluation over JSON row payloads.
// Purpose: Decide whether a stored row satisfies a condition set.
// Dependencies: serde_json, crate::core
// ============================================================================

//! ## Overview
//! Condition evaluation folds a [`ConditionSet`] over one JSON row payload,
//! strictly left-to-right. Numeric ordering is integer-exact where both
//! sides are integers and falls back to float comparison otherwise; string
//! ordering is lexicographic. A missing field or a cross-type comparison
//! makes that single condition false rather than raising an error, so
//! malformed rows degrade to non-matches.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;

use serde_json::Number;
use serde_json::Value;

use crate::core::query::BoolOp;
use crate::core::query::CompareOp;
use crate::core::query::ConditionSet;
use crate::core::query::QueryCondition;

// ============================================================================
// SECTION: Condition Evaluation
// ============================================================================

/// Evaluates a condition set against one row payload.
///
/// An empty set matches every row.
#[must_use]
pub fn evaluate_conditions(row: &Value, set: &ConditionSet) -> bool {
    let mut conditions = set.conditions().iter();
    let Some(first) = conditions.next() else {
        return true;
    };
    let mut outcome = evaluate_condition(row, first);
    for (condition, combinator) in conditions.zip(set.combinators()) {
        let next = evaluate_condition(row, condition);
        outcome = match combinator {
            BoolOp::And => outcome && next,
            BoolOp::Or => outcome || next,
        };
    }
    outcome
}

/// Evaluates a single condition against one row payload.
fn evaluate_condition(row: &Value, condition: &QueryCondition) -> bool {
    let Some(field) = row.get(condition.field.as_str()) else {
        return false;
    };
    let Some(ordering) = compare_values(field, &condition.value) else {
        return false;
    };
    match condition.op {
        CompareOp::Equal => ordering == Ordering::Equal,
        CompareOp::NotEqual => ordering != Ordering::Equal,
        CompareOp::GreaterThan => ordering == Ordering::Greater,
        CompareOp::GreaterThanOrEqual => ordering != Ordering::Less,
        CompareOp::LessThan => ordering == Ordering::Less,
        CompareOp::LessThanOrEqual => ordering != Ordering::Greater,
    }
}

/// Compares two JSON scalars, returning `None` for cross-type or
/// non-scalar comparisons.
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

/// Compares two JSON numbers, integer-exact where possible.
fn compare_numbers(left: &Number, right: &Number) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (left.as_i64(), right.as_i64()) {
        return Some(a.cmp(&b));
    }
    if let (Some(a), Some(b)) = (left.as_u64(), right.as_u64()) {
        return Some(a.cmp(&b));
    }
    let a = left.as_f64()?;
    let b = right.as_f64()?;
    a.partial_cmp(&b)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
