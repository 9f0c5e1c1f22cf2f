// crates/datatable-core/src/core/query.rs
// ============================================================================
// Module: Data Table Query Model
// Description: Field-comparison conditions and their boolean combination.
// Purpose: Describe predicate scans independently of any storage backend.
// Dependencies: serde, serde_json, crate::core::identifiers
// ============================================================================

//! ## Overview
//! A query over a table is an ordered sequence of field-comparison
//! conditions joined left-to-right by boolean combinators. When the
//! combinator list is shorter than `conditions.len() - 1`, the missing
//! pairings default to AND; surplus combinators are ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::FieldName;

// ============================================================================
// SECTION: Operators
// ============================================================================

/// Comparison operator applied to one row field.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Field equals the condition value.
    Equal,
    /// Field differs from the condition value.
    NotEqual,
    /// Field is strictly greater than the condition value.
    GreaterThan,
    /// Field is greater than or equal to the condition value.
    GreaterThanOrEqual,
    /// Field is strictly less than the condition value.
    LessThan,
    /// Field is less than or equal to the condition value.
    LessThanOrEqual,
}

/// Boolean combinator pairing two consecutive conditions.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolOp {
    /// Both sides must hold.
    And,
    /// Either side must hold.
    Or,
}

// ============================================================================
// SECTION: Conditions
// ============================================================================

/// One field-comparison condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCondition {
    /// Row field the condition inspects.
    pub field: FieldName,
    /// Comparison operator.
    pub op: CompareOp,
    /// Value the field is compared against.
    pub value: Value,
}

impl QueryCondition {
    /// Creates a new condition.
    #[must_use]
    pub fn new(field: impl Into<FieldName>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// Ordered conditions plus the combinators pairing them left-to-right.
///
/// # Invariants
/// - `combinators.len() == conditions.len().saturating_sub(1)` after
///   construction; missing entries were padded with [`BoolOp::And`] and
///   surplus entries were dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSet {
    /// Ordered field-comparison conditions.
    conditions: Vec<QueryCondition>,
    /// Combinators pairing consecutive conditions.
    combinators: Vec<BoolOp>,
}

impl ConditionSet {
    /// Builds a condition set, normalizing the combinator list.
    #[must_use]
    pub fn new(conditions: Vec<QueryCondition>, combinators: Vec<BoolOp>) -> Self {
        let required = conditions.len().saturating_sub(1);
        let mut combinators = combinators;
        combinators.truncate(required);
        while combinators.len() < required {
            combinators.push(BoolOp::And);
        }
        Self {
            conditions,
            combinators,
        }
    }

    /// Builds a single-condition set.
    #[must_use]
    pub fn single(condition: QueryCondition) -> Self {
        Self::new(vec![condition], Vec::new())
    }

    /// Returns the ordered conditions.
    #[must_use]
    pub fn conditions(&self) -> &[QueryCondition] {
        &self.conditions
    }

    /// Returns the normalized combinators.
    #[must_use]
    pub fn combinators(&self) -> &[BoolOp] {
        &self.combinators
    }

    /// Returns `true` when the set contains no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::BoolOp;
    use super::CompareOp;
    use super::ConditionSet;
    use super::QueryCondition;

    fn age_condition(op: CompareOp, value: i64) -> QueryCondition {
        QueryCondition::new("age", op, json!(value))
    }

    #[test]
    fn missing_combinators_default_to_and() {
        let set = ConditionSet::new(
            vec![
                age_condition(CompareOp::GreaterThanOrEqual, 18),
                age_condition(CompareOp::LessThan, 65),
                age_condition(CompareOp::NotEqual, 30),
            ],
            vec![BoolOp::Or],
        );
        assert_eq!(set.combinators(), &[BoolOp::Or, BoolOp::And]);
    }

    #[test]
    fn surplus_combinators_are_dropped() {
        let set = ConditionSet::new(
            vec![age_condition(CompareOp::Equal, 18)],
            vec![BoolOp::Or, BoolOp::Or],
        );
        assert!(set.combinators().is_empty());
        assert_eq!(set.conditions().len(), 1);
    }

    #[test]
    fn empty_set_is_reported_empty() {
        let set = ConditionSet::new(Vec::new(), Vec::new());
        assert!(set.is_empty());
    }
}
