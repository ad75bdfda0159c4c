//! Predicate evaluation against JSON rows
//!
//! Follows SQL three-valued logic: a NULL (or missing) column only satisfies
//! `Blank` and `IsNull`. Every comparison, including `<>` and `NOT LIKE`,
//! is false on NULL.

use std::cmp::Ordering;

use serde_json::Value;

use crate::filter::value::{bool_of, number_of, serialized, stored_date_of, text_of};
use crate::filter::{CompareOp, Condition, Operand, Predicate};

/// Evaluates compiled predicates against rows
pub struct RowMatcher;

impl RowMatcher {
    /// Checks if a row matches all predicates
    pub fn matches(row: &Value, predicates: &[Predicate]) -> bool {
        predicates
            .iter()
            .all(|predicate| Self::matches_predicate(row, predicate))
    }

    fn matches_predicate(row: &Value, predicate: &Predicate) -> bool {
        let column = row.get(&predicate.field).filter(|v| !v.is_null());

        let Some(column) = column else {
            return matches!(predicate.condition, Condition::Blank | Condition::IsNull);
        };

        match &predicate.condition {
            Condition::Compare { op, operand } => {
                compare(column, operand).is_some_and(|ordering| op.accepts(ordering))
            }
            Condition::Between { low, high } => {
                let above_low = compare(column, low).is_some_and(|o| CompareOp::Gte.accepts(o));
                let below_high = compare(column, high).is_some_and(|o| CompareOp::Lte.accepts(o));
                above_low && below_high
            }
            Condition::Like { pattern, negated } => match text_of(column) {
                Some(text) => pattern.matches(&text) != *negated,
                None => false,
            },
            Condition::Blank => column.as_str() == Some(""),
            Condition::NotBlank => column.as_str() != Some(""),
            Condition::IsNull => false,
            Condition::IsNotNull => true,
            Condition::InList(items) => match text_of(column) {
                Some(text) => items.iter().any(|item| *item == text),
                None => false,
            },
            Condition::SerializedContains(needle) => serialized(column).contains(needle.as_str()),
        }
    }
}

/// `column.cmp(operand)` in the operand's domain, or `None` when the column
/// cannot be read in that domain
fn compare(column: &Value, operand: &Operand) -> Option<Ordering> {
    match operand {
        Operand::Integer(expected) => match column.as_i64() {
            Some(actual) => Some(actual.cmp(expected)),
            None => number_of(column)?.partial_cmp(&(*expected as f64)),
        },
        Operand::Float(expected) => number_of(column)?.partial_cmp(expected),
        Operand::Date(expected) => Some(stored_date_of(column)?.cmp(expected)),
        Operand::Text(expected) => Some(str::cmp(&text_of(column)?, expected)),
        Operand::Bool(expected) => Some(bool_of(column)?.cmp(expected)),
    }
}
