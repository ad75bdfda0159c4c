//! Row ordering for the in-memory backend
//!
//! Orders the way SQLite does: NULL first when ascending, numbers before
//! text, and a stable sort so equal keys keep insertion order. Booleans
//! rank as the 0/1 integers SQLite stores them as.

use std::cmp::Ordering;

use serde_json::Value;

use crate::planner::{OrderKey, SortDirection};

/// Sorts rows by a list of order keys
pub struct RowSorter;

impl RowSorter {
    /// Sorts rows by `order`, first key most significant
    pub fn sort(rows: &mut [Value], order: &[OrderKey]) {
        if order.is_empty() {
            return;
        }

        rows.sort_by(|a, b| {
            order
                .iter()
                .map(|key| {
                    let ordering = Self::compare_values(a.get(&key.field), b.get(&key.field));
                    match key.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Compares two column values.
    ///
    /// Ordering rules:
    /// - missing = null < bool and number < string < array < object
    /// - false and true compare as 0 and 1 among numbers
    /// - For same types, natural ordering
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let a = a.unwrap_or(&Value::Null);
        let b = b.unwrap_or(&Value::Null);

        let type_order = |v: &Value| -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) | Value::Number(_) => 1,
                Value::String(_) => 2,
                Value::Array(_) => 3,
                Value::Object(_) => 4,
            }
        };

        let (a_type, b_type) = (type_order(a), type_order(b));
        if a_type != b_type {
            return a_type.cmp(&b_type);
        }

        let numeric = |v: &Value| match v {
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            _ => 0.0,
        };

        match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(0.0);
                    let y = y.as_f64().unwrap_or(0.0);
                    x.total_cmp(&y)
                }
            },
            (Value::Bool(_), Value::Number(_)) | (Value::Number(_), Value::Bool(_)) => {
                numeric(a).total_cmp(&numeric(b))
            }
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
                a.to_string().cmp(&b.to_string())
            }
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(rows: &[Value]) -> Vec<i64> {
        rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let mut rows = vec![
            json!({"id": 1, "amount": 30}),
            json!({"id": 2, "amount": 20}),
            json!({"id": 3, "amount": 25.5}),
        ];

        RowSorter::sort(&mut rows, &[OrderKey::new("amount", SortDirection::Asc)]);
        assert_eq!(ids(&rows), [2, 3, 1]);

        RowSorter::sort(&mut rows, &[OrderKey::new("amount", SortDirection::Desc)]);
        assert_eq!(ids(&rows), [1, 3, 2]);
    }

    #[test]
    fn test_secondary_key_breaks_ties() {
        let mut rows = vec![
            json!({"id": 3, "status": "paid"}),
            json!({"id": 1, "status": "pending"}),
            json!({"id": 2, "status": "paid"}),
        ];

        RowSorter::sort(
            &mut rows,
            &[
                OrderKey::new("status", SortDirection::Asc),
                OrderKey::new("id", SortDirection::Asc),
            ],
        );
        assert_eq!(ids(&rows), [2, 3, 1]);
    }

    #[test]
    fn test_nulls_first_when_ascending() {
        let mut rows = vec![
            json!({"id": 1, "city": "Zagreb"}),
            json!({"id": 2, "city": null}),
            json!({"id": 3}),
        ];

        RowSorter::sort(&mut rows, &[OrderKey::new("city", SortDirection::Asc)]);
        assert_eq!(ids(&rows), [2, 3, 1]);
    }

    #[test]
    fn test_booleans_interleave_with_numbers() {
        let mut rows = vec![
            json!({"id": 1, "flag": 2}),
            json!({"id": 2, "flag": true}),
            json!({"id": 3, "flag": 0.5}),
            json!({"id": 4, "flag": false}),
            json!({"id": 5, "flag": "yes"}),
            json!({"id": 6, "flag": -1}),
        ];

        RowSorter::sort(&mut rows, &[OrderKey::new("flag", SortDirection::Asc)]);
        assert_eq!(ids(&rows), [6, 4, 3, 2, 1, 5]);
    }

    #[test]
    fn test_sort_stable() {
        let mut rows = vec![json!({"id": 1, "k": 5}), json!({"id": 2, "k": 5}), json!({"id": 3, "k": 5})];
        RowSorter::sort(&mut rows, &[OrderKey::new("k", SortDirection::Desc)]);
        assert_eq!(ids(&rows), [1, 2, 3]);
    }
}
