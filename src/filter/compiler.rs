//! Predicate compiler
//!
//! Turns one [`FilterDescriptor`] into one [`Predicate`], after checking the
//! field against the live schema and the `(FieldType, FilterOperator)` pair
//! against the supported table.
//!
//! # Check order
//!
//! 1. Field must be a column (`InvalidFilterField`)
//! 2. Pair must be supported (`UnsupportedOperator`)
//! 3. `inRange` needs a range value (`MissingRangeValue`)
//! 4. Values must read as the declared type (`InvalidValue`)

use serde_json::Value;

use super::errors::{FilterError, FilterResult};
use super::predicate::{CompareOp, Condition, Operand, PatternKind, Predicate, TextPattern};
use super::types::{FieldType, FilterDescriptor, FilterOperator};
use super::value;
use crate::schema::SchemaDescriptor;

/// How `boolean` filters treat values that are not recognizably boolean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BooleanCoercion {
    /// Reject with `InvalidValue`
    #[default]
    Strict,
    /// Read as NULL: `equals` becomes IS NULL, `notEqual` becomes IS NOT NULL
    Lenient,
}

/// Compiles filter descriptors into predicates
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateCompiler {
    boolean: BooleanCoercion,
}

impl PredicateCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boolean_coercion(mut self, boolean: BooleanCoercion) -> Self {
        self.boolean = boolean;
        self
    }

    /// Compile one descriptor against the entity's columns
    pub fn compile(
        &self,
        descriptor: &FilterDescriptor,
        schema: &SchemaDescriptor,
    ) -> FilterResult<Predicate> {
        if !schema.has_column(&descriptor.field) {
            return Err(FilterError::InvalidFilterField(descriptor.field.clone()));
        }

        let condition = self.condition(descriptor)?;
        Ok(Predicate::new(descriptor.field.clone(), condition))
    }

    /// Compile a sequence of descriptors, preserving order. Fails on the
    /// first invalid descriptor.
    pub fn compile_all<'a, I>(
        &self,
        descriptors: I,
        schema: &SchemaDescriptor,
    ) -> FilterResult<Vec<Predicate>>
    where
        I: IntoIterator<Item = &'a FilterDescriptor>,
    {
        descriptors
            .into_iter()
            .map(|descriptor| self.compile(descriptor, schema))
            .collect()
    }

    fn condition(&self, d: &FilterDescriptor) -> FilterResult<Condition> {
        use FieldType as T;
        use FilterOperator as O;

        match (d.field_type, d.operator) {
            (T::Text, O::Contains) => like(d, PatternKind::Contains, false),
            (T::Text, O::NotContains) => like(d, PatternKind::Contains, true),
            (T::Text, O::StartsWith) => like(d, PatternKind::StartsWith, false),
            (T::Text, O::EndsWith) => like(d, PatternKind::EndsWith, false),
            (T::Text, O::Equals) => text_compare(d, CompareOp::Eq),
            (T::Text, O::NotEqual) => text_compare(d, CompareOp::Ne),
            (T::Text, O::Blank) => Ok(Condition::Blank),
            (T::Text, O::NotBlank) => Ok(Condition::NotBlank),
            (
                T::Text,
                O::GreaterThan | O::GreaterThanOrEqual | O::LessThan | O::LessThanOrEqual | O::InRange,
            ) => unsupported(d),

            (T::Date | T::Number, O::Equals) => ordered(d, CompareOp::Eq),
            (T::Date | T::Number, O::NotEqual) => ordered(d, CompareOp::Ne),
            (T::Date | T::Number, O::GreaterThan) => ordered(d, CompareOp::Gt),
            (T::Date | T::Number, O::GreaterThanOrEqual) => ordered(d, CompareOp::Gte),
            (T::Date | T::Number, O::LessThan) => ordered(d, CompareOp::Lt),
            (T::Date | T::Number, O::LessThanOrEqual) => ordered(d, CompareOp::Lte),
            (T::Date | T::Number, O::InRange) => range(d),
            (
                T::Date | T::Number,
                O::Contains | O::NotContains | O::StartsWith | O::EndsWith | O::Blank | O::NotBlank,
            ) => unsupported(d),

            (T::Boolean, O::Equals) => self.boolean(d, false),
            (T::Boolean, O::NotEqual) => self.boolean(d, true),
            (
                T::Boolean,
                O::Contains
                | O::NotContains
                | O::StartsWith
                | O::EndsWith
                | O::Blank
                | O::NotBlank
                | O::GreaterThan
                | O::GreaterThanOrEqual
                | O::LessThan
                | O::LessThanOrEqual
                | O::InRange,
            ) => unsupported(d),

            (T::Set, O::Equals) => text_compare(d, CompareOp::Eq),
            (T::Set, O::Contains) => membership(d),
            (
                T::Set,
                O::NotContains
                | O::NotEqual
                | O::StartsWith
                | O::EndsWith
                | O::Blank
                | O::NotBlank
                | O::GreaterThan
                | O::GreaterThanOrEqual
                | O::LessThan
                | O::LessThanOrEqual
                | O::InRange,
            ) => unsupported(d),

            // Arrays only support a substring search over the serialized
            // column, whatever operator was requested.
            (T::Array, _) => Ok(Condition::SerializedContains(text_value(d)?)),
        }
    }

    fn boolean(&self, d: &FilterDescriptor, negated: bool) -> FilterResult<Condition> {
        let parsed = d.value.as_ref().and_then(value::bool_of);
        let op = if negated { CompareOp::Ne } else { CompareOp::Eq };

        match (parsed, self.boolean) {
            (Some(b), _) => Ok(Condition::Compare {
                op,
                operand: Operand::Bool(b),
            }),
            (None, BooleanCoercion::Strict) => Err(FilterError::invalid_value(
                &d.field,
                "expected a boolean (true/false/1/0)",
            )),
            (None, BooleanCoercion::Lenient) if negated => Ok(Condition::IsNotNull),
            (None, BooleanCoercion::Lenient) => Ok(Condition::IsNull),
        }
    }
}

fn unsupported(d: &FilterDescriptor) -> FilterResult<Condition> {
    Err(FilterError::UnsupportedOperator {
        field_type: d.field_type,
        operator: d.operator,
    })
}

fn required_value(d: &FilterDescriptor) -> FilterResult<&Value> {
    d.value.as_ref().ok_or_else(|| {
        FilterError::invalid_value(
            &d.field,
            format!("a value is required for operator '{}'", d.operator),
        )
    })
}

fn text_value(d: &FilterDescriptor) -> FilterResult<String> {
    value::text_of(required_value(d)?)
        .map(|text| text.into_owned())
        .ok_or_else(|| FilterError::invalid_value(&d.field, "expected a text value"))
}

fn like(d: &FilterDescriptor, kind: PatternKind, negated: bool) -> FilterResult<Condition> {
    Ok(Condition::Like {
        pattern: TextPattern::new(kind, text_value(d)?),
        negated,
    })
}

fn text_compare(d: &FilterDescriptor, op: CompareOp) -> FilterResult<Condition> {
    Ok(Condition::Compare {
        op,
        operand: Operand::Text(text_value(d)?),
    })
}

fn ordered(d: &FilterDescriptor, op: CompareOp) -> FilterResult<Condition> {
    let operand = typed_operand(d, required_value(d)?)?;
    Ok(Condition::Compare { op, operand })
}

fn range(d: &FilterDescriptor) -> FilterResult<Condition> {
    let high = d
        .range_value
        .as_ref()
        .filter(|v| !is_blank_scalar(v))
        .ok_or_else(|| FilterError::MissingRangeValue(d.field.clone()))?;

    let low = typed_operand(d, required_value(d)?)?;
    let high = typed_operand(d, high)?;
    Ok(Condition::Between { low, high })
}

fn membership(d: &FilterDescriptor) -> FilterResult<Condition> {
    value::list_of(required_value(d)?)
        .map(Condition::InList)
        .ok_or_else(|| {
            FilterError::invalid_value(&d.field, "expected a comma-separated list or an array")
        })
}

/// Operand for date/number comparisons
fn typed_operand(d: &FilterDescriptor, raw: &Value) -> FilterResult<Operand> {
    match d.field_type {
        FieldType::Date => value::date_of(raw).map(Operand::Date).ok_or_else(|| {
            FilterError::invalid_value(&d.field, "expected a calendar date (YYYY-MM-DD)")
        }),
        _ => number_operand(raw)
            .ok_or_else(|| FilterError::invalid_value(&d.field, "expected a number")),
    }
}

fn number_operand(raw: &Value) -> Option<Operand> {
    match raw {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Operand::Integer(i)),
            None => n.as_f64().map(Operand::Float),
        },
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(Operand::Integer(i));
            }
            s.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Operand::Float)
        }
        _ => None,
    }
}

fn is_blank_scalar(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
