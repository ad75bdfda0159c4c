//! Filter descriptor wire types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of the filtered field, chosen by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Date,
    Number,
    Boolean,
    Set,
    Array,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Text,
        FieldType::Date,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Set,
        FieldType::Array,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Set => "set",
            FieldType::Array => "array",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Contains,
    NotContains,
    Equals,
    NotEqual,
    StartsWith,
    EndsWith,
    Blank,
    NotBlank,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    InRange,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 13] = [
        FilterOperator::Contains,
        FilterOperator::NotContains,
        FilterOperator::Equals,
        FilterOperator::NotEqual,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::Blank,
        FilterOperator::NotBlank,
        FilterOperator::GreaterThan,
        FilterOperator::GreaterThanOrEqual,
        FilterOperator::LessThan,
        FilterOperator::LessThanOrEqual,
        FilterOperator::InRange,
    ];

    /// Get the operator's wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "notContains",
            FilterOperator::Equals => "equals",
            FilterOperator::NotEqual => "notEqual",
            FilterOperator::StartsWith => "startsWith",
            FilterOperator::EndsWith => "endsWith",
            FilterOperator::Blank => "blank",
            FilterOperator::NotBlank => "notBlank",
            FilterOperator::GreaterThan => "greaterThan",
            FilterOperator::GreaterThanOrEqual => "greaterThanOrEqual",
            FilterOperator::LessThan => "lessThan",
            FilterOperator::LessThanOrEqual => "lessThanOrEqual",
            FilterOperator::InRange => "inRange",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One client-supplied filter condition.
///
/// `field` and `operator` are always present; `fieldType` defaults to `text`.
/// `rangeValue` is only read by `inRange`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDescriptor {
    /// Column to filter on
    pub field: String,

    /// Primary comparison value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Declared field type
    #[serde(default)]
    pub field_type: FieldType,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Upper bound for `inRange`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_value: Option<Value>,
}

impl FilterDescriptor {
    /// Create a descriptor without a value (`blank`, `notBlank`)
    pub fn new(field: impl Into<String>, field_type: FieldType, operator: FilterOperator) -> Self {
        Self {
            field: field.into(),
            value: None,
            field_type,
            operator,
            range_value: None,
        }
    }

    /// Set the comparison value
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the upper bound of an `inRange` filter
    pub fn with_range_value(mut self, value: impl Into<Value>) -> Self {
        self.range_value = Some(value.into());
        self
    }

    /// Numeric equality, the shape of an ownership constraint
    pub fn number_equals(field: impl Into<String>, value: i64) -> Self {
        Self::new(field, FieldType::Number, FilterOperator::Equals).with_value(value)
    }

    /// Inclusive range between `low` and `high`
    pub fn in_range(
        field: impl Into<String>,
        field_type: FieldType,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        Self::new(field, field_type, FilterOperator::InRange)
            .with_value(low)
            .with_range_value(high)
    }
}
