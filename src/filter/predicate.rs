//! Compiled predicates
//!
//! A `Predicate` is backend-neutral: the SQLite backend renders it into SQL,
//! the in-memory backend evaluates it against JSON rows.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

/// Escape character used in LIKE patterns
pub const LIKE_ESCAPE: char = '\\';

/// Typed comparison operand. The variant fixes the comparison domain:
/// numeric, calendar-date, text or boolean.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
    Bool(bool),
}

impl Operand {
    /// Numeric value of a numeric operand
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Integer(i) => write!(f, "{i}"),
            Operand::Float(x) => write!(f, "{x}"),
            Operand::Date(d) => write!(f, "date '{}'", d.format("%Y-%m-%d")),
            Operand::Text(s) => write!(f, "'{s}'"),
            Operand::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Binary comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// SQL spelling
    pub fn sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }

    /// Whether `field <op> operand` holds given `field.cmp(operand)`
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Gte => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Lte => ordering != Ordering::Greater,
        }
    }
}

/// Where a text pattern must occur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Contains,
    StartsWith,
    EndsWith,
}

/// Literal text searched inside a column value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPattern {
    pub kind: PatternKind,
    pub needle: String,
}

impl TextPattern {
    pub fn new(kind: PatternKind, needle: impl Into<String>) -> Self {
        Self {
            kind,
            needle: needle.into(),
        }
    }

    /// Checks `haystack` against the pattern
    pub fn matches(&self, haystack: &str) -> bool {
        match self.kind {
            PatternKind::Contains => haystack.contains(&self.needle),
            PatternKind::StartsWith => haystack.starts_with(&self.needle),
            PatternKind::EndsWith => haystack.ends_with(&self.needle),
        }
    }

    /// LIKE pattern with wildcards in the needle escaped, to be used with
    /// `ESCAPE '\'`
    pub fn like_pattern(&self) -> String {
        let escaped = escape_like(&self.needle);
        match self.kind {
            PatternKind::Contains => format!("%{escaped}%"),
            PatternKind::StartsWith => format!("{escaped}%"),
            PatternKind::EndsWith => format!("%{escaped}"),
        }
    }
}

/// Escape `%`, `_` and the escape character itself
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Condition applied to a single column
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `field <op> operand`
    Compare { op: CompareOp, operand: Operand },
    /// `low <= field <= high`
    Between { low: Operand, high: Operand },
    /// `field [NOT] LIKE pattern`
    Like { pattern: TextPattern, negated: bool },
    /// NULL or empty string
    Blank,
    /// Neither NULL nor empty string
    NotBlank,
    IsNull,
    IsNotNull,
    /// `field IN (items)`; an empty list matches nothing
    InList(Vec<String>),
    /// Substring of the column's text serialization
    SerializedContains(String),
}

/// A compiled, schema-validated predicate on one column
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub condition: Condition,
}

impl Predicate {
    pub fn new(field: impl Into<String>, condition: Condition) -> Self {
        Self {
            field: field.into(),
            condition,
        }
    }

    /// Equality against a typed operand
    pub fn compare(field: impl Into<String>, op: CompareOp, operand: Operand) -> Self {
        Self::new(field, Condition::Compare { op, operand })
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = &self.field;
        match &self.condition {
            Condition::Compare { op, operand } => write!(f, "{field} {} {operand}", op.sql()),
            Condition::Between { low, high } => write!(f, "{field} BETWEEN {low} AND {high}"),
            Condition::Like { pattern, negated } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{field} {not}LIKE '{}'", pattern.like_pattern())
            }
            Condition::Blank => write!(f, "{field} IS BLANK"),
            Condition::NotBlank => write!(f, "{field} IS NOT BLANK"),
            Condition::IsNull => write!(f, "{field} IS NULL"),
            Condition::IsNotNull => write!(f, "{field} IS NOT NULL"),
            Condition::InList(items) => write!(f, "{field} IN ({})", items.join(", ")),
            Condition::SerializedContains(needle) => write!(f, "{field} CONTAINS '{needle}'"),
        }
    }
}
