//! Filter descriptors and the predicate compiler
//!
//! A client sends declarative filter descriptors (field, field type,
//! operator, value, optional range value). The compiler validates each one
//! against the live schema and turns it into a typed [`Predicate`] that every
//! storage backend evaluates the same way.
//!
//! # Invariants
//!
//! - A field outside the schema is always rejected, whatever its type/operator
//! - `(FieldType, FilterOperator)` dispatch is an exhaustive match
//! - Comparisons against NULL never match (three-valued logic)

mod compiler;
mod errors;
mod predicate;
mod types;
pub(crate) mod value;

pub use compiler::{BooleanCoercion, PredicateCompiler};
pub use errors::{FilterError, FilterResult};
pub use predicate::{
    escape_like, CompareOp, Condition, Operand, PatternKind, Predicate, TextPattern, LIKE_ESCAPE,
};
pub use types::{FieldType, FilterDescriptor, FilterOperator};
