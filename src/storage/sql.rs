//! SQL rendering for SQLite
//!
//! Column names only ever come from the introspected schema; they are still
//! quoted. Every client value is a bound parameter.

use sqlx::{QueryBuilder, Sqlite};

use crate::filter::{escape_like, Condition, Operand, Predicate};
use crate::planner::{OrderKey, SortDirection};

/// Quote an identifier, doubling embedded quotes
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal, doubling embedded single quotes
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// `SELECT COUNT(*) FROM entity WHERE ...`
pub(crate) fn count_query(entity: &str, predicates: &[Predicate]) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
    builder.push(quote_ident(entity));
    push_where(&mut builder, predicates);
    builder
}

/// Page query returning each row as one `json_object(...)` text column
pub(crate) fn page_query(
    entity: &str,
    columns: &[String],
    predicates: &[Predicate],
    order: &[OrderKey],
    offset: u64,
    limit: u32,
) -> QueryBuilder<'static, Sqlite> {
    let projection: Vec<String> = columns
        .iter()
        .map(|c| format!("{}, {}", quote_literal(c), quote_ident(c)))
        .collect();

    let mut builder = QueryBuilder::new("SELECT json_object(");
    builder.push(projection.join(", "));
    builder.push(") FROM ");
    builder.push(quote_ident(entity));
    push_where(&mut builder, predicates);
    push_order(&mut builder, order);
    builder.push(" LIMIT ");
    builder.push_bind(i64::from(limit));
    builder.push(" OFFSET ");
    builder.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));
    builder
}

pub(crate) fn push_where(builder: &mut QueryBuilder<'static, Sqlite>, predicates: &[Predicate]) {
    for (i, predicate) in predicates.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(builder, predicate);
    }
}

pub(crate) fn push_order(builder: &mut QueryBuilder<'static, Sqlite>, order: &[OrderKey]) {
    for (i, key) in order.iter().enumerate() {
        builder.push(if i == 0 { " ORDER BY " } else { ", " });
        builder.push(quote_ident(&key.field));
        builder.push(match key.direction {
            SortDirection::Asc => " ASC",
            SortDirection::Desc => " DESC",
        });
    }
}

fn push_predicate(builder: &mut QueryBuilder<'static, Sqlite>, predicate: &Predicate) {
    let column = quote_ident(&predicate.field);

    match &predicate.condition {
        Condition::Compare { op, operand } => {
            push_column(builder, &column, operand);
            builder.push(format!(" {} ", op.sql()));
            push_operand(builder, operand);
        }
        Condition::Between { low, high } => {
            push_column(builder, &column, low);
            builder.push(" BETWEEN ");
            push_operand(builder, low);
            builder.push(" AND ");
            push_operand(builder, high);
        }
        Condition::Like { pattern, negated } => {
            builder.push(&column);
            builder.push(if *negated { " NOT LIKE " } else { " LIKE " });
            builder.push_bind(pattern.like_pattern());
            builder.push(" ESCAPE '\\'");
        }
        Condition::Blank => {
            builder.push(format!("({column} IS NULL OR {column} = '')"));
        }
        Condition::NotBlank => {
            builder.push(format!("({column} IS NOT NULL AND {column} <> '')"));
        }
        Condition::IsNull => {
            builder.push(format!("{column} IS NULL"));
        }
        Condition::IsNotNull => {
            builder.push(format!("{column} IS NOT NULL"));
        }
        Condition::InList(items) if items.is_empty() => {
            builder.push("1 = 0");
        }
        Condition::InList(items) => {
            builder.push(format!("{column} IN ("));
            let mut separated = builder.separated(", ");
            for item in items {
                separated.push_bind(item.clone());
            }
            separated.push_unseparated(")");
        }
        Condition::SerializedContains(needle) => {
            builder.push(format!("CAST({column} AS TEXT) LIKE "));
            builder.push_bind(format!("%{}%", escape_like(needle)));
            builder.push(" ESCAPE '\\'");
        }
    }
}

/// Reads the column in the operand's domain, NULL where it has no value
/// there. Mirrors the in-memory coercions in `filter::value`.
/// - Numbers: numeric storage, or text holding a JSON number
/// - Dates: the written `YYYY-MM-DD` day, never shifted to UTC
/// - Booleans: 0/1 or their usual spellings
fn push_column(builder: &mut QueryBuilder<'static, Sqlite>, column: &str, operand: &Operand) {
    match operand {
        Operand::Integer(_) | Operand::Float(_) => builder.push(format!(
            "(CASE WHEN typeof({column}) IN ('integer', 'real') THEN {column} \
             WHEN typeof({column}) = 'text' AND json_valid({column}) THEN \
             CASE WHEN json_type({column}) IN ('integer', 'real') THEN json_extract({column}, '$') END END)"
        )),
        Operand::Date(_) => builder.push(format!(
            "(CASE WHEN date(substr({column}, 1, 10)) = substr({column}, 1, 10) \
             THEN substr({column}, 1, 10) END)"
        )),
        Operand::Bool(_) => builder.push(format!(
            "(CASE WHEN typeof({column}) IN ('integer', 'real') THEN \
             CASE WHEN {column} = 1 THEN 1 WHEN {column} = 0 THEN 0 END \
             WHEN typeof({column}) = 'text' THEN \
             CASE WHEN lower(trim({column}, char(32, 9, 10, 13))) IN ('true', '1', 'yes', 'on') THEN 1 \
             WHEN lower(trim({column}, char(32, 9, 10, 13))) IN ('false', '0', 'no', 'off') THEN 0 END END)"
        )),
        Operand::Text(_) => builder.push(column),
    };
}

fn push_operand(builder: &mut QueryBuilder<'static, Sqlite>, operand: &Operand) {
    match operand {
        Operand::Integer(i) => builder.push_bind(*i),
        Operand::Float(f) => builder.push_bind(*f),
        Operand::Date(d) => builder.push_bind(d.format("%Y-%m-%d").to_string()),
        Operand::Text(s) => builder.push_bind(s.clone()),
        Operand::Bool(b) => builder.push_bind(*b),
    };
}
