//! Typed values bound to PostgreSQL statements.

use chrono::NaiveDate;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;

/// A value that can be bound to a statement parameter, in column order.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Int(i32),
    Text(String),
    OptText(Option<String>),
    OptDate(Option<NaiveDate>),
}

/// Bind every value in order; placeholders are numbered by the builder to match.
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: Vec<BindValue>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for v in values {
        query = match v {
            BindValue::Int(n) => query.bind(n),
            BindValue::Text(s) => query.bind(s),
            BindValue::OptText(s) => query.bind(s),
            BindValue::OptDate(d) => query.bind(d),
        };
    }
    query
}

/// Pattern for a case-insensitive "contains" match with `ILIKE ... ESCAPE '\'`.
pub fn contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("abc"), "%abc%");
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
