//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from a static table descriptor.

/// Static description of a table: name, integer primary key and the writable columns in bind order.
/// Every table also carries `created_at` / `updated_at` maintained by the database.
#[derive(Debug)]
pub struct Table {
    pub name: &'static str,
    pub pk: &'static str,
    pub columns: &'static [&'static str],
}

/// Quote identifier for PostgreSQL (safe: only from descriptors).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Column list returned by every SELECT and RETURNING clause, optionally prefixed by an alias.
fn select_column_list(table: &Table, alias: Option<&str>) -> String {
    let prefix = alias.map(|a| format!("{}.", a)).unwrap_or_default();
    std::iter::once(table.pk)
        .chain(table.columns.iter().copied())
        .chain(["created_at", "updated_at"])
        .map(|c| format!("{}{}", prefix, quoted(c)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT every row ordered by primary key.
pub fn select_all(table: &Table) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(table, None),
        quoted(table.name),
        quoted(table.pk)
    )
}

/// SELECT by primary key. Caller binds the id as `$1`.
pub fn select_by_id(table: &Table) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1",
        select_column_list(table, None),
        quoted(table.name),
        quoted(table.pk)
    )
}

/// SELECT rows whose `column` equals `$1`, ordered by primary key.
pub fn select_by_column(table: &Table, column: &str) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1 ORDER BY {}",
        select_column_list(table, None),
        quoted(table.name),
        quoted(column),
        quoted(table.pk)
    )
}

/// SELECT rows whose text `column` contains `$1` (a pattern from `contains_pattern`).
pub fn select_by_column_contains(table: &Table, column: &str) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} ILIKE $1 ESCAPE '\\' ORDER BY {}",
        select_column_list(table, None),
        quoted(table.name),
        quoted(column),
        quoted(table.pk)
    )
}

/// SELECT rows of `table` whose parent (joined through `fk`) has a text `parent_column` containing `$1`.
pub fn select_by_parent_contains(
    table: &Table,
    fk: &str,
    parent: &Table,
    parent_column: &str,
) -> String {
    format!(
        "SELECT {} FROM {} t JOIN {} p ON p.{} = t.{} WHERE p.{} ILIKE $1 ESCAPE '\\' ORDER BY t.{}",
        select_column_list(table, Some("t")),
        quoted(table.name),
        quoted(parent.name),
        quoted(parent.pk),
        quoted(fk),
        quoted(parent_column),
        quoted(table.pk)
    )
}

/// INSERT all writable columns as `$1..$n`, returning the stored row.
pub fn insert(table: &Table) -> String {
    let cols: Vec<String> = table.columns.iter().map(|c| quoted(c)).collect();
    let placeholders: Vec<String> = (1..=table.columns.len()).map(|n| format!("${}", n)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(table, None)
    )
}

/// UPDATE all writable columns as `$1..$n` and touch `updated_at`; the id is `$n+1`.
pub fn update(table: &Table) -> String {
    let mut sets: Vec<String> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{} = ${}", quoted(c), i + 1))
        .collect();
    sets.push(format!("{} = NOW()", quoted("updated_at")));
    format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        quoted(table.name),
        sets.join(", "),
        quoted(table.pk),
        table.columns.len() + 1,
        select_column_list(table, None)
    )
}

/// DELETE by id (`$1`).
pub fn delete(table: &Table) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1",
        quoted(table.name),
        quoted(table.pk)
    )
}
