//! Turns a parsed [`Statement`] into table-engine calls and a result set.
//!
//! This is the only place [`DbError`] gets caught and folded into an
//! [`ExecResult`] — every component below it propagates with `?`.

use tracing::debug;

use crate::ast::{InsertMode, JoinClause, SelectColumn, Statement};
use crate::engine::{Database, Row, Table};
use crate::error::{DbError, DbResult};
use crate::eval::{evaluate_predicate, Env};
use crate::result::{ExecResult, ResultRow};

/// Parses and runs `text` against `db`.
pub fn execute(db: &mut Database, text: &str) -> ExecResult {
    match crate::parser::parse_statement(text) {
        Ok(stmt) => execute_stmt(db, stmt),
        Err(e) => ExecResult::err(e),
    }
}

/// Runs an already-parsed statement against `db`.
pub fn execute_stmt(db: &mut Database, stmt: Statement) -> ExecResult {
    match run(db, stmt) {
        Ok(rows) => ExecResult::ok(rows),
        Err(e) => ExecResult::err(e),
    }
}

fn run(db: &mut Database, stmt: Statement) -> DbResult<Vec<ResultRow>> {
    match stmt {
        Statement::CreateTable { table, columns } => {
            db.create_table(&table, columns)?;
            Ok(Vec::new())
        }
        Statement::CreateIndex { table, kind, columns } => {
            db.table_mut(&table)?.create_index(kind, &columns)?;
            Ok(Vec::new())
        }
        Statement::Insert { table, mode } => {
            let t = db.table_mut(&table)?;
            match mode {
                InsertMode::Positional(values) => t.insert_positional(values)?,
                InsertMode::Named(assignments) => t.insert_named(assignments)?,
            }
            Ok(Vec::new())
        }
        Statement::Update { table, assignments, predicate } => {
            let t = db.table_mut(&table)?;
            let updated = t.update_many(&assignments, predicate.as_deref())?;
            debug!(table = t.name(), updated, "ran UPDATE");
            Ok(Vec::new())
        }
        Statement::Delete { table, predicate } => {
            let t = db.table_mut(&table)?;
            let removed = t.remove_many(predicate.as_deref())?;
            debug!(table = t.name(), removed, "ran DELETE");
            Ok(Vec::new())
        }
        Statement::Select { columns, table, join, predicate } => {
            select(db, &columns, &table, join.as_ref(), predicate.as_deref())
        }
    }
}

/// A row together with the table it came from, used to qualify
/// identifiers (`table.column`) and to resolve unqualified ones.
type Source<'a> = (&'a Table, &'a Row);

fn select(
    db: &Database,
    columns: &[SelectColumn],
    table_name: &str,
    join: Option<&JoinClause>,
    predicate: Option<&str>,
) -> DbResult<Vec<ResultRow>> {
    let primary = db.table(table_name)?;
    let primary_positions = primary.filter(None)?;
    let mut results = Vec::new();

    match join {
        None => {
            for pos in primary_positions {
                let row = primary.row(pos).expect("filter only returns live positions");
                if let Some(pred) = predicate {
                    if !evaluate_predicate(pred, &primary.row_env(row))? {
                        continue;
                    }
                }
                results.push(project(columns, &[(primary, row)])?);
            }
        }
        Some(join_clause) => {
            let secondary = db.table(&join_clause.table)?;
            let secondary_positions = secondary.filter(None)?;
            for &lpos in &primary_positions {
                let lrow = primary.row(lpos).expect("live");
                for &rpos in &secondary_positions {
                    let rrow = secondary.row(rpos).expect("live");
                    let mut env = qualified_env(primary, lrow);
                    env.extend(qualified_env(secondary, rrow));

                    if !evaluate_predicate(&join_clause.on_predicate, &env)? {
                        continue;
                    }
                    if let Some(pred) = predicate {
                        if !evaluate_predicate(pred, &env)? {
                            continue;
                        }
                    }
                    results.push(project(columns, &[(primary, lrow), (secondary, rrow)])?);
                }
            }
        }
    }
    Ok(results)
}

/// Builds an environment with every column of `table`'s `row` keyed as
/// `table_name.column_name`, for use once a second table is in scope.
fn qualified_env(table: &Table, row: &Row) -> Env {
    table
        .schema()
        .columns()
        .iter()
        .zip(row.0.iter())
        .map(|(col, value)| (format!("{}.{}", table.name(), col.name), value.clone()))
        .collect()
}

fn project(columns: &[SelectColumn], sources: &[Source<'_>]) -> DbResult<ResultRow> {
    let qualify = sources.len() > 1;
    let mut out = Vec::new();

    for select_col in columns {
        if select_col.column == "*" && select_col.table.is_none() {
            for &(table, row) in sources {
                for (position, coldef) in table.schema().columns().iter().enumerate() {
                    let name = if qualify {
                        format!("{}.{}", table.name(), coldef.name)
                    } else {
                        coldef.name.clone()
                    };
                    out.push((name, row.0[position].clone()));
                }
            }
            continue;
        }

        let (table, row) = resolve_source(select_col, sources)?;
        let position = table.schema().position_of(&select_col.column)?;
        let name = if qualify {
            format!("{}.{}", table.name(), select_col.column)
        } else {
            select_col.column.clone()
        };
        out.push((name, row.0[position].clone()));
    }

    Ok(ResultRow::new(out))
}

fn resolve_source<'a>(select_col: &SelectColumn, sources: &[Source<'a>]) -> DbResult<Source<'a>> {
    if let Some(qualifier) = &select_col.table {
        return sources
            .iter()
            .find(|(table, _)| table.name() == qualifier)
            .copied()
            .ok_or_else(|| DbError::UnknownTable(qualifier.clone()));
    }

    let mut found = None;
    for &source in sources {
        if source.0.schema().has_column(&select_col.column) {
            if found.is_some() {
                return Err(DbError::UnknownColumn(select_col.column.clone()));
            }
            found = Some(source);
        }
    }
    found.ok_or_else(|| DbError::UnknownColumn(select_col.column.clone()))
}
