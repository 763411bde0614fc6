//! A single table: its schema, rows, auto-increment counters, and indexes.
//!
//! Deleted rows are tombstoned (`None`) rather than removed from the
//! row vector, so row positions — the handles every [`Index`] stores —
//! stay stable across deletes.

use std::collections::HashMap;

use crate::ast::{ColumnDef, IndexKind};
use crate::engine::index::Index;
use crate::engine::row::Row;
use crate::engine::schema::Schema;
use crate::error::{DbError, DbResult};
use crate::eval::{evaluate, evaluate_predicate, Env};
use crate::value::Value;

/// An in-memory table: schema, live rows, per-column auto-increment
/// counters, and any indexes created over it.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    schema: Schema,
    rows: Vec<Option<Row>>,
    auto_increment: HashMap<usize, i64>,
    indexes: Vec<Index>,
}

impl Table {
    /// Creates an empty table from its parsed column definitions.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> DbResult<Self> {
        Ok(Self {
            name: name.into(),
            schema: Schema::new(columns)?,
            rows: Vec::new(),
            auto_increment: HashMap::new(),
            indexes: Vec::new(),
        })
    }

    /// The table's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The table's column layout.
    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The row at `position`, skipping deleted slots.
    #[must_use]
    pub fn row(&self, position: usize) -> Option<&Row> {
        self.rows.get(position).and_then(Option::as_ref)
    }

    /// Builds the identifier environment a row's expressions and
    /// predicates are evaluated against: every column name mapped to
    /// that row's value.
    #[must_use]
    pub fn row_env(&self, row: &Row) -> Env {
        self.schema
            .columns()
            .iter()
            .zip(row.0.iter())
            .map(|(col, value)| (col.name.clone(), value.clone()))
            .collect()
    }

    /// Returns the positions of every live row for which `predicate`
    /// (if given) evaluates to `true`.
    pub fn filter(&self, predicate: Option<&str>) -> DbResult<Vec<usize>> {
        let mut matches = Vec::new();
        for (position, row) in self.rows.iter().enumerate() {
            let Some(row) = row else { continue };
            let keep = match predicate {
                Some(expr) => evaluate_predicate(expr, &self.row_env(row))?,
                None => true,
            };
            if keep {
                matches.push(position);
            }
        }
        Ok(matches)
    }

    /// Inserts a row from a positional `VALUES (...)` list. Missing
    /// trailing values are treated as empty slots.
    pub fn insert_positional(&mut self, mut values: Vec<Option<String>>) -> DbResult<()> {
        if values.len() > self.schema.len() {
            return Err(DbError::TooManyValues {
                expected: self.schema.len(),
                got: values.len(),
            });
        }
        values.resize(self.schema.len(), None);
        self.insert_row(values)
    }

    /// Inserts a row from a named column list: `(col, ...) VALUES (...)`.
    pub fn insert_named(&mut self, assignments: Vec<(String, String)>) -> DbResult<()> {
        let mut provided: HashMap<String, String> = HashMap::with_capacity(assignments.len());
        for (name, expr) in assignments {
            if !self.schema.has_column(&name) {
                return Err(DbError::UnknownColumn(name));
            }
            if provided.insert(name.clone(), expr).is_some() {
                return Err(DbError::DuplicateAssignment(name));
            }
        }

        let mut raws = Vec::with_capacity(self.schema.len());
        for col in self.schema.columns() {
            raws.push(provided.remove(&col.name));
        }
        self.insert_row(raws)
    }

    /// Shared insert path: resolves every column's value (auto-increment
    /// assignment, then type check), validates uniqueness and key
    /// constraints against the whole table, and only then mutates any
    /// state — so a rejected insert never advances a counter or adds a
    /// partial row.
    fn insert_row(&mut self, raws: Vec<Option<String>>) -> DbResult<()> {
        let mut env = Env::new();
        let mut values = Vec::with_capacity(self.schema.len());
        let mut counter_updates = Vec::new();

        for (position, col) in self.schema.columns().iter().enumerate() {
            let raw = raws[position].as_deref();
            let value = if col.is_auto_increment {
                let counter = self.auto_increment.get(&position).copied().unwrap_or(0);
                match raw {
                    Some(text) => {
                        let explicit = evaluate(text, &env)?.as_int()?;
                        if explicit < counter {
                            return Err(DbError::AutoIncrementRegression {
                                column: col.name.clone(),
                                value: explicit,
                                counter,
                            });
                        }
                        counter_updates.push((position, explicit + 1));
                        Value::Int(explicit)
                    }
                    None => {
                        counter_updates.push((position, counter + 1));
                        Value::Int(counter)
                    }
                }
            } else if let Some(text) = raw {
                evaluate(text, &env)?
            } else if let Some(expr) = &col.default_expression {
                evaluate(expr, &env)?
            } else {
                Value::zero(col.kind)
            };

            if !value.matches_kind(col.kind) {
                return Err(DbError::TypeMismatch(format!(
                    "column `{}` expects {}, got {}",
                    col.name,
                    col.kind,
                    value.kind()
                )));
            }

            env.insert(col.name.clone(), value.clone());
            values.push(value);
        }

        let row = Row::new(values);
        self.check_unique_and_key(&row, None, self.schema.columns().iter().enumerate().map(|(i, _)| i))?;

        for (position, next_counter) in counter_updates {
            self.auto_increment.insert(position, next_counter);
        }
        let row_position = self.rows.len();
        for index in &mut self.indexes {
            index.insert(row_position, &row);
        }
        self.rows.push(Some(row));
        Ok(())
    }

    /// Checks every `UNIQUE` column, then every `KEY` column, of `row`
    /// against the rest of the table, restricted to `columns_to_check`
    /// (so updates only re-check the columns they touch). `skip_position`
    /// excludes the row being updated from the scan against itself.
    fn check_unique_and_key(
        &self,
        row: &Row,
        skip_position: Option<usize>,
        columns_to_check: impl Iterator<Item = usize> + Clone,
    ) -> DbResult<()> {
        for position in columns_to_check.clone() {
            let col = &self.schema.columns()[position];
            if !col.is_unique {
                continue;
            }
            self.scan_for_collision(row, position, skip_position, DbError::UniqueViolation {
                column: col.name.clone(),
                value: row.0[position].to_string(),
            })?;
        }
        for position in columns_to_check {
            let col = &self.schema.columns()[position];
            if !col.is_key {
                continue;
            }
            self.scan_for_collision(row, position, skip_position, DbError::KeyViolation {
                column: col.name.clone(),
                value: row.0[position].to_string(),
            })?;
        }
        Ok(())
    }

    fn scan_for_collision(
        &self,
        row: &Row,
        position: usize,
        skip_position: Option<usize>,
        violation: DbError,
    ) -> DbResult<()> {
        let new_value = &row.0[position];
        for (existing_position, existing) in self.rows.iter().enumerate() {
            if Some(existing_position) == skip_position {
                continue;
            }
            let Some(existing) = existing else { continue };
            if &existing.0[position] == new_value {
                return Err(violation);
            }
        }
        Ok(())
    }

    /// Updates every row matching `predicate` by applying `assignments`
    /// (column name to raw expression, evaluated against that row's own
    /// values). Returns the number of rows updated.
    pub fn update_many(&mut self, assignments: &[(String, String)], predicate: Option<&str>) -> DbResult<usize> {
        let mut positions = Vec::with_capacity(assignments.len());
        let mut seen = std::collections::HashSet::new();
        for (name, _) in assignments {
            let position = self.schema.position_of(name)?;
            let col = &self.schema.columns()[position];
            if col.is_protected() {
                return Err(DbError::ProtectedColumn(name.clone()));
            }
            if !seen.insert(position) {
                return Err(DbError::DuplicateAssignment(name.clone()));
            }
            positions.push(position);
        }

        let matching = self.filter(predicate)?;
        let mut updated = 0usize;
        for row_position in matching {
            let old_row = self.rows[row_position]
                .clone()
                .expect("filter only returns positions of live rows");
            let env = self.row_env(&old_row);
            let mut new_values = old_row.0.clone();
            for ((name, expr), &position) in assignments.iter().zip(&positions) {
                let value = evaluate(expr, &env)?;
                let col = &self.schema.columns()[position];
                if !value.matches_kind(col.kind) {
                    return Err(DbError::TypeMismatch(format!(
                        "column `{name}` expects {}, got {}",
                        col.kind,
                        value.kind()
                    )));
                }
                new_values[position] = value;
            }
            let new_row = Row::new(new_values);
            self.check_unique_and_key(&new_row, Some(row_position), positions.iter().copied())?;

            for index in &mut self.indexes {
                if index.touches(&positions) {
                    index.replace(row_position, &old_row, &new_row);
                }
            }
            self.rows[row_position] = Some(new_row);
            updated += 1;
        }
        Ok(updated)
    }

    /// Deletes every row matching `predicate`, returning how many were removed.
    pub fn remove_many(&mut self, predicate: Option<&str>) -> DbResult<usize> {
        let matching = self.filter(predicate)?;
        for position in &matching {
            if let Some(row) = self.rows[*position].take() {
                for index in &mut self.indexes {
                    index.remove(*position, &row);
                }
            }
        }
        Ok(matching.len())
    }

    /// Builds a new index over `column_names` and populates it from
    /// every live row.
    pub fn create_index(&mut self, kind: IndexKind, column_names: &[String]) -> DbResult<()> {
        if column_names.is_empty() {
            return Err(DbError::BadIndexColumns(
                "at least one column is required".to_string(),
            ));
        }
        let mut positions = Vec::with_capacity(column_names.len());
        for name in column_names {
            positions.push(self.schema.position_of(name)?);
        }
        let mut index = Index::new(kind, positions);
        for (position, row) in self.rows.iter().enumerate() {
            if let Some(row) = row {
                index.insert(position, row);
            }
        }
        self.indexes.push(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn users_table() -> Table {
        let mut id = ColumnDef::new("id", ValueKind::Int);
        id.is_auto_increment = true;
        id.is_key = true;
        let mut name = ColumnDef::new("name", ValueKind::Varchar);
        name.is_unique = true;
        Table::new("users", vec![id, name]).unwrap()
    }

    #[test]
    fn auto_increment_assigns_sequential_ids() {
        let mut t = users_table();
        t.insert_positional(vec![None, Some("\"a\"".to_string())]).unwrap();
        t.insert_positional(vec![None, Some("\"b\"".to_string())]).unwrap();
        assert_eq!(t.row(0).unwrap().0[0], Value::Int(0));
        assert_eq!(t.row(1).unwrap().0[0], Value::Int(1));
    }

    #[test]
    fn explicit_auto_increment_value_advances_counter() {
        let mut t = users_table();
        t.insert_positional(vec![Some("10".to_string()), Some("\"a\"".to_string())]).unwrap();
        t.insert_positional(vec![None, Some("\"b\"".to_string())]).unwrap();
        assert_eq!(t.row(1).unwrap().0[0], Value::Int(11));
    }

    #[test]
    fn auto_increment_regression_is_rejected() {
        let mut t = users_table();
        t.insert_positional(vec![Some("10".to_string()), Some("\"a\"".to_string())]).unwrap();
        let result = t.insert_positional(vec![Some("5".to_string()), Some("\"b\"".to_string())]);
        assert!(matches!(result, Err(DbError::AutoIncrementRegression { .. })));
    }

    #[test]
    fn unique_violation_is_rejected_without_mutating_state() {
        let mut t = users_table();
        t.insert_positional(vec![None, Some("\"a\"".to_string())]).unwrap();
        let result = t.insert_positional(vec![None, Some("\"a\"".to_string())]);
        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
        assert_eq!(t.filter(None).unwrap().len(), 1);
    }

    #[test]
    fn update_rejects_protected_column() {
        let mut t = users_table();
        t.insert_positional(vec![None, Some("\"a\"".to_string())]).unwrap();
        let result = t.update_many(&[("id".to_string(), "99".to_string())], None);
        assert!(matches!(result, Err(DbError::ProtectedColumn(_))));
    }

    #[test]
    fn update_rejects_plain_unique_column() {
        let mut t = users_table();
        t.insert_positional(vec![None, Some("\"a\"".to_string())]).unwrap();
        let result = t.update_many(&[("name".to_string(), "\"b\"".to_string())], None);
        assert!(matches!(result, Err(DbError::ProtectedColumn(_))));
    }

    #[test]
    fn update_applies_expression_referencing_same_row() {
        let mut age = ColumnDef::new("age", ValueKind::Int);
        age.is_unique = false;
        let mut t = Table::new("people", vec![age]).unwrap();
        t.insert_positional(vec![Some("10".to_string())]).unwrap();
        let updated = t.update_many(&[("age".to_string(), "age + 5".to_string())], None).unwrap();
        assert_eq!(updated, 1);
        assert_eq!(t.row(0).unwrap().0[0], Value::Int(15));
    }

    #[test]
    fn delete_tombstones_without_shifting_positions() {
        let mut t = users_table();
        t.insert_positional(vec![None, Some("\"a\"".to_string())]).unwrap();
        t.insert_positional(vec![None, Some("\"b\"".to_string())]).unwrap();
        let removed = t.remove_many(Some("name == \"a\"")).unwrap();
        assert_eq!(removed, 1);
        assert!(t.row(0).is_none());
        assert!(t.row(1).is_some());
    }

    #[test]
    fn create_index_rejects_unknown_column() {
        let mut t = users_table();
        let result = t.create_index(IndexKind::Ordered, &["missing".to_string()]);
        assert!(matches!(result, Err(DbError::UnknownColumn(_))));
    }

    #[test]
    fn named_insert_fills_unassigned_column_with_typed_zero() {
        let mut col = ColumnDef::new("required", ValueKind::Int);
        col.is_unique = false;
        let mut t = Table::new("t", vec![col]).unwrap();
        t.insert_named(vec![]).unwrap();
        assert_eq!(t.row(0).unwrap().0[0], Value::Int(0));
    }
}
